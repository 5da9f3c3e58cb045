//! Time Slot API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use shared::models::MealCategory;

use crate::core::ServerState;
use crate::slots::{NextSlot, SlotInfo, SlotStatus};
use crate::utils::{AppError, AppResult};

/// Slot table at the trusted current time
#[derive(Debug, Serialize)]
pub struct TimeSlotsResponse {
    #[serde(flatten)]
    pub status: SlotStatus,
    pub next_available: Option<NextSlot>,
}

/// Whether one category can be ordered right now
#[derive(Debug, Serialize)]
pub struct CategoryCheck {
    pub category: MealCategory,
    pub is_within_slot: bool,
    /// None for categories without a window
    pub slot: Option<SlotInfo>,
}

pub async fn status(State(state): State<ServerState>) -> Json<TimeSlotsResponse> {
    let now = state.trusted.local_now();
    Json(TimeSlotsResponse {
        status: state.slots.status(&now),
        next_available: state.slots.next_available(&now),
    })
}

pub async fn check(
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> AppResult<Json<CategoryCheck>> {
    let category: MealCategory = category.parse().map_err(AppError::validation)?;
    let now = state.trusted.local_now();
    Ok(Json(CategoryCheck {
        category,
        is_within_slot: state.slots.is_within_slot(category, &now),
        slot: state.slots.slot_info(category, &now),
    }))
}
