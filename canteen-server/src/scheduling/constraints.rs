//! Date-range rules for scheduled orders
//!
//! Both dates must fall in the current calendar year: start ≥ today,
//! end ≥ start, end ≤ Dec 31 of start's year, start ≤ Dec 31 this year.

use chrono::NaiveDate;
use shared::ErrorCode;
use shared::models::SchedulingConstraints;

use crate::orders::OrderError;
use crate::utils::time::end_of_year;

pub fn scheduling_constraints(today: NaiveDate) -> SchedulingConstraints {
    let year_end = end_of_year(today);
    SchedulingConstraints {
        min_start_date: today,
        max_start_date: year_end,
        max_end_date: year_end,
    }
}

/// Fail-fast check, evaluated before anything is materialized
pub fn validate_date_range(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<(), OrderError> {
    if start < today {
        return Err(OrderError::Validation(
            ErrorCode::StartDateInPast,
            format!("Start date {start} cannot be in the past (today is {today})"),
        ));
    }
    if end < start {
        return Err(OrderError::Validation(
            ErrorCode::InvalidDateRange,
            "End date must be on or after the start date".into(),
        ));
    }
    let max_end = end_of_year(start);
    if end > max_end {
        return Err(OrderError::Validation(
            ErrorCode::BeyondSchedulingYear,
            format!("End date cannot exceed {max_end} (end of the year)"),
        ));
    }
    if start > end_of_year(today) {
        return Err(OrderError::Validation(
            ErrorCode::BeyondSchedulingYear,
            "Cannot schedule beyond the current year".into(),
        ));
    }
    Ok(())
}
