//! Order engine
//!
//! - [`validator`] - batch eligibility checks (slot, weekday, availability)
//! - [`policy`] - cancel / dispute window rules
//! - [`service`] - order lifecycle over the SQLite store
//! - [`summary`] - daily and bill aggregation

pub mod error;
pub mod policy;
pub mod service;
pub mod summary;
pub mod validator;

pub use error::{ItemRejection, OrderError, OrderResult};
pub use policy::OrderWindows;
pub use service::OrderService;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::auth::CurrentUser;

/// Caller role, trusted as supplied by the identity layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" => Ok(Role::SuperAdmin),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Who is calling an engine operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
}

impl Actor {
    pub fn user(user_id: i64) -> Self {
        Self { user_id, role: Role::User }
    }

    pub fn admin(user_id: i64) -> Self {
        Self { user_id, role: Role::Admin }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<&CurrentUser> for Actor {
    fn from(user: &CurrentUser) -> Self {
        // unknown roles are plain users
        let role = user.role.parse().unwrap_or(Role::User);
        Self {
            user_id: user.id,
            role,
        }
    }
}
