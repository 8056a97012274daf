//! Mechanic domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A shop employee, stored in `mechanics`. Email is unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Mechanic {
    pub mechanic_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Whole currency units per year.
    pub salary: i64,
    pub is_active: bool,
}

/// Column values for creating or replacing a mechanic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewMechanic {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub salary: i64,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}
