//! Catalog of services the shop offers.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A catalog entry, stored in `services`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Service {
    pub service_id: i64,
    pub name: String,
    pub default_labor_minutes: i32,
    pub base_price_cents: i64,
}

/// Column values for creating or replacing a service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewService {
    pub name: String,
    pub default_labor_minutes: i32,
    pub base_price_cents: i64,
}
