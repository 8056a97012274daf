//! Vehicle domain model.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A customer's vehicle, stored in `vehicles`. The VIN is unique shop-wide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    pub vehicle_id: i64,
    /// Owning customer.
    pub customer_id: i64,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
}

/// Column values for creating or replacing a vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewVehicle {
    pub customer_id: i64,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
}
