//! Service ticket domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A repair job for one vehicle, stored in `service_tickets`.
///
/// `status` is free text; the shop decides its own vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ServiceTicket {
    pub ticket_id: i64,
    pub vehicle_id: i64,
    pub customer_id: i64,
    pub status: String,
    /// Set on insert.
    pub opened_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
    pub problem_description: String,
    pub odometer_miles: i64,
    pub priority: i32,
}

impl ServiceTicket {
    pub fn is_closed(&self) -> bool {
        self.closed_at.is_some()
    }
}

/// Column values for creating or replacing a ticket.
///
/// Timestamps are managed by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewServiceTicket {
    pub vehicle_id: i64,
    pub customer_id: i64,
    pub status: String,
    pub problem_description: String,
    pub odometer_miles: i64,
    pub priority: i32,
}
