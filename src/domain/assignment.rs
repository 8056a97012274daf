//! Ticket-to-mechanic assignments (the `ticket_mechanics` join table).

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A mechanic's work on a ticket. Keyed by `(ticket_id, mechanic_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TicketMechanic {
    pub ticket_id: i64,
    pub mechanic_id: i64,
    /// e.g. "lead" or "assistant".
    pub role: String,
    pub minutes_worked: i32,
}
