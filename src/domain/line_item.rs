//! Billable lines on a service ticket.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A labor or parts line, stored in `ticket_line_items`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TicketLineItem {
    pub line_item_id: i64,
    pub ticket_id: i64,
    pub service_id: i64,
    /// e.g. "labor" or "part".
    pub line_type: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price_cents: i64,
}

/// Column values for creating or replacing a line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewTicketLineItem {
    pub ticket_id: i64,
    pub service_id: i64,
    pub line_type: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price_cents: i64,
}

impl NewTicketLineItem {
    /// Quantity as stored: a NUMERIC(10,2) value, two decimal places.
    ///
    /// Rounds the decimal the caller wrote, half away from zero, so `1.005`
    /// stores as `1.01` even though its binary value sits just below.
    /// Values with no decimal form (NaN, infinities) pass through.
    pub fn stored_quantity(&self) -> f64 {
        self.quantity
            .to_string()
            .parse::<Decimal>()
            .ok()
            .and_then(|d| {
                d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
                    .to_f64()
            })
            .unwrap_or(self.quantity)
    }
}
