//! API request and response types.
//!
//! Customer records are sent as-is: [`Customer`](crate::domain::Customer)
//! is both the single-object and, as a JSON array, the list representation.
//! [`NewCustomer`](crate::domain::NewCustomer) is the request body for
//! create and replace.

use serde::Serialize;
use utoipa::ToSchema;

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Active configuration profile.
    pub profile: String,
    /// Database connectivity.
    pub database: String,
    /// Timestamp.
    pub timestamp: String,
}
