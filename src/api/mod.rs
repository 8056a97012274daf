//! HTTP API layer for the mechanic shop.
//!
//! Mounts the customers resource group plus health and OpenAPI docs.

pub mod handlers;
mod routes;
mod types;

pub use routes::{build_router, customer_routes};
pub use types::HealthResponse;
