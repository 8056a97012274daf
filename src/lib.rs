//! Mechanic Shop - data service for a vehicle repair shop.
//!
//! Models customers, vehicles, mechanics, services, service tickets, line
//! items and ticket-to-mechanic assignments on SQLite, and exposes the
//! customers resource over HTTP.

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod storage;

use crate::config::Profile;
use crate::storage::ShopRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database repository.
    pub repository: ShopRepository,
    /// Active configuration profile.
    pub profile: Profile,
}
