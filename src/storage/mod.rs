//! Storage layer for the mechanic shop.
//!
//! Provides database access via SQLx with SQLite. Rows are mapped to domain
//! types by hand in `models`; all SQL lives in the repository.

mod models;
mod repository;

pub use repository::ShopRepository;
