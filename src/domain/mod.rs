//! Domain types for the mechanic shop.
//!
//! One record per table, plus the `New*` column sets used for inserts and
//! full updates. Field names match the column names, so the serde
//! representation is the wire representation.

mod assignment;
mod customer;
mod line_item;
mod mechanic;
mod service;
mod ticket;
mod vehicle;

pub use assignment::*;
pub use customer::*;
pub use line_item::*;
pub use mechanic::*;
pub use service::*;
pub use ticket::*;
pub use vehicle::*;
