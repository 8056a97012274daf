//! Database models for the mechanic shop.
//!
//! These are the row types returned by SQLx queries. Timestamps are stored
//! as RFC 3339 text and integers as SQLite's 64-bit INTEGER, so each row is
//! converted into its domain type explicitly.

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::domain::{
    Customer, Mechanic, Service, ServiceTicket, TicketLineItem, TicketMechanic, Vehicle,
};
use crate::error::ShopError;

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ShopError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ShopError::Internal(format!("Invalid timestamp '{}': {}", value, e)))
}

fn narrow(column: &str, value: i64) -> Result<i32, ShopError> {
    i32::try_from(value)
        .map_err(|_| ShopError::Internal(format!("Column {} out of range: {}", column, value)))
}

/// Database row for customers table.
#[derive(Debug, Clone, FromRow)]
pub struct CustomerRow {
    pub customer_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub created_at: String,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = ShopError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        Ok(Customer {
            customer_id: row.customer_id,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            city: row.city,
            state: row.state,
            postal_code: row.postal_code,
            created_at: parse_timestamp(&row.created_at)?,
        })
    }
}

/// Database row for vehicles table.
#[derive(Debug, Clone, FromRow)]
pub struct VehicleRow {
    pub vehicle_id: i64,
    pub customer_id: i64,
    pub vin: String,
    pub make: String,
    pub model: String,
    pub year: i64,
    pub color: String,
}

impl TryFrom<VehicleRow> for Vehicle {
    type Error = ShopError;

    fn try_from(row: VehicleRow) -> Result<Self, Self::Error> {
        Ok(Vehicle {
            vehicle_id: row.vehicle_id,
            customer_id: row.customer_id,
            vin: row.vin,
            make: row.make,
            model: row.model,
            year: narrow("year", row.year)?,
            color: row.color,
        })
    }
}

/// Database row for mechanics table.
#[derive(Debug, Clone, FromRow)]
pub struct MechanicRow {
    pub mechanic_id: i64,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub salary: i64,
    pub is_active: bool,
}

impl From<MechanicRow> for Mechanic {
    fn from(row: MechanicRow) -> Self {
        Mechanic {
            mechanic_id: row.mechanic_id,
            full_name: row.full_name,
            email: row.email,
            phone: row.phone,
            salary: row.salary,
            is_active: row.is_active,
        }
    }
}

/// Database row for services table.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceRow {
    pub service_id: i64,
    pub name: String,
    pub default_labor_minutes: i64,
    pub base_price_cents: i64,
}

impl TryFrom<ServiceRow> for Service {
    type Error = ShopError;

    fn try_from(row: ServiceRow) -> Result<Self, Self::Error> {
        Ok(Service {
            service_id: row.service_id,
            name: row.name,
            default_labor_minutes: narrow("default_labor_minutes", row.default_labor_minutes)?,
            base_price_cents: row.base_price_cents,
        })
    }
}

/// Database row for service_tickets table.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceTicketRow {
    pub ticket_id: i64,
    pub vehicle_id: i64,
    pub customer_id: i64,
    pub status: String,
    pub opened_at: String,
    pub closed_at: Option<String>,
    pub problem_description: String,
    pub odometer_miles: i64,
    pub priority: i64,
}

impl TryFrom<ServiceTicketRow> for ServiceTicket {
    type Error = ShopError;

    fn try_from(row: ServiceTicketRow) -> Result<Self, Self::Error> {
        Ok(ServiceTicket {
            ticket_id: row.ticket_id,
            vehicle_id: row.vehicle_id,
            customer_id: row.customer_id,
            status: row.status,
            opened_at: parse_timestamp(&row.opened_at)?,
            closed_at: row.closed_at.as_deref().map(parse_timestamp).transpose()?,
            problem_description: row.problem_description,
            odometer_miles: row.odometer_miles,
            priority: narrow("priority", row.priority)?,
        })
    }
}

/// Database row for ticket_line_items table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketLineItemRow {
    pub line_item_id: i64,
    pub ticket_id: i64,
    pub service_id: i64,
    pub line_type: String,
    pub description: String,
    pub quantity: f64,
    pub unit_price_cents: i64,
}

impl From<TicketLineItemRow> for TicketLineItem {
    fn from(row: TicketLineItemRow) -> Self {
        TicketLineItem {
            line_item_id: row.line_item_id,
            ticket_id: row.ticket_id,
            service_id: row.service_id,
            line_type: row.line_type,
            description: row.description,
            quantity: row.quantity,
            unit_price_cents: row.unit_price_cents,
        }
    }
}

/// Database row for ticket_mechanics table.
#[derive(Debug, Clone, FromRow)]
pub struct TicketMechanicRow {
    pub ticket_id: i64,
    pub mechanic_id: i64,
    pub role: String,
    pub minutes_worked: i64,
}

impl TryFrom<TicketMechanicRow> for TicketMechanic {
    type Error = ShopError;

    fn try_from(row: TicketMechanicRow) -> Result<Self, Self::Error> {
        Ok(TicketMechanic {
            ticket_id: row.ticket_id,
            mechanic_id: row.mechanic_id,
            role: row.role,
            minutes_worked: narrow("minutes_worked", row.minutes_worked)?,
        })
    }
}
