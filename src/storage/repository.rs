//! Repository layer for database operations.

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::{
    Customer, Mechanic, NewCustomer, NewMechanic, NewService, NewServiceTicket,
    NewTicketLineItem, NewVehicle, Service, ServiceTicket, TicketLineItem, TicketMechanic,
    Vehicle,
};
use crate::error::{ShopError, ShopResult};
use crate::storage::models::{
    CustomerRow, MechanicRow, ServiceRow, ServiceTicketRow, TicketLineItemRow,
    TicketMechanicRow, VehicleRow,
};

/// Repository for all shop database operations.
///
/// Owns the connection pool; clones share it.
#[derive(Clone)]
pub struct ShopRepository {
    pool: SqlitePool,
}

impl ShopRepository {
    /// Get a reference to the underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl ShopRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool for `config` with foreign key enforcement on every
    /// connection.
    pub async fn connect(config: &DatabaseConfig) -> ShopResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool_options = if config.is_in_memory() {
            // Each connection to :memory: is a separate database, so pin one
            // connection for the life of the pool.
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(config.max_connections.max(1))
        };

        let pool = pool_options.connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Close every pooled connection. Called once at shutdown.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Initialize the database schema. Safe to run on every startup.
    pub async fn init_schema(&self) -> ShopResult<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS customers (
                customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name VARCHAR(255) NOT NULL,
                last_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL,
                phone VARCHAR(50) NOT NULL,
                address VARCHAR(255) NOT NULL,
                city VARCHAR(100) NOT NULL,
                state VARCHAR(50) NOT NULL,
                postal_code VARCHAR(20) NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS vehicles (
                vehicle_id INTEGER PRIMARY KEY AUTOINCREMENT,
                customer_id INTEGER NOT NULL,
                vin VARCHAR(100) NOT NULL UNIQUE,
                make VARCHAR(100) NOT NULL,
                model VARCHAR(100) NOT NULL,
                year INTEGER NOT NULL,
                color VARCHAR(50) NOT NULL,
                FOREIGN KEY (customer_id) REFERENCES customers(customer_id)
            );

            CREATE INDEX IF NOT EXISTS idx_vehicles_customer ON vehicles(customer_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mechanics (
                mechanic_id INTEGER PRIMARY KEY AUTOINCREMENT,
                full_name VARCHAR(255) NOT NULL,
                email VARCHAR(255) NOT NULL UNIQUE,
                phone VARCHAR(50) NOT NULL,
                salary INTEGER NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS services (
                service_id INTEGER PRIMARY KEY AUTOINCREMENT,
                name VARCHAR(255) NOT NULL,
                default_labor_minutes INTEGER NOT NULL,
                base_price_cents INTEGER NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS service_tickets (
                ticket_id INTEGER PRIMARY KEY AUTOINCREMENT,
                vehicle_id INTEGER NOT NULL,
                customer_id INTEGER NOT NULL,
                status VARCHAR(50) NOT NULL,
                opened_at TEXT NOT NULL,
                closed_at TEXT,
                problem_description TEXT NOT NULL,
                odometer_miles INTEGER NOT NULL,
                priority INTEGER NOT NULL,
                FOREIGN KEY (vehicle_id) REFERENCES vehicles(vehicle_id),
                FOREIGN KEY (customer_id) REFERENCES customers(customer_id)
            );

            CREATE INDEX IF NOT EXISTS idx_service_tickets_vehicle ON service_tickets(vehicle_id);
            CREATE INDEX IF NOT EXISTS idx_service_tickets_customer ON service_tickets(customer_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ticket_line_items (
                line_item_id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticket_id INTEGER NOT NULL,
                service_id INTEGER NOT NULL,
                line_type VARCHAR(50) NOT NULL,
                description TEXT NOT NULL,
                quantity REAL NOT NULL,
                unit_price_cents INTEGER NOT NULL,
                FOREIGN KEY (ticket_id) REFERENCES service_tickets(ticket_id),
                FOREIGN KEY (service_id) REFERENCES services(service_id)
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_line_items_ticket ON ticket_line_items(ticket_id);
            CREATE INDEX IF NOT EXISTS idx_ticket_line_items_service ON ticket_line_items(service_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS ticket_mechanics (
                ticket_id INTEGER NOT NULL,
                mechanic_id INTEGER NOT NULL,
                role VARCHAR(100) NOT NULL,
                minutes_worked INTEGER NOT NULL,
                PRIMARY KEY (ticket_id, mechanic_id),
                FOREIGN KEY (ticket_id) REFERENCES service_tickets(ticket_id),
                FOREIGN KEY (mechanic_id) REFERENCES mechanics(mechanic_id)
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_mechanics_mechanic ON ticket_mechanics(mechanic_id);
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Run a keyed DELETE, mapping "no rows" to `NotFound`.
    async fn delete_by_id(&self, sql: &str, id: i64, entity: &str) -> ShopResult<()> {
        let result = sqlx::query(sql).bind(id).execute(&self.pool).await?;

        if result.rows_affected() == 0 {
            return Err(ShopError::NotFound(format!("{} {} not found", entity, id)));
        }

        Ok(())
    }

    // ==================== Customers ====================

    /// Insert a customer, stamping `created_at` with the current time.
    pub async fn create_customer(&self, customer: &NewCustomer) -> ShopResult<Customer> {
        let row: CustomerRow = sqlx::query_as(
            r#"
            INSERT INTO customers (
                first_name, last_name, email, phone, address,
                city, state, postal_code, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.postal_code)
        .bind(Utc::now().to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Get a customer by ID.
    pub async fn get_customer(&self, id: i64) -> ShopResult<Customer> {
        let row: CustomerRow = sqlx::query_as("SELECT * FROM customers WHERE customer_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ShopError::NotFound(format!("Customer {} not found", id)))?;

        row.try_into()
    }

    /// List all customers in insertion order.
    pub async fn list_customers(&self) -> ShopResult<Vec<Customer>> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as("SELECT * FROM customers ORDER BY customer_id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Replace a customer's columns. `created_at` is kept.
    pub async fn update_customer(&self, id: i64, customer: &NewCustomer) -> ShopResult<Customer> {
        let row: CustomerRow = sqlx::query_as(
            r#"
            UPDATE customers
            SET first_name = ?, last_name = ?, email = ?, phone = ?,
                address = ?, city = ?, state = ?, postal_code = ?
            WHERE customer_id = ?
            RETURNING *
            "#,
        )
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.state)
        .bind(&customer.postal_code)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Customer {} not found", id)))?;

        row.try_into()
    }

    /// Delete a customer. Fails while vehicles or tickets reference it.
    pub async fn delete_customer(&self, id: i64) -> ShopResult<()> {
        self.delete_by_id("DELETE FROM customers WHERE customer_id = ?", id, "Customer")
            .await
    }

    /// Vehicles owned by a customer.
    pub async fn list_customer_vehicles(&self, customer_id: i64) -> ShopResult<Vec<Vehicle>> {
        let rows: Vec<VehicleRow> = sqlx::query_as(
            "SELECT * FROM vehicles WHERE customer_id = ? ORDER BY vehicle_id ASC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Tickets opened for a customer.
    pub async fn list_customer_tickets(&self, customer_id: i64) -> ShopResult<Vec<ServiceTicket>> {
        let rows: Vec<ServiceTicketRow> = sqlx::query_as(
            "SELECT * FROM service_tickets WHERE customer_id = ? ORDER BY ticket_id ASC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    // ==================== Vehicles ====================

    /// Insert a vehicle. The VIN must be unused and the customer must exist.
    pub async fn create_vehicle(&self, vehicle: &NewVehicle) -> ShopResult<Vehicle> {
        let row: VehicleRow = sqlx::query_as(
            r#"
            INSERT INTO vehicles (customer_id, vin, make, model, year, color)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(vehicle.customer_id)
        .bind(&vehicle.vin)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Get a vehicle by ID.
    pub async fn get_vehicle(&self, id: i64) -> ShopResult<Vehicle> {
        let row: VehicleRow = sqlx::query_as("SELECT * FROM vehicles WHERE vehicle_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ShopError::NotFound(format!("Vehicle {} not found", id)))?;

        row.try_into()
    }

    /// List all vehicles.
    pub async fn list_vehicles(&self) -> ShopResult<Vec<Vehicle>> {
        let rows: Vec<VehicleRow> =
            sqlx::query_as("SELECT * FROM vehicles ORDER BY vehicle_id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Replace a vehicle's columns.
    pub async fn update_vehicle(&self, id: i64, vehicle: &NewVehicle) -> ShopResult<Vehicle> {
        let row: VehicleRow = sqlx::query_as(
            r#"
            UPDATE vehicles
            SET customer_id = ?, vin = ?, make = ?, model = ?, year = ?, color = ?
            WHERE vehicle_id = ?
            RETURNING *
            "#,
        )
        .bind(vehicle.customer_id)
        .bind(&vehicle.vin)
        .bind(&vehicle.make)
        .bind(&vehicle.model)
        .bind(vehicle.year)
        .bind(&vehicle.color)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Vehicle {} not found", id)))?;

        row.try_into()
    }

    /// Delete a vehicle. Fails while tickets reference it.
    pub async fn delete_vehicle(&self, id: i64) -> ShopResult<()> {
        self.delete_by_id("DELETE FROM vehicles WHERE vehicle_id = ?", id, "Vehicle")
            .await
    }

    /// Service history of a vehicle.
    pub async fn list_vehicle_tickets(&self, vehicle_id: i64) -> ShopResult<Vec<ServiceTicket>> {
        let rows: Vec<ServiceTicketRow> = sqlx::query_as(
            "SELECT * FROM service_tickets WHERE vehicle_id = ? ORDER BY ticket_id ASC",
        )
        .bind(vehicle_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    // ==================== Mechanics ====================

    /// Insert a mechanic. The email must be unused.
    pub async fn create_mechanic(&self, mechanic: &NewMechanic) -> ShopResult<Mechanic> {
        let row: MechanicRow = sqlx::query_as(
            r#"
            INSERT INTO mechanics (full_name, email, phone, salary, is_active)
            VALUES (?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&mechanic.full_name)
        .bind(&mechanic.email)
        .bind(&mechanic.phone)
        .bind(mechanic.salary)
        .bind(mechanic.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a mechanic by ID.
    pub async fn get_mechanic(&self, id: i64) -> ShopResult<Mechanic> {
        let row: MechanicRow = sqlx::query_as("SELECT * FROM mechanics WHERE mechanic_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ShopError::NotFound(format!("Mechanic {} not found", id)))?;

        Ok(row.into())
    }

    /// List all mechanics.
    pub async fn list_mechanics(&self) -> ShopResult<Vec<Mechanic>> {
        let rows: Vec<MechanicRow> =
            sqlx::query_as("SELECT * FROM mechanics ORDER BY mechanic_id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Mechanic::from).collect())
    }

    /// Replace a mechanic's columns.
    pub async fn update_mechanic(&self, id: i64, mechanic: &NewMechanic) -> ShopResult<Mechanic> {
        let row: MechanicRow = sqlx::query_as(
            r#"
            UPDATE mechanics
            SET full_name = ?, email = ?, phone = ?, salary = ?, is_active = ?
            WHERE mechanic_id = ?
            RETURNING *
            "#,
        )
        .bind(&mechanic.full_name)
        .bind(&mechanic.email)
        .bind(&mechanic.phone)
        .bind(mechanic.salary)
        .bind(mechanic.is_active)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Mechanic {} not found", id)))?;

        Ok(row.into())
    }

    /// Delete a mechanic. Fails while assignments reference it.
    pub async fn delete_mechanic(&self, id: i64) -> ShopResult<()> {
        self.delete_by_id("DELETE FROM mechanics WHERE mechanic_id = ?", id, "Mechanic")
            .await
    }

    /// Tickets a mechanic is assigned to.
    pub async fn list_mechanic_tickets(&self, mechanic_id: i64) -> ShopResult<Vec<ServiceTicket>> {
        let rows: Vec<ServiceTicketRow> = sqlx::query_as(
            r#"
            SELECT t.* FROM service_tickets t
            JOIN ticket_mechanics tm ON tm.ticket_id = t.ticket_id
            WHERE tm.mechanic_id = ?
            ORDER BY t.ticket_id ASC
            "#,
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    // ==================== Services ====================

    /// Insert a catalog service.
    pub async fn create_service(&self, service: &NewService) -> ShopResult<Service> {
        let row: ServiceRow = sqlx::query_as(
            r#"
            INSERT INTO services (name, default_labor_minutes, base_price_cents)
            VALUES (?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(&service.name)
        .bind(service.default_labor_minutes)
        .bind(service.base_price_cents)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Get a service by ID.
    pub async fn get_service(&self, id: i64) -> ShopResult<Service> {
        let row: ServiceRow = sqlx::query_as("SELECT * FROM services WHERE service_id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| ShopError::NotFound(format!("Service {} not found", id)))?;

        row.try_into()
    }

    /// List the service catalog.
    pub async fn list_services(&self) -> ShopResult<Vec<Service>> {
        let rows: Vec<ServiceRow> =
            sqlx::query_as("SELECT * FROM services ORDER BY service_id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Replace a service's columns.
    pub async fn update_service(&self, id: i64, service: &NewService) -> ShopResult<Service> {
        let row: ServiceRow = sqlx::query_as(
            r#"
            UPDATE services
            SET name = ?, default_labor_minutes = ?, base_price_cents = ?
            WHERE service_id = ?
            RETURNING *
            "#,
        )
        .bind(&service.name)
        .bind(service.default_labor_minutes)
        .bind(service.base_price_cents)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Service {} not found", id)))?;

        row.try_into()
    }

    /// Delete a service. Fails while line items reference it.
    pub async fn delete_service(&self, id: i64) -> ShopResult<()> {
        self.delete_by_id("DELETE FROM services WHERE service_id = ?", id, "Service")
            .await
    }

    /// Line items billed against a service.
    pub async fn list_service_line_items(&self, service_id: i64) -> ShopResult<Vec<TicketLineItem>> {
        let rows: Vec<TicketLineItemRow> = sqlx::query_as(
            "SELECT * FROM ticket_line_items WHERE service_id = ? ORDER BY line_item_id ASC",
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TicketLineItem::from).collect())
    }

    // ==================== Service Tickets ====================

    /// Open a ticket, stamping `opened_at` with the current time.
    pub async fn create_ticket(&self, ticket: &NewServiceTicket) -> ShopResult<ServiceTicket> {
        let row: ServiceTicketRow = sqlx::query_as(
            r#"
            INSERT INTO service_tickets (
                vehicle_id, customer_id, status, opened_at,
                problem_description, odometer_miles, priority
            ) VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(ticket.vehicle_id)
        .bind(ticket.customer_id)
        .bind(&ticket.status)
        .bind(Utc::now().to_rfc3339())
        .bind(&ticket.problem_description)
        .bind(ticket.odometer_miles)
        .bind(ticket.priority)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Get a ticket by ID.
    pub async fn get_ticket(&self, id: i64) -> ShopResult<ServiceTicket> {
        let row: ServiceTicketRow =
            sqlx::query_as("SELECT * FROM service_tickets WHERE ticket_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ShopError::NotFound(format!("Ticket {} not found", id)))?;

        row.try_into()
    }

    /// List all tickets.
    pub async fn list_tickets(&self) -> ShopResult<Vec<ServiceTicket>> {
        let rows: Vec<ServiceTicketRow> =
            sqlx::query_as("SELECT * FROM service_tickets ORDER BY ticket_id ASC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }

    /// Replace a ticket's columns. `opened_at` and `closed_at` are kept.
    pub async fn update_ticket(
        &self,
        id: i64,
        ticket: &NewServiceTicket,
    ) -> ShopResult<ServiceTicket> {
        let row: ServiceTicketRow = sqlx::query_as(
            r#"
            UPDATE service_tickets
            SET vehicle_id = ?, customer_id = ?, status = ?,
                problem_description = ?, odometer_miles = ?, priority = ?
            WHERE ticket_id = ?
            RETURNING *
            "#,
        )
        .bind(ticket.vehicle_id)
        .bind(ticket.customer_id)
        .bind(&ticket.status)
        .bind(&ticket.problem_description)
        .bind(ticket.odometer_miles)
        .bind(ticket.priority)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Ticket {} not found", id)))?;

        row.try_into()
    }

    /// Set a ticket's final status and stamp `closed_at`.
    pub async fn close_ticket(&self, id: i64, status: &str) -> ShopResult<ServiceTicket> {
        let row: ServiceTicketRow = sqlx::query_as(
            r#"
            UPDATE service_tickets
            SET status = ?, closed_at = ?
            WHERE ticket_id = ?
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Ticket {} not found", id)))?;

        row.try_into()
    }

    /// Delete a ticket. Fails while line items or assignments reference it.
    pub async fn delete_ticket(&self, id: i64) -> ShopResult<()> {
        self.delete_by_id("DELETE FROM service_tickets WHERE ticket_id = ?", id, "Ticket")
            .await
    }

    // ==================== Line Items ====================

    /// Add a line item to a ticket.
    pub async fn create_line_item(&self, item: &NewTicketLineItem) -> ShopResult<TicketLineItem> {
        let row: TicketLineItemRow = sqlx::query_as(
            r#"
            INSERT INTO ticket_line_items (
                ticket_id, service_id, line_type, description, quantity, unit_price_cents
            ) VALUES (?, ?, ?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(item.ticket_id)
        .bind(item.service_id)
        .bind(&item.line_type)
        .bind(&item.description)
        .bind(item.stored_quantity())
        .bind(item.unit_price_cents)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Get a line item by ID.
    pub async fn get_line_item(&self, id: i64) -> ShopResult<TicketLineItem> {
        let row: TicketLineItemRow =
            sqlx::query_as("SELECT * FROM ticket_line_items WHERE line_item_id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?
                .ok_or_else(|| ShopError::NotFound(format!("Line item {} not found", id)))?;

        Ok(row.into())
    }

    /// List all line items across tickets.
    pub async fn list_line_items(&self) -> ShopResult<Vec<TicketLineItem>> {
        let rows: Vec<TicketLineItemRow> =
            sqlx::query_as("SELECT * FROM ticket_line_items ORDER BY line_item_id ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(TicketLineItem::from).collect())
    }

    /// Replace a line item's columns.
    pub async fn update_line_item(
        &self,
        id: i64,
        item: &NewTicketLineItem,
    ) -> ShopResult<TicketLineItem> {
        let row: TicketLineItemRow = sqlx::query_as(
            r#"
            UPDATE ticket_line_items
            SET ticket_id = ?, service_id = ?, line_type = ?,
                description = ?, quantity = ?, unit_price_cents = ?
            WHERE line_item_id = ?
            RETURNING *
            "#,
        )
        .bind(item.ticket_id)
        .bind(item.service_id)
        .bind(&item.line_type)
        .bind(&item.description)
        .bind(item.stored_quantity())
        .bind(item.unit_price_cents)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| ShopError::NotFound(format!("Line item {} not found", id)))?;

        Ok(row.into())
    }

    /// Delete a line item.
    pub async fn delete_line_item(&self, id: i64) -> ShopResult<()> {
        self.delete_by_id(
            "DELETE FROM ticket_line_items WHERE line_item_id = ?",
            id,
            "Line item",
        )
        .await
    }

    /// Line items on a ticket.
    pub async fn list_ticket_line_items(&self, ticket_id: i64) -> ShopResult<Vec<TicketLineItem>> {
        let rows: Vec<TicketLineItemRow> = sqlx::query_as(
            "SELECT * FROM ticket_line_items WHERE ticket_id = ? ORDER BY line_item_id ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TicketLineItem::from).collect())
    }

    // ==================== Ticket Mechanics ====================

    /// Assign a mechanic to a ticket. A pair can only be assigned once.
    pub async fn assign_mechanic(&self, assignment: &TicketMechanic) -> ShopResult<TicketMechanic> {
        let row: TicketMechanicRow = sqlx::query_as(
            r#"
            INSERT INTO ticket_mechanics (ticket_id, mechanic_id, role, minutes_worked)
            VALUES (?, ?, ?, ?)
            RETURNING *
            "#,
        )
        .bind(assignment.ticket_id)
        .bind(assignment.mechanic_id)
        .bind(&assignment.role)
        .bind(assignment.minutes_worked)
        .fetch_one(&self.pool)
        .await?;

        row.try_into()
    }

    /// Get the assignment for a (ticket, mechanic) pair.
    pub async fn get_assignment(
        &self,
        ticket_id: i64,
        mechanic_id: i64,
    ) -> ShopResult<TicketMechanic> {
        let row: TicketMechanicRow = sqlx::query_as(
            "SELECT * FROM ticket_mechanics WHERE ticket_id = ? AND mechanic_id = ?",
        )
        .bind(ticket_id)
        .bind(mechanic_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            ShopError::NotFound(format!(
                "Mechanic {} is not assigned to ticket {}",
                mechanic_id, ticket_id
            ))
        })?;

        row.try_into()
    }

    /// Update role and minutes for an existing assignment.
    pub async fn update_assignment(
        &self,
        ticket_id: i64,
        mechanic_id: i64,
        role: &str,
        minutes_worked: i32,
    ) -> ShopResult<TicketMechanic> {
        let row: TicketMechanicRow = sqlx::query_as(
            r#"
            UPDATE ticket_mechanics
            SET role = ?, minutes_worked = ?
            WHERE ticket_id = ? AND mechanic_id = ?
            RETURNING *
            "#,
        )
        .bind(role)
        .bind(minutes_worked)
        .bind(ticket_id)
        .bind(mechanic_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            ShopError::NotFound(format!(
                "Mechanic {} is not assigned to ticket {}",
                mechanic_id, ticket_id
            ))
        })?;

        row.try_into()
    }

    /// Remove a mechanic from a ticket.
    pub async fn unassign_mechanic(&self, ticket_id: i64, mechanic_id: i64) -> ShopResult<()> {
        let result =
            sqlx::query("DELETE FROM ticket_mechanics WHERE ticket_id = ? AND mechanic_id = ?")
                .bind(ticket_id)
                .bind(mechanic_id)
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(ShopError::NotFound(format!(
                "Mechanic {} is not assigned to ticket {}",
                mechanic_id, ticket_id
            )));
        }

        Ok(())
    }

    /// Assignments on a ticket.
    pub async fn list_ticket_mechanics(&self, ticket_id: i64) -> ShopResult<Vec<TicketMechanic>> {
        let rows: Vec<TicketMechanicRow> = sqlx::query_as(
            "SELECT * FROM ticket_mechanics WHERE ticket_id = ? ORDER BY mechanic_id ASC",
        )
        .bind(ticket_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(|r| r.try_into()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    async fn setup_test_db() -> ShopRepository {
        let config = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
        };
        let repo = ShopRepository::connect(&config)
            .await
            .expect("Failed to create test database");
        repo.init_schema().await.expect("Failed to init schema");
        repo
    }

    fn new_customer(first_name: &str) -> NewCustomer {
        NewCustomer {
            first_name: first_name.to_string(),
            last_name: "Driver".to_string(),
            email: format!("{}@example.com", first_name.to_lowercase()),
            phone: "555-0100".to_string(),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            postal_code: "62701".to_string(),
        }
    }

    fn new_vehicle(customer_id: i64, vin: &str) -> NewVehicle {
        NewVehicle {
            customer_id,
            vin: vin.to_string(),
            make: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: 2018,
            color: "Silver".to_string(),
        }
    }

    fn new_mechanic(email: &str) -> NewMechanic {
        NewMechanic {
            full_name: "Sam Wrench".to_string(),
            email: email.to_string(),
            phone: "555-0199".to_string(),
            salary: 48_000,
            is_active: true,
        }
    }

    fn new_service() -> NewService {
        NewService {
            name: "Oil change".to_string(),
            default_labor_minutes: 30,
            base_price_cents: 4_999,
        }
    }

    fn new_ticket(vehicle: &Vehicle) -> NewServiceTicket {
        NewServiceTicket {
            vehicle_id: vehicle.vehicle_id,
            customer_id: vehicle.customer_id,
            status: "open".to_string(),
            problem_description: "Engine light on".to_string(),
            odometer_miles: 61_250,
            priority: 1,
        }
    }

    /// Customer, vehicle and an open ticket.
    async fn seed_ticket(repo: &ShopRepository) -> (Customer, Vehicle, ServiceTicket) {
        let customer = repo.create_customer(&new_customer("Pat")).await.unwrap();
        let vehicle = repo
            .create_vehicle(&new_vehicle(customer.customer_id, "JH4KA8260MC000001"))
            .await
            .unwrap();
        let ticket = repo.create_ticket(&new_ticket(&vehicle)).await.unwrap();
        (customer, vehicle, ticket)
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        let repo = setup_test_db().await;
        assert_ok!(repo.init_schema().await);

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(repo.pool())
        .await
        .unwrap();
        let names: Vec<_> = tables.into_iter().map(|(n,)| n).collect();
        assert_eq!(
            names,
            vec![
                "customers",
                "mechanics",
                "service_tickets",
                "services",
                "ticket_line_items",
                "ticket_mechanics",
                "vehicles",
            ]
        );
    }

    #[tokio::test]
    async fn test_create_and_get_customer() {
        let repo = setup_test_db().await;

        let created = repo.create_customer(&new_customer("Alice")).await.unwrap();
        assert!(created.customer_id > 0);
        assert_eq!(created.first_name, "Alice");
        assert_eq!(created.email, "alice@example.com");

        let fetched = repo.get_customer(created.customer_id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_customer_roundtrips_through_json() {
        let repo = setup_test_db().await;
        let created = repo.create_customer(&new_customer("Alice")).await.unwrap();

        let json = serde_json::to_value(&created).unwrap();
        assert_eq!(json["customer_id"], created.customer_id);
        assert_eq!(json["postal_code"], "62701");

        let parsed: Customer = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, repo.get_customer(created.customer_id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_customers_in_insertion_order() {
        let repo = setup_test_db().await;
        for name in ["Carol", "Alice", "Bob"] {
            repo.create_customer(&new_customer(name)).await.unwrap();
        }

        let customers = repo.list_customers().await.unwrap();
        let names: Vec<_> = customers.iter().map(|c| c.first_name.as_str()).collect();
        assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
        assert!(customers.iter().all(|c| !c.city.is_empty()));
    }

    #[tokio::test]
    async fn test_update_and_delete_customer() {
        let repo = setup_test_db().await;
        let created = repo.create_customer(&new_customer("Alice")).await.unwrap();

        let mut changes = new_customer("Alice");
        changes.city = "Shelbyville".to_string();
        let updated = repo
            .update_customer(created.customer_id, &changes)
            .await
            .unwrap();
        assert_eq!(updated.city, "Shelbyville");
        assert_eq!(updated.created_at, created.created_at);

        repo.delete_customer(created.customer_id).await.unwrap();
        let err = assert_err!(repo.get_customer(created.customer_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));

        let err = assert_err!(repo.delete_customer(created.customer_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_missing_customer_is_not_found() {
        let repo = setup_test_db().await;
        let err = assert_err!(repo.update_customer(42, &new_customer("Nobody")).await);
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_duplicate_vin_is_unique_violation() {
        let repo = setup_test_db().await;
        let customer = repo.create_customer(&new_customer("Alice")).await.unwrap();

        repo.create_vehicle(&new_vehicle(customer.customer_id, "VIN-0001"))
            .await
            .unwrap();
        let err = assert_err!(
            repo.create_vehicle(&new_vehicle(customer.customer_id, "VIN-0001"))
                .await
        );
        assert!(matches!(err, ShopError::UniqueViolation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_vehicle_requires_existing_customer() {
        let repo = setup_test_db().await;
        let err = assert_err!(repo.create_vehicle(&new_vehicle(999, "VIN-0002")).await);
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_delete_customer_with_vehicles_is_rejected() {
        let repo = setup_test_db().await;
        let customer = repo.create_customer(&new_customer("Alice")).await.unwrap();
        repo.create_vehicle(&new_vehicle(customer.customer_id, "VIN-0003"))
            .await
            .unwrap();

        let err = assert_err!(repo.delete_customer(customer.customer_id).await);
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert_ok!(repo.get_customer(customer.customer_id).await);
    }

    #[tokio::test]
    async fn test_duplicate_mechanic_email_is_unique_violation() {
        let repo = setup_test_db().await;
        let first = repo
            .create_mechanic(&new_mechanic("sam@shop.test"))
            .await
            .unwrap();
        assert!(first.is_active);

        let err = assert_err!(repo.create_mechanic(&new_mechanic("sam@shop.test")).await);
        assert!(matches!(err, ShopError::UniqueViolation(_)), "got {err:?}");
        assert_eq!(repo.list_mechanics().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_mechanic_update_toggles_active() {
        let repo = setup_test_db().await;
        let mechanic = repo
            .create_mechanic(&new_mechanic("sam@shop.test"))
            .await
            .unwrap();

        let mut changes = new_mechanic("sam@shop.test");
        changes.is_active = false;
        changes.salary = 51_000;
        let updated = repo
            .update_mechanic(mechanic.mechanic_id, &changes)
            .await
            .unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.salary, 51_000);
    }

    #[tokio::test]
    async fn test_ticket_lifecycle() {
        let repo = setup_test_db().await;
        let (customer, vehicle, ticket) = seed_ticket(&repo).await;

        assert_eq!(ticket.status, "open");
        assert!(!ticket.is_closed());

        let by_customer = repo
            .list_customer_tickets(customer.customer_id)
            .await
            .unwrap();
        assert_eq!(by_customer, vec![ticket.clone()]);
        let by_vehicle = repo.list_vehicle_tickets(vehicle.vehicle_id).await.unwrap();
        assert_eq!(by_vehicle, vec![ticket.clone()]);

        let closed = repo.close_ticket(ticket.ticket_id, "completed").await.unwrap();
        assert_eq!(closed.status, "completed");
        assert!(closed.is_closed());
        assert_eq!(closed.opened_at, ticket.opened_at);

        let err = assert_err!(repo.close_ticket(999, "completed").await);
        assert!(matches!(err, ShopError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_ticket_requires_existing_vehicle() {
        let repo = setup_test_db().await;
        let customer = repo.create_customer(&new_customer("Alice")).await.unwrap();

        let err = assert_err!(
            repo.create_ticket(&NewServiceTicket {
                vehicle_id: 77,
                customer_id: customer.customer_id,
                status: "open".to_string(),
                problem_description: "Flat tire".to_string(),
                odometer_miles: 1_000,
                priority: 3,
            })
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_line_items() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;
        let service = repo.create_service(&new_service()).await.unwrap();

        let item = repo
            .create_line_item(&NewTicketLineItem {
                ticket_id: ticket.ticket_id,
                service_id: service.service_id,
                line_type: "labor".to_string(),
                description: "Drain and refill".to_string(),
                quantity: 1.5,
                unit_price_cents: 8_000,
            })
            .await
            .unwrap();
        assert_eq!(item.quantity, 1.5);

        let part = repo
            .create_line_item(&NewTicketLineItem {
                ticket_id: ticket.ticket_id,
                service_id: service.service_id,
                line_type: "part".to_string(),
                description: "Oil filter".to_string(),
                quantity: 1.0,
                unit_price_cents: 1_200,
            })
            .await
            .unwrap();
        assert_eq!(part.quantity, 1.0);

        let on_ticket = repo.list_ticket_line_items(ticket.ticket_id).await.unwrap();
        assert_eq!(on_ticket, vec![item.clone(), part.clone()]);
        let on_service = repo
            .list_service_line_items(service.service_id)
            .await
            .unwrap();
        assert_eq!(on_service.len(), 2);

        // Services and tickets with line items cannot be deleted
        let err = assert_err!(repo.delete_service(service.service_id).await);
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)));

        repo.delete_line_item(part.line_item_id).await.unwrap();
        assert_eq!(
            repo.list_ticket_line_items(ticket.ticket_id)
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_line_item_requires_existing_service() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;

        let err = assert_err!(
            repo.create_line_item(&NewTicketLineItem {
                ticket_id: ticket.ticket_id,
                service_id: 404,
                line_type: "part".to_string(),
                description: "Wiper blades".to_string(),
                quantity: 2.0,
                unit_price_cents: 900,
            })
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_mechanic_assignment() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;
        let lead = repo
            .create_mechanic(&new_mechanic("lead@shop.test"))
            .await
            .unwrap();
        let helper = repo
            .create_mechanic(&new_mechanic("helper@shop.test"))
            .await
            .unwrap();

        let assignment = TicketMechanic {
            ticket_id: ticket.ticket_id,
            mechanic_id: lead.mechanic_id,
            role: "lead".to_string(),
            minutes_worked: 45,
        };
        repo.assign_mechanic(&assignment).await.unwrap();
        repo.assign_mechanic(&TicketMechanic {
            mechanic_id: helper.mechanic_id,
            role: "assistant".to_string(),
            ..assignment.clone()
        })
        .await
        .unwrap();

        // Same pair twice
        let err = assert_err!(repo.assign_mechanic(&assignment).await);
        assert!(matches!(err, ShopError::UniqueViolation(_)), "got {err:?}");

        let crew = repo.list_ticket_mechanics(ticket.ticket_id).await.unwrap();
        assert_eq!(crew.len(), 2);
        assert_eq!(crew[0], assignment);

        let tickets = repo.list_mechanic_tickets(helper.mechanic_id).await.unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].ticket_id, ticket.ticket_id);

        let updated = repo
            .update_assignment(ticket.ticket_id, lead.mechanic_id, "lead", 90)
            .await
            .unwrap();
        assert_eq!(updated.minutes_worked, 90);

        repo.unassign_mechanic(ticket.ticket_id, helper.mechanic_id)
            .await
            .unwrap();
        let err = assert_err!(
            repo.get_assignment(ticket.ticket_id, helper.mechanic_id)
                .await
        );
        assert!(matches!(err, ShopError::NotFound(_)));
        assert!(repo
            .list_mechanic_tickets(helper.mechanic_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_assignment_requires_existing_mechanic() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;

        let err = assert_err!(
            repo.assign_mechanic(&TicketMechanic {
                ticket_id: ticket.ticket_id,
                mechanic_id: 12,
                role: "lead".to_string(),
                minutes_worked: 0,
            })
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_customer_vehicles_only_returns_owned() {
        let repo = setup_test_db().await;
        let alice = repo.create_customer(&new_customer("Alice")).await.unwrap();
        let bob = repo.create_customer(&new_customer("Bob")).await.unwrap();

        repo.create_vehicle(&new_vehicle(alice.customer_id, "VIN-A1"))
            .await
            .unwrap();
        repo.create_vehicle(&new_vehicle(bob.customer_id, "VIN-B1"))
            .await
            .unwrap();
        repo.create_vehicle(&new_vehicle(alice.customer_id, "VIN-A2"))
            .await
            .unwrap();

        let vins: Vec<_> = repo
            .list_customer_vehicles(alice.customer_id)
            .await
            .unwrap()
            .into_iter()
            .map(|v| v.vin)
            .collect();
        assert_eq!(vins, vec!["VIN-A1", "VIN-A2"]);
        assert_eq!(repo.list_vehicles().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_service_crud() {
        let repo = setup_test_db().await;
        let service = repo.create_service(&new_service()).await.unwrap();
        assert_eq!(service.base_price_cents, 4_999);

        let updated = repo
            .update_service(
                service.service_id,
                &NewService {
                    name: "Synthetic oil change".to_string(),
                    default_labor_minutes: 40,
                    base_price_cents: 7_999,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.default_labor_minutes, 40);
        assert_eq!(repo.get_service(service.service_id).await.unwrap(), updated);
        assert_eq!(repo.list_services().await.unwrap(), vec![updated]);

        repo.delete_service(service.service_id).await.unwrap();
        assert!(repo.list_services().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_line_items_spans_tickets() {
        let repo = setup_test_db().await;
        let (customer, vehicle, first) = seed_ticket(&repo).await;
        let second = repo.create_ticket(&new_ticket(&vehicle)).await.unwrap();
        let service = repo.create_service(&new_service()).await.unwrap();
        assert!(repo.list_line_items().await.unwrap().is_empty());

        let mut created = Vec::new();
        for (ticket_id, description) in [
            (second.ticket_id, "Tire rotation"),
            (first.ticket_id, "Brake pads"),
        ] {
            created.push(
                repo.create_line_item(&NewTicketLineItem {
                    ticket_id,
                    service_id: service.service_id,
                    line_type: "labor".to_string(),
                    description: description.to_string(),
                    quantity: 1.0,
                    unit_price_cents: 6_500,
                })
                .await
                .unwrap(),
            );
        }

        let all = repo.list_line_items().await.unwrap();
        assert_eq!(all, created);
        assert_eq!(all[0].ticket_id, second.ticket_id);
        assert_eq!(
            repo.list_customer_tickets(customer.customer_id)
                .await
                .unwrap()
                .len(),
            2
        );
    }

    #[tokio::test]
    async fn test_ticket_requires_existing_customer() {
        let repo = setup_test_db().await;
        let (_, vehicle, _) = seed_ticket(&repo).await;

        let err = assert_err!(
            repo.create_ticket(&NewServiceTicket {
                customer_id: 555,
                ..new_ticket(&vehicle)
            })
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert_eq!(repo.list_tickets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_line_item_requires_existing_ticket() {
        let repo = setup_test_db().await;
        let service = repo.create_service(&new_service()).await.unwrap();

        let err = assert_err!(
            repo.create_line_item(&NewTicketLineItem {
                ticket_id: 321,
                service_id: service.service_id,
                line_type: "part".to_string(),
                description: "Cabin filter".to_string(),
                quantity: 1.0,
                unit_price_cents: 2_400,
            })
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert!(repo.list_line_items().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_assignment_requires_existing_ticket() {
        let repo = setup_test_db().await;
        let mechanic = repo
            .create_mechanic(&new_mechanic("sam@shop.test"))
            .await
            .unwrap();

        let err = assert_err!(
            repo.assign_mechanic(&TicketMechanic {
                ticket_id: 88,
                mechanic_id: mechanic.mechanic_id,
                role: "lead".to_string(),
                minutes_worked: 0,
            })
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert!(repo
            .list_mechanic_tickets(mechanic.mechanic_id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_update_list_delete_ticket() {
        let repo = setup_test_db().await;
        let (_, vehicle, ticket) = seed_ticket(&repo).await;

        let updated = repo
            .update_ticket(
                ticket.ticket_id,
                &NewServiceTicket {
                    status: "in_progress".to_string(),
                    problem_description: "Engine light on, rough idle".to_string(),
                    priority: 2,
                    ..new_ticket(&vehicle)
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, "in_progress");
        assert_eq!(updated.priority, 2);
        assert_eq!(updated.opened_at, ticket.opened_at);
        assert_eq!(updated.closed_at, None);

        let err = assert_err!(repo.update_ticket(999, &new_ticket(&vehicle)).await);
        assert!(matches!(err, ShopError::NotFound(_)));

        let err = assert_err!(
            repo.update_ticket(
                ticket.ticket_id,
                &NewServiceTicket {
                    vehicle_id: 4_040,
                    ..new_ticket(&vehicle)
                },
            )
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");

        let second = repo.create_ticket(&new_ticket(&vehicle)).await.unwrap();
        let ids: Vec<_> = repo
            .list_tickets()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.ticket_id)
            .collect();
        assert_eq!(ids, vec![ticket.ticket_id, second.ticket_id]);

        repo.delete_ticket(ticket.ticket_id).await.unwrap();
        let err = assert_err!(repo.get_ticket(ticket.ticket_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));
        let err = assert_err!(repo.delete_ticket(ticket.ticket_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));
        assert_eq!(repo.list_tickets().await.unwrap(), vec![second]);
    }

    #[tokio::test]
    async fn test_delete_ticket_with_line_items_is_rejected() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;
        let service = repo.create_service(&new_service()).await.unwrap();
        repo.create_line_item(&NewTicketLineItem {
            ticket_id: ticket.ticket_id,
            service_id: service.service_id,
            line_type: "part".to_string(),
            description: "Spark plugs".to_string(),
            quantity: 4.0,
            unit_price_cents: 850,
        })
        .await
        .unwrap();

        let err = assert_err!(repo.delete_ticket(ticket.ticket_id).await);
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert_ok!(repo.get_ticket(ticket.ticket_id).await);
    }

    #[tokio::test]
    async fn test_get_and_update_line_item() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;
        let service = repo.create_service(&new_service()).await.unwrap();
        let request = NewTicketLineItem {
            ticket_id: ticket.ticket_id,
            service_id: service.service_id,
            line_type: "labor".to_string(),
            description: "Diagnose misfire".to_string(),
            quantity: 0.5,
            unit_price_cents: 9_000,
        };
        let item = repo.create_line_item(&request).await.unwrap();

        assert_eq!(repo.get_line_item(item.line_item_id).await.unwrap(), item);
        let err = assert_err!(repo.get_line_item(item.line_item_id + 100).await);
        assert!(matches!(err, ShopError::NotFound(_)));

        let updated = repo
            .update_line_item(
                item.line_item_id,
                &NewTicketLineItem {
                    quantity: 1.25,
                    description: "Diagnose and replace coil".to_string(),
                    ..request.clone()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.line_item_id, item.line_item_id);
        assert_eq!(updated.quantity, 1.25);
        assert_eq!(updated.description, "Diagnose and replace coil");
        assert_eq!(repo.get_line_item(item.line_item_id).await.unwrap(), updated);

        let err = assert_err!(repo.update_line_item(999, &request).await);
        assert!(matches!(err, ShopError::NotFound(_)));

        let err = assert_err!(
            repo.update_line_item(
                item.line_item_id,
                &NewTicketLineItem {
                    service_id: 606,
                    ..request.clone()
                },
            )
            .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_update_and_delete_vehicle() {
        let repo = setup_test_db().await;
        let alice = repo.create_customer(&new_customer("Alice")).await.unwrap();
        let bob = repo.create_customer(&new_customer("Bob")).await.unwrap();
        let vehicle = repo
            .create_vehicle(&new_vehicle(alice.customer_id, "VIN-0010"))
            .await
            .unwrap();
        let other = repo
            .create_vehicle(&new_vehicle(alice.customer_id, "VIN-0011"))
            .await
            .unwrap();

        let sold = repo
            .update_vehicle(
                vehicle.vehicle_id,
                &NewVehicle {
                    color: "Red".to_string(),
                    ..new_vehicle(bob.customer_id, "VIN-0010")
                },
            )
            .await
            .unwrap();
        assert_eq!(sold.customer_id, bob.customer_id);
        assert_eq!(sold.color, "Red");
        assert_eq!(repo.get_vehicle(vehicle.vehicle_id).await.unwrap(), sold);

        let err = assert_err!(
            repo.update_vehicle(
                vehicle.vehicle_id,
                &new_vehicle(bob.customer_id, &other.vin)
            )
            .await
        );
        assert!(matches!(err, ShopError::UniqueViolation(_)), "got {err:?}");

        let err = assert_err!(
            repo.update_vehicle(vehicle.vehicle_id, &new_vehicle(9_999, "VIN-0010"))
                .await
        );
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");

        let err = assert_err!(
            repo.update_vehicle(999, &new_vehicle(bob.customer_id, "VIN-0012"))
                .await
        );
        assert!(matches!(err, ShopError::NotFound(_)));

        repo.delete_vehicle(other.vehicle_id).await.unwrap();
        let err = assert_err!(repo.get_vehicle(other.vehicle_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));
        let err = assert_err!(repo.delete_vehicle(other.vehicle_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));
        assert_eq!(repo.list_vehicles().await.unwrap(), vec![sold]);
    }

    #[tokio::test]
    async fn test_delete_vehicle_with_tickets_is_rejected() {
        let repo = setup_test_db().await;
        let (_, vehicle, _) = seed_ticket(&repo).await;

        let err = assert_err!(repo.delete_vehicle(vehicle.vehicle_id).await);
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert_ok!(repo.get_vehicle(vehicle.vehicle_id).await);
    }

    #[tokio::test]
    async fn test_delete_mechanic() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;
        let idle = repo
            .create_mechanic(&new_mechanic("idle@shop.test"))
            .await
            .unwrap();
        let busy = repo
            .create_mechanic(&new_mechanic("busy@shop.test"))
            .await
            .unwrap();
        repo.assign_mechanic(&TicketMechanic {
            ticket_id: ticket.ticket_id,
            mechanic_id: busy.mechanic_id,
            role: "lead".to_string(),
            minutes_worked: 15,
        })
        .await
        .unwrap();

        repo.delete_mechanic(idle.mechanic_id).await.unwrap();
        let err = assert_err!(repo.get_mechanic(idle.mechanic_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));
        let err = assert_err!(repo.delete_mechanic(idle.mechanic_id).await);
        assert!(matches!(err, ShopError::NotFound(_)));

        let err = assert_err!(repo.delete_mechanic(busy.mechanic_id).await);
        assert!(matches!(err, ShopError::ForeignKeyViolation(_)), "got {err:?}");
        assert_eq!(repo.list_mechanics().await.unwrap(), vec![busy]);
    }

    #[tokio::test]
    async fn test_get_assignment() {
        let repo = setup_test_db().await;
        let (_, _, ticket) = seed_ticket(&repo).await;
        let mechanic = repo
            .create_mechanic(&new_mechanic("sam@shop.test"))
            .await
            .unwrap();
        let assignment = TicketMechanic {
            ticket_id: ticket.ticket_id,
            mechanic_id: mechanic.mechanic_id,
            role: "inspector".to_string(),
            minutes_worked: 20,
        };

        let created = repo.assign_mechanic(&assignment).await.unwrap();
        assert_eq!(created, assignment);
        assert_eq!(
            repo.get_assignment(ticket.ticket_id, mechanic.mechanic_id)
                .await
                .unwrap(),
            assignment
        );

        let err = assert_err!(
            repo.update_assignment(ticket.ticket_id, mechanic.mechanic_id + 1, "lead", 5)
                .await
        );
        assert!(matches!(err, ShopError::NotFound(_)));
        let err = assert_err!(
            repo.unassign_mechanic(ticket.ticket_id + 1, mechanic.mechanic_id)
                .await
        );
        assert!(matches!(err, ShopError::NotFound(_)));
    }
}
