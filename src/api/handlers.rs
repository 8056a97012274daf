//! HTTP request handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::types::*;
use crate::domain::{Customer, NewCustomer};
use crate::error::ShopResult;
use crate::AppState;

/// Decode a JSON body into `T`.
///
/// Unparseable bodies become `BadRequest`; well-formed JSON with missing or
/// mistyped fields becomes `Serialization`.
fn parse_body<T: DeserializeOwned>(payload: Result<Json<Value>, JsonRejection>) -> ShopResult<T> {
    let Json(value) = payload?;
    Ok(serde_json::from_value(value)?)
}

// ==================== Customers ====================

/// Create a customer.
///
/// POST /customers
#[utoipa::path(
    post,
    path = "/customers",
    request_body = NewCustomer,
    responses(
        (status = 201, description = "Customer created", body = Customer),
        (status = 400, description = "Malformed body or missing/mistyped fields"),
        (status = 500, description = "Internal error")
    ),
    tag = "customers"
)]
pub async fn create_customer(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ShopResult<(StatusCode, Json<Customer>)> {
    let request: NewCustomer = parse_body(payload)?;
    let customer = state.repository.create_customer(&request).await?;

    tracing::info!(
        customer_id = customer.customer_id,
        email = %customer.email,
        "Customer created"
    );

    Ok((StatusCode::CREATED, Json(customer)))
}

/// List all customers in insertion order.
///
/// GET /customers
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "List of customers", body = Vec<Customer>),
        (status = 500, description = "Internal error")
    ),
    tag = "customers"
)]
pub async fn list_customers(State(state): State<AppState>) -> ShopResult<Json<Vec<Customer>>> {
    let customers = state.repository.list_customers().await?;

    Ok(Json(customers))
}

/// Get a customer by ID.
///
/// GET /customers/{id}
#[utoipa::path(
    get,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 200, description = "Customer details", body = Customer),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers"
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ShopResult<Json<Customer>> {
    let customer = state.repository.get_customer(id).await?;

    Ok(Json(customer))
}

/// Replace a customer's fields.
///
/// PUT /customers/{id}
#[utoipa::path(
    put,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    request_body = NewCustomer,
    responses(
        (status = 200, description = "Customer updated", body = Customer),
        (status = 404, description = "Customer not found"),
        (status = 400, description = "Malformed body or missing/mistyped fields")
    ),
    tag = "customers"
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ShopResult<Json<Customer>> {
    let request: NewCustomer = parse_body(payload)?;
    let customer = state.repository.update_customer(id, &request).await?;

    tracing::info!(customer_id = id, "Customer updated");

    Ok(Json(customer))
}

/// Delete a customer.
///
/// DELETE /customers/{id}
#[utoipa::path(
    delete,
    path = "/customers/{id}",
    params(("id" = i64, Path, description = "Customer ID")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Customer still has vehicles or tickets")
    ),
    tag = "customers"
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ShopResult<StatusCode> {
    state.repository.delete_customer(id).await?;

    tracing::info!(customer_id = id, "Customer deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ==================== Health ====================

/// Health check endpoint.
///
/// GET /health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Database unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (status, health, db_status) = match sqlx::query("SELECT 1")
        .fetch_one(state.repository.pool())
        .await
    {
        Ok(_) => (StatusCode::OK, "healthy", "connected".to_string()),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the database");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                "degraded",
                format!("error: {}", e),
            )
        }
    };

    let body = HealthResponse {
        status: health.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        profile: state.profile.to_string(),
        database: db_status,
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (status, Json(body))
}
