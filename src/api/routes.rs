//! Route definitions for the API.

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::AppState;

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::create_customer,
        handlers::list_customers,
        handlers::get_customer,
        handlers::update_customer,
        handlers::delete_customer,
        handlers::health_check,
    ),
    components(schemas(
        crate::api::types::HealthResponse,
        crate::domain::Customer,
        crate::domain::NewCustomer,
    )),
    tags(
        (name = "customers", description = "Customer records"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Mechanic Shop API",
        version = "0.1.0",
        description = "Customers, vehicles and service tickets for a mechanic shop",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// The customers resource group, mounted at `/customers`.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/customers/:id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
}

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(customer_routes())
        .route("/health", get(handlers::health_check))
        .with_state(state)
        // OpenAPI docs
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
