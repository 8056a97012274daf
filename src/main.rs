//! Mechanic Shop server.
//!
//! Loads configuration, creates the schema and serves the customers
//! resource until interrupted.

use tokio::net::TcpListener;
use tokio::signal;

use mechanic_shop::api::build_router;
use mechanic_shop::config::Config;
use mechanic_shop::logging;
use mechanic_shop::storage::ShopRepository;
use mechanic_shop::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if present)
    if let Err(e) = dotenvy::dotenv() {
        // Missing .env is expected in production
        eprintln!("Note: No .env file loaded ({e})");
    }

    // Logging depends on the profile, so configuration errors go to stderr
    let config = Config::load().map_err(|e| anyhow::anyhow!("Configuration error: {}", e))?;

    logging::init(&config)?;

    tracing::info!("Starting Mechanic Shop v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        profile = %config.profile,
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.url,
        debug = config.debug,
        "Configuration loaded"
    );

    let repository = ShopRepository::connect(&config.database)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to connect to database");
            anyhow::anyhow!("Database connection error: {}", e)
        })?;

    repository.init_schema().await.map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize database schema");
        anyhow::anyhow!("Schema initialization error: {}", e)
    })?;

    tracing::info!("Database connected and tables created");

    let state = AppState {
        repository: repository.clone(),
        profile: config.profile,
    };
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!(address = %addr, "Server listening");
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    repository.close().await;
    tracing::info!("Database pool closed, server stopped");

    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received, shutting down"),
        _ = terminate => tracing::info!("Termination signal received, shutting down"),
    }
}
