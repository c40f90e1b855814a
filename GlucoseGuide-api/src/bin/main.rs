use std::net::SocketAddr;

use anyhow::Context;
use dotenv::dotenv;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use glucose_guide_api::{create_application, AppConfig};
use glucose_guide_data::database::{DatabaseConfig, DatabasePool};

/// The main entry point for the GlucoseGuide API server
///
/// This function:
/// 1. Initializes environment variables from .env file
/// 2. Sets up tracing for logging
/// 3. Opens the database pool and brings the schema up to date
/// 4. Creates and starts the Axum web application
/// 5. Handles graceful shutdown
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    let dotenv_missing = dotenv().is_err();

    // Initialize tracing for structured logging
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_span_events(FmtSpan::CLOSE)
                .with_target(false)
                .with_ansi(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stdout),
        )
        .with(env_filter)
        .init();

    if dotenv_missing {
        warn!(".env file not found or couldn't be read. Using environment variables.");
    }

    info!("Starting GlucoseGuide API server");

    let db_config = DatabaseConfig::from_env().context("invalid database configuration")?;
    let pool = DatabasePool::connect(&db_config).context("failed to open the database")?;
    info!("Database ready: {}", pool.connection_info());

    let config = AppConfig::from_env().context("invalid server configuration")?;
    let app = create_application(pool, &config);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    // Serve the application with graceful shutdown support
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or, on Unix, SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down server...");
}
