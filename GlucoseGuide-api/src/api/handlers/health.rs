use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use glucose_guide_domain::health::{ComponentStatus as DomainComponentStatus, SystemStatus};

use crate::api::state::AppState;

/// Health check response model
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Current service status ("ok" or "error")
    pub status: String,
    /// Current application version from Cargo manifest
    pub version: String,
    /// Unix timestamp of when the response was generated
    pub timestamp: i64,
    /// Uptime of the service in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<i64>,
    /// Details about the system components
    pub components: ComponentStatus,
    /// Environment information
    pub environment: String,
}

/// Status of individual system components
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentStatus {
    /// Database connection status
    pub database: ComponentHealthStatus,
}

/// Health status for an individual component
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ComponentHealthStatus {
    /// Status of the component ("ok" or "error")
    pub status: String,
    /// Optional message with more details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// Unix time at which the server started
static SERVER_START_TIME: OnceCell<i64> = OnceCell::new();

/// Record the server start time; later calls keep the first value
pub fn initialize_server_start_time() {
    let _ = SERVER_START_TIME.set(Utc::now().timestamp());
}

/// Health check endpoint to verify the API and its database
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "API is healthy", body = HealthResponse),
        (status = 500, description = "Database is unreachable", body = HealthResponse)
    ),
    tag = "health"
)]
#[instrument(skip(state))]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    info!("Health check requested");

    let now = Utc::now().timestamp();
    let uptime = SERVER_START_TIME.get().map(|&start| (now - start).max(0));

    let system_health = state.health_service.get_system_health().await;

    let (status_code, overall_status) = match system_health.status {
        SystemStatus::Healthy => (StatusCode::OK, "ok"),
        SystemStatus::Unhealthy => {
            warn!("Health check failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "error")
        }
    };

    let database = system_health.components.get("database");
    let response = HealthResponse {
        status: overall_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: now,
        uptime,
        components: ComponentStatus {
            database: ComponentHealthStatus {
                status: map_component_status(
                    database
                        .map(|c| &c.status)
                        .unwrap_or(&DomainComponentStatus::Unhealthy),
                ),
                message: database.and_then(|c| c.details.clone()),
            },
        },
        environment: state.environment.clone(),
    };

    (status_code, Json(response))
}

/// Map domain component status to API status string
fn map_component_status(status: &DomainComponentStatus) -> String {
    match status {
        DomainComponentStatus::Healthy => "ok",
        DomainComponentStatus::Unhealthy => "error",
    }
    .to_string()
}
