use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use glucose_guide_data::database::DatabasePool;

use crate::api::handlers::{glucose, health};
use crate::api::state::AppState;
use crate::config::AppConfig;
use crate::openapi::configure_swagger_routes;

/// Create the application router over an open pool
pub fn create_app(pool: DatabasePool, config: &AppConfig) -> Router {
    let state = AppState::new(pool, config.environment.clone());
    create_router(state, config.cors_origin.clone())
}

/// Assemble routes, middleware and docs around the given state
pub fn create_router(state: AppState, cors_origin: HeaderValue) -> Router {
    debug!("Creating application router");

    let record_routes = Router::new()
        .route("/add_glucose_record", post(glucose::add_glucose_record))
        .route("/get_glucose_records", get(glucose::get_glucose_records))
        .route("/update_glucose_record/:id", put(glucose::update_glucose_record))
        .route("/delete_glucose_record/:id", delete(glucose::delete_glucose_record));

    let public_routes = Router::new().route("/health", get(health::health_check));

    let app = Router::new()
        .merge(record_routes)
        .merge(public_routes)
        .with_state(state);

    debug!("Routes configured");

    // Configure the Swagger UI using the helper function
    let app = add_swagger_ui(app);

    health::initialize_server_start_time();

    app.layer(cors_layer(cors_origin))
        .layer(TraceLayer::new_for_http())
}

/// CORS policy allowing a single origin with any method and header
pub fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Add Swagger UI to the router
pub fn add_swagger_ui(app: Router) -> Router {
    app.merge(configure_swagger_routes())
}
