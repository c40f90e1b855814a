mod health_test;

use std::sync::Arc;

use axum::{body::Body, http::Request, response::Response, Router};
use serde_json::Value;

use glucose_guide_domain::health::HealthServiceTrait;
use glucose_guide_domain::services::create_mock_glucose_record_service;
use glucose_guide_domain::testing::{InMemoryGlucoseRecordRepository, MockHealthService};

use crate::api::routes::create_router;
use crate::api::state::AppState;
use crate::config::AppConfig;

/// Router over an in-memory repository and the given health service
pub(super) fn test_app(
    repository: InMemoryGlucoseRecordRepository,
    health_service: impl HealthServiceTrait + 'static,
) -> Router {
    let state = AppState {
        glucose_service: Arc::new(create_mock_glucose_record_service(repository)),
        health_service: Arc::new(health_service),
        environment: "test".to_string(),
    };
    create_router(state, AppConfig::default().cors_origin)
}

pub(super) fn healthy_app(repository: InMemoryGlucoseRecordRepository) -> Router {
    test_app(repository, MockHealthService::new())
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub(super) fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub(super) async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
