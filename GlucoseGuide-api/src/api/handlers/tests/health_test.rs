use axum::http::StatusCode;
use tower::ServiceExt;

use glucose_guide_domain::testing::{InMemoryGlucoseRecordRepository, MockHealthService};

use super::{body_json, empty_request, test_app};

#[tokio::test]
async fn test_health_check_healthy() {
    let app = test_app(InMemoryGlucoseRecordRepository::new(), MockHealthService::new());

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"]["database"]["status"], "ok");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime"].as_i64().unwrap() >= 0);
}

#[tokio::test]
async fn test_health_check_unhealthy_database() {
    let app = test_app(
        InMemoryGlucoseRecordRepository::new(),
        MockHealthService::new().with_unhealthy_database(),
    );

    let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["status"], "error");
    assert_eq!(body["components"]["database"]["status"], "error");
    assert!(body["components"]["database"]["message"]
        .as_str()
        .unwrap()
        .contains("mock failure"));
}
