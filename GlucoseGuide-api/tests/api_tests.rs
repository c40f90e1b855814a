use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use glucose_guide_api::{create_application, AppConfig};
use glucose_guide_data::database::{DatabaseConfig, DatabasePool};
use glucose_guide_domain::testing::sample_observation;
use serde_json::{json, Value};
use std::sync::Once;
use tower::ServiceExt;

// Ensure tracing is initialized only once
static INIT: Once = Once::new();

fn initialize() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });
}

fn create_test_app() -> (Router, DatabasePool) {
    initialize();
    let pool = DatabasePool::in_memory().expect("Failed to open in-memory database");
    (create_application(pool.clone(), &AppConfig::default()), pool)
}

fn record_count(pool: &DatabasePool) -> i64 {
    let conn = pool.get_connection().expect("Failed to get connection");
    conn.query_row("SELECT COUNT(*) FROM glucose_records", [], |row| row.get(0))
        .expect("Failed to count records")
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<&Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .expect("Request failed")
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn add_record(app: &Router, document: &Value) -> i64 {
    let response = send(app, Method::POST, "/add_glucose_record", Some(document)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().expect("id should be an integer")
}

#[tokio::test]
async fn test_created_record_appears_in_read() {
    let (app, _pool) = create_test_app();

    let id = add_record(&app, &sample_observation()).await;

    let response = send(&app, Method::GET, "/get_glucose_records", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let records = body_json(response).await;
    let records = records.as_array().unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], json!(id.to_string()));
}

#[tokio::test]
async fn test_round_trip_through_sqlite() {
    let (app, _pool) = create_test_app();

    let mut document = sample_observation();
    document["effectiveDateTime"] = json!("2024-01-01T10:30");
    document["symptoms"] = Value::Null;
    add_record(&app, &document).await;

    let response = send(&app, Method::GET, "/get_glucose_records", None).await;
    let records = body_json(response).await;
    let encoded = &records[0];

    let mut expected = document.clone();
    expected["effectiveDateTime"] = json!("2024-01-01T10:30:00");
    expected["symptoms"] = json!([]);
    assert_eq!(encoded, &expected);

    // Keys come back in the documented order
    let keys: Vec<&String> = encoded.as_object().unwrap().keys().collect();
    assert_eq!(keys[0], "resourceType");
    assert_eq!(keys[6], "effectiveDateTime");
    assert_eq!(keys[keys.len() - 1], "patient_outcomes");
}

#[tokio::test]
async fn test_limit_returns_first_records() {
    let (app, _pool) = create_test_app();

    for i in 0..10 {
        let mut document = sample_observation();
        document["valueQuantity"]["value"] = json!(100.0 + i as f64);
        add_record(&app, &document).await;
    }

    let response = send(&app, Method::GET, "/get_glucose_records?limit=3", None).await;
    let records = body_json(response).await;
    let records = records.as_array().unwrap();

    assert_eq!(records.len(), 3);
    let ids: Vec<&str> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);

    let response = send(&app, Method::GET, "/get_glucose_records?limit=-1", None).await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_delete_unknown_record_leaves_rows() {
    let (app, pool) = create_test_app();
    add_record(&app, &sample_observation()).await;

    let response = send(&app, Method::DELETE, "/delete_glucose_record/42", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({ "error": "Record not found" }));
    assert_eq!(record_count(&pool), 1);
}

#[tokio::test]
async fn test_update_unknown_record_writes_nothing() {
    let (app, pool) = create_test_app();
    let id = add_record(&app, &sample_observation()).await;

    let mut document = sample_observation();
    document["valueQuantity"]["value"] = json!(250.0);
    let response = send(&app, Method::PUT, "/update_glucose_record/42", Some(&document)).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(record_count(&pool), 1);

    let response = send(&app, Method::GET, "/get_glucose_records", None).await;
    let records = body_json(response).await;
    assert_eq!(records[0]["id"], json!(id.to_string()));
    assert_eq!(records[0]["valueQuantity"]["value"], json!(120.0));
}

#[tokio::test]
async fn test_update_then_delete() {
    let (app, pool) = create_test_app();
    let id = add_record(&app, &sample_observation()).await;

    let mut document = sample_observation();
    document["valueQuantity"]["value"] = json!(180.0);
    document["carbs"] = Value::Null;
    document["family_history"] = json!([]);
    let uri = format!("/update_glucose_record/{}", id);
    let response = send(&app, Method::PUT, &uri, Some(&document)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, Method::GET, "/get_glucose_records", None).await;
    let records = body_json(response).await;
    assert_eq!(records[0]["valueQuantity"]["value"], json!(180.0));
    assert_eq!(records[0]["carbs"], Value::Null);
    assert_eq!(records[0]["family_history"], json!([]));

    let uri = format!("/delete_glucose_record/{}", id);
    let response = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(record_count(&pool), 0);
}

#[tokio::test]
async fn test_missing_carbs_writes_no_row() {
    let (app, pool) = create_test_app();

    let mut document = sample_observation();
    document.as_object_mut().unwrap().remove("carbs");
    let response = send(&app, Method::POST, "/add_glucose_record", Some(&document)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("carbs"));
    assert_eq!(record_count(&pool), 0);
}

#[tokio::test]
async fn test_invalid_date_is_reported() {
    let (app, pool) = create_test_app();

    let mut document = sample_observation();
    document["effectiveDateTime"] = json!("01/02/2024");
    let response = send(&app, Method::POST, "/add_glucose_record", Some(&document)).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(record_count(&pool), 0);
}

#[tokio::test]
async fn test_health_reports_database() {
    let (app, _pool) = create_test_app();

    let response = send(&app, Method::GET, "/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["components"]["database"]["message"]
        .as_str()
        .unwrap()
        .contains("in-memory"));
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let (app, _pool) = create_test_app();

    let response = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert!(body["paths"]["/add_glucose_record"].is_object());
}

#[tokio::test]
async fn test_cors_allows_configured_origin() {
    let (app, _pool) = create_test_app();

    let request = Request::builder()
        .method(Method::GET)
        .uri("/get_glucose_records")
        .header(header::ORIGIN, "http://localhost:3000")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "http://localhost:3000"
    );
}

#[tokio::test]
async fn test_file_backed_database_persists_records() {
    initialize();
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig {
        sqlite_path: dir.path().join("glucose.db").to_string_lossy().to_string(),
        max_connections: 4,
        timeout_seconds: 5,
    };

    let pool = DatabasePool::connect(&config).unwrap();
    let app = create_application(pool, &AppConfig::default());
    add_record(&app, &sample_observation()).await;
    drop(app);

    // A fresh pool over the same file sees the stored record
    let pool = DatabasePool::connect(&config).unwrap();
    assert_eq!(record_count(&pool), 1);
}
