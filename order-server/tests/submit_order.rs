//! HTTP handler tests against the in-memory cloud

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use order_server::{AppState, Config, api};
use serde_json::{Value, json};
use shared::{MemoryCloud, OrderFileNaming, OrderRecord};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

fn app(dir: &TempDir, cloud: &Arc<MemoryCloud>) -> Router {
    let config = Config {
        http_port: 0,
        orders_path: dir.path().join("orders"),
        paper_width: 48,
        currency: "EGP".to_string(),
        restaurant_name: "Wempy".to_string(),
        naming: OrderFileNaming::default(),
    };
    api::router(AppState::new(&config, cloud.clone()))
}

fn order_body() -> Value {
    json!({
        "customer": {"name": "Mona", "phone": "0100", "address": "12 Nile St", "notes": "Extra napkins"},
        "items": [{"name": "Koshari", "qty": 2, "price": 35.5}],
        "totals": {"subtotal": 71, "delivery": 15, "total": 86}
    })
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn submit(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit_order")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

#[tokio::test]
async fn test_submit_order_uploads_and_announces() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());

    let (status, body) = call(app(&dir, &cloud), submit(order_body().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "order_id": 1,
            "file_name": "order_1.txt",
            "url": "memory://order_1.txt"
        })
    );

    let ticket = String::from_utf8(cloud.object("order_1.txt").unwrap()).unwrap();
    assert!(ticket.contains("Order #1"));
    assert!(ticket.contains("Koshari"));
    assert!(ticket.contains("86.00 EGP"));
    assert!(ticket.contains("Extra napkins"));
    assert_eq!(cloud.records(), vec![OrderRecord::new_order(1)]);

    // Ids keep counting
    let (_, body) = call(app(&dir, &cloud), submit(order_body().to_string())).await;
    assert_eq!(body["order_id"], 2);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("orders/last_id.txt")).unwrap(),
        "2"
    );
}

#[tokio::test]
async fn test_invalid_order_is_rejected() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());

    let mut order = order_body();
    order["items"] = json!([]);
    let (status, body) = call(app(&dir, &cloud), submit(order.to_string())).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid order: order has no items");
    // Nothing allocated, nothing uploaded
    assert!(!dir.path().join("orders/last_id.txt").exists());
    assert!(cloud.records().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());

    let (status, body) = call(app(&dir, &cloud), submit("{\"customer\":")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_upload_failure_returns_500() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    cloud.fail_uploads(true);

    let (status, body) = call(app(&dir, &cloud), submit(order_body().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(
        body["message"]
            .as_str()
            .unwrap()
            .starts_with("Failed to process order : ")
    );
    assert!(cloud.records().is_empty());
}

#[tokio::test]
async fn test_failed_upload_id_is_reused() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());

    cloud.fail_uploads(true);
    let (status, _) = call(app(&dir, &cloud), submit(order_body().to_string())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        std::fs::read_to_string(dir.path().join("orders/last_id.txt")).unwrap(),
        "0"
    );

    cloud.fail_uploads(false);
    let (status, body) = call(app(&dir, &cloud), submit(order_body().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["order_id"], 1);
    assert!(cloud.object("order_1.txt").is_some());
    assert!(cloud.object("order_2.txt").is_none());
}

#[tokio::test]
async fn test_insert_failure_still_succeeds() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());
    cloud.fail_inserts(true);

    let (status, body) = call(app(&dir, &cloud), submit(order_body().to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(cloud.object("order_1.txt").is_some());
    assert!(cloud.records().is_empty());
}

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let cloud = Arc::new(MemoryCloud::new());

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(app(&dir, &cloud), request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}
