use std::sync::Arc;

use prompthancer::MockModel;
use serde_json::Value;

use super::common::{model_service, spawn_server};

/// **Scenario**: `/health` answers `{"status":"ok"}` without touching the model.
#[tokio::test]
async fn health_ok() {
    let model = Arc::new(MockModel::text("unused"));
    let server = spawn_server(model_service(model.clone())).await;

    let resp = reqwest::get(server.url("/health")).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(model.call_count(), 0);

    server.stop().await;
}

/// **Scenario**: unknown routes are 404.
#[tokio::test]
async fn unknown_route_is_not_found() {
    let server = spawn_server(model_service(Arc::new(MockModel::text("unused")))).await;
    let resp = reqwest::get(server.url("/api/unknown")).await.unwrap();
    assert_eq!(resp.status(), 404);
    server.stop().await;
}
