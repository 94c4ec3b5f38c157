use std::sync::Arc;

use prompthancer::{MockModel, ModelBinding, ModificationResult};
use serde_json::{json, Value};

use super::common::{model_service, service, spawn_server};

fn body() -> Value {
    json!({
        "originalPrompt": "poem rain",
        "enhancedPrompt": "Write a 14-line sonnet about a summer rainstorm.",
        "modificationRequest": "make it a haiku"
    })
}

/// **Scenario**: the model's reply comes back trimmed as `modifiedPrompt`.
#[tokio::test]
async fn modify_returns_modified_prompt() {
    let model = Arc::new(MockModel::text("  Write a haiku about a summer rainstorm.\n"));
    let server = spawn_server(model_service(model.clone())).await;

    let resp = reqwest::Client::new()
        .post(server.url("/api/modify"))
        .json(&body())
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let raw: Value = resp.json().await.unwrap();
    assert_eq!(raw["modifiedPrompt"], "Write a haiku about a summer rainstorm.");
    assert_eq!(model.requests()[0].system_instruction, "modify instruction");

    server.stop().await;
}

/// **Scenario**: with no credential the record carries the configuration error text.
#[tokio::test]
async fn modify_without_credential() {
    let server = spawn_server(service(ModelBinding::missing("GEMINI_API_KEY"), 5)).await;

    let record: ModificationResult = reqwest::Client::new()
        .post(server.url("/api/modify"))
        .json(&body())
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        record.modified_prompt,
        "Error: Application configuration issue. API key not found. Original request: make it a haiku"
    );

    server.stop().await;
}

/// **Scenario**: missing fields are named in the input error.
#[tokio::test]
async fn modify_missing_fields() {
    let model = Arc::new(MockModel::text("unused"));
    let server = spawn_server(model_service(model.clone())).await;

    let record: ModificationResult = reqwest::Client::new()
        .post(server.url("/api/modify"))
        .json(&json!({ "originalPrompt": "poem rain" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(
        record.modified_prompt,
        "Error: Invalid input. enhancedPrompt, modificationRequest must be a non-empty string."
    );
    assert_eq!(model.call_count(), 0);

    server.stop().await;
}
