use std::sync::Arc;

use prompthancer::{validate_enhancement, EnhancementResult, MockModel};
use serde_json::{json, Value};

use super::common::{model_service, service, spawn_server};

const REPLY: &str = "ORIGINAL PROMPT:
poem rain
PROMPT ANALYSIS:
Primary Category: Creative Writing
Secondary Categories: Poetry, Nature
Intent Recognition: A short poem about rain
Enhancement Opportunities: form, tone, length
ENHANCED PROMPT:
Write a 14-line sonnet about a summer rainstorm in a quiet city, with a hopeful tone.
ENHANCEMENT EXPLANATION:
Specified form, setting and tone.";

/// **Scenario**: a labeled model reply is returned as a camelCase enhancement record.
#[tokio::test]
async fn enhance_returns_structured_record() {
    let model = Arc::new(MockModel::text(REPLY));
    let server = spawn_server(model_service(model.clone())).await;

    let resp = reqwest::Client::new()
        .post(server.url("/api/enhance"))
        .json(&json!({ "originalPrompt": "poem rain" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let raw: Value = resp.json().await.unwrap();
    eprintln!("[e2e] received: {}", raw);
    assert_eq!(raw["promptAnalysis"]["primaryCategory"], "Creative Writing");
    assert_eq!(
        raw["promptAnalysis"]["secondaryCategories"],
        json!(["Poetry", "Nature"])
    );

    let record: EnhancementResult = serde_json::from_value(raw).unwrap();
    assert_eq!(record.original_prompt, "poem rain");
    assert!(record.enhanced_prompt.starts_with("Write a 14-line sonnet"));
    assert!(validate_enhancement(record).is_ok());
    assert_eq!(model.requests()[0].user_message, "poem rain");

    server.stop().await;
}

/// **Scenario**: a body that is not JSON still gets a 200 input-error record.
#[tokio::test]
async fn invalid_json_is_input_error_record() {
    let model = Arc::new(MockModel::text(REPLY));
    let server = spawn_server(model_service(model.clone())).await;

    let resp = reqwest::Client::new()
        .post(server.url("/api/enhance"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let record: EnhancementResult = resp.json().await.unwrap();
    assert_eq!(record.prompt_analysis.primary_category, "Input Error");
    assert!(record.enhanced_prompt.starts_with("Error: "));
    assert_eq!(model.call_count(), 0);

    server.stop().await;
}

/// **Scenario**: limits are kept per forwarded client address.
#[tokio::test]
async fn rate_limit_is_per_forwarded_client() {
    let model = Arc::new(MockModel::text(REPLY));
    let svc = service(prompthancer::ModelBinding::shared(model.clone()), 1);
    let server = spawn_server(svc).await;
    let client = reqwest::Client::new();

    let send = |ip: &'static str| {
        client
            .post(server.url("/api/enhance"))
            .header("x-forwarded-for", format!("{}, 10.0.0.1", ip))
            .json(&json!({ "originalPrompt": "poem rain" }))
            .send()
    };

    let first: EnhancementResult = send("203.0.113.7").await.unwrap().json().await.unwrap();
    assert!(!first.is_error());
    let second: EnhancementResult = send("203.0.113.7").await.unwrap().json().await.unwrap();
    assert_eq!(second.prompt_analysis.primary_category, "Rate Limit Error");
    assert_eq!(second.prompt_analysis.intent_recognition, "Too Many Requests");
    let other: EnhancementResult = send("203.0.113.8").await.unwrap().json().await.unwrap();
    assert!(!other.is_error());
    assert_eq!(model.call_count(), 2);

    server.stop().await;
}

/// **Scenario**: without forwarding headers, requests from one socket share the peer-IP window.
#[tokio::test]
async fn rate_limit_falls_back_to_peer_address() {
    let model = Arc::new(MockModel::text(REPLY));
    let svc = service(prompthancer::ModelBinding::shared(model), 1);
    let server = spawn_server(svc).await;
    let client = reqwest::Client::new();

    for expected_limited in [false, true] {
        let record: EnhancementResult = client
            .post(server.url("/api/enhance"))
            .json(&json!({ "originalPrompt": "poem rain" }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(
            record.prompt_analysis.primary_category == "Rate Limit Error",
            expected_limited
        );
    }

    server.stop().await;
}
