//! Enhancement flow end to end with a scripted model.

mod init_logging;

use std::sync::Arc;
use std::time::Duration;

use prompthancer::{
    validate_enhancement, ClientKey, EnhanceInput, FixedWindowLimiter, FlowPrompts, Generation,
    MockModel, ModelBinding, ModelError, PromptService, RateLimitConfig, ResilientModel,
    ResponseParser, RetryPolicy,
};
use serde_json::json;

const REPLY: &str = "ORIGINAL PROMPT:
sort a list
PROMPT ANALYSIS:
Primary Category: Code/Programming
Secondary Categories: None
Intent Recognition: Sort a list in Python
Enhancement Opportunities: language, input size
ENHANCED PROMPT:
Write a Python function that sorts a list of integers in ascending order without using sorted().
ENHANCEMENT EXPLANATION:
Named the language and the constraint.";

fn service(model: Arc<MockModel>) -> PromptService {
    service_with_limit(model, 5)
}

fn service_with_limit(model: Arc<MockModel>, max_requests: u32) -> PromptService {
    PromptService::new(
        Arc::new(FixedWindowLimiter::new(RateLimitConfig {
            max_requests,
            window: Duration::from_secs(60),
        })),
        ModelBinding::shared(model),
        FlowPrompts::new("enhance instruction", "modify instruction"),
        ResponseParser::default(),
    )
}

fn client() -> ClientKey {
    ClientKey::from("192.0.2.1")
}

/// **Scenario**: a labeled reply becomes a structured record; the model sees instruction and prompt.
#[tokio::test]
async fn enhance_success() {
    let model = Arc::new(MockModel::text(REPLY));
    let svc = service(model.clone());
    let r = svc.enhance(&client(), EnhanceInput::new("sort a list")).await;

    assert!(!r.is_error());
    assert_eq!(r.original_prompt, "sort a list");
    assert_eq!(r.prompt_analysis.primary_category, "Code/Programming");
    assert!(r.enhanced_prompt.starts_with("Write a Python function"));

    let sent = model.requests();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].system_instruction, "enhance instruction");
    assert_eq!(sent[0].user_message, "sort a list");
    assert_eq!(sent[0].safety_settings.len(), 4);
}

/// **Scenario**: content block, empty reply and transport error all yield valid API-error records.
#[tokio::test]
async fn error_paths_are_schema_valid() {
    let cases = vec![
        (MockModel::blocked("SAFETY"), "API Error - Content Moderation", "Content Blocked"),
        (MockModel::text(""), "API Error", "Empty Response"),
        (
            MockModel::failing(ModelError::Transport("connection reset".into())),
            "API Error",
            "API Call Failed",
        ),
    ];
    for (model, category, intent) in cases {
        let svc = service(Arc::new(model));
        let r = svc.enhance(&client(), EnhanceInput::new("draw a cat")).await;
        assert!(!r.enhanced_prompt.is_empty());
        assert!(r.is_error());
        assert_eq!(r.prompt_analysis.primary_category, category);
        assert_eq!(r.prompt_analysis.intent_recognition, intent);
        assert_eq!(r.original_prompt, "draw a cat");
        assert!(validate_enhancement(r).is_ok());
    }
}

/// **Scenario**: the provider's text is carried into the API-error record.
#[tokio::test]
async fn transport_error_text_is_reported() {
    let svc = service(Arc::new(MockModel::failing(ModelError::Provider {
        status: Some(400),
        message: "API key not valid".into(),
    })));
    let r = svc.enhance(&client(), EnhanceInput::new("x")).await;
    assert_eq!(
        r.enhanced_prompt,
        "Error: Could not enhance prompt due to an API error. provider returned 400: API key not valid"
    );
}

/// **Scenario**: a malformed provider payload has its own intent.
#[tokio::test]
async fn malformed_response() {
    let svc = service(Arc::new(MockModel::failing(ModelError::Malformed(
        "response has no candidates".into(),
    ))));
    let r = svc.enhance(&client(), EnhanceInput::new("x")).await;
    assert_eq!(r.prompt_analysis.primary_category, "API Error");
    assert_eq!(r.prompt_analysis.intent_recognition, "Malformed Response");
}

/// **Scenario**: the sixth request in a window is rate limited before the model is called.
#[tokio::test]
async fn rate_limit_short_circuits() {
    let model = Arc::new(MockModel::text(REPLY));
    let svc = service(model.clone());
    for _ in 0..5 {
        assert!(!svc.enhance(&client(), EnhanceInput::new("p")).await.is_error());
    }
    let r = svc.enhance(&client(), EnhanceInput::new("p")).await;
    assert_eq!(r.prompt_analysis.primary_category, "Rate Limit Error");
    assert_eq!(r.prompt_analysis.intent_recognition, "Too Many Requests");
    assert!(r.enhanced_prompt.starts_with("Error: Rate limit exceeded."));
    assert_eq!(model.call_count(), 5);

    // another client is unaffected
    let other = svc
        .enhance(&ClientKey::from("192.0.2.2"), EnhanceInput::new("p"))
        .await;
    assert!(!other.is_error());
}

/// **Scenario**: blank prompt is an input error and the model is not called.
#[tokio::test]
async fn blank_prompt_is_input_error() {
    let model = Arc::new(MockModel::text(REPLY));
    let svc = service(model.clone());
    let r = svc.enhance(&client(), EnhanceInput::new("   ")).await;
    assert_eq!(r.prompt_analysis.primary_category, "Input Error");
    assert_eq!(r.prompt_analysis.intent_recognition, "Invalid Input");
    assert_eq!(model.call_count(), 0);
}

/// **Scenario**: an undecodable JSON body is an input error, still counted by the limiter.
#[tokio::test]
async fn bad_json_body_is_input_error_after_rate_check() {
    let model = Arc::new(MockModel::text(REPLY));
    let svc = service_with_limit(model.clone(), 1);
    let r = svc
        .enhance_json(&client(), json!({ "originalPrompt": ["not", "a", "string"] }))
        .await;
    assert_eq!(r.prompt_analysis.primary_category, "Input Error");
    assert_eq!(r.original_prompt, "");

    let r = svc
        .enhance_json(&client(), json!({ "originalPrompt": "fine" }))
        .await;
    assert_eq!(r.prompt_analysis.primary_category, "Rate Limit Error");
}

/// **Scenario**: missing credential yields a configuration error naming the variable.
#[tokio::test]
async fn missing_credential_is_configuration_error() {
    let svc = PromptService::new(
        Arc::new(FixedWindowLimiter::default()),
        ModelBinding::missing("GEMINI_API_KEY"),
        FlowPrompts::default(),
        ResponseParser::default(),
    );
    let r = svc.enhance(&client(), EnhanceInput::new("x")).await;
    assert_eq!(r.prompt_analysis.primary_category, "Configuration Error");
    assert_eq!(r.prompt_analysis.intent_recognition, "API Key Missing");
    assert_eq!(
        r.enhanced_prompt,
        "Error: Application configuration issue. API key not found."
    );
    assert!(r.prompt_analysis.enhancement_opportunities.contains("GEMINI_API_KEY"));
}

/// **Scenario**: a transient failure is retried and the flow succeeds.
#[tokio::test]
async fn transient_failure_recovers_through_retry() {
    let mock = Arc::new(MockModel::sequence(vec![
        Err(ModelError::Provider {
            status: Some(503),
            message: "overloaded".into(),
        }),
        Ok(Generation::Text(REPLY.into())),
    ]));
    let resilient = ResilientModel::new(
        mock.clone(),
        Duration::from_secs(5),
        RetryPolicy::fixed(2, Duration::from_millis(1)),
    );
    let svc = PromptService::new(
        Arc::new(FixedWindowLimiter::default()),
        ModelBinding::shared(Arc::new(resilient)),
        FlowPrompts::default(),
        ResponseParser::default(),
    );
    let r = svc.enhance(&client(), EnhanceInput::new("sort a list")).await;
    assert!(!r.is_error());
    assert_eq!(mock.call_count(), 2);
}
