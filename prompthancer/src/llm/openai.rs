//! OpenAI-compatible chat completions client implementing [`GenerativeModel`].
//!
//! The system instruction becomes a system message and the user message a user
//! message. Safety settings have no counterpart in this API and are not sent; a
//! `content_filter` finish reason with no content maps to [`Generation::Blocked`].

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs, FinishReason,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, trace, warn};

use super::{Generation, GenerationRequest, GenerativeModel, ModelError};

/// Chat completions client.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
}

impl ChatOpenAI {
    /// Client with the given key and the default OpenAI base URL.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new().with_api_key(api_key), model)
    }

    /// Client with custom config (e.g. custom base URL for a compatible endpoint).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn messages(request: &GenerationRequest) -> Vec<ChatCompletionRequestMessage> {
        vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                request.system_instruction.as_str(),
            )),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(
                request.user_message.as_str(),
            )),
        ]
    }
}

fn map_error(e: OpenAIError) -> ModelError {
    match e {
        OpenAIError::ApiError(api) => ModelError::Provider {
            status: None,
            message: api.message,
        },
        decode @ OpenAIError::JSONDeserialize(..) => ModelError::Malformed(decode.to_string()),
        other => ModelError::Transport(other.to_string()),
    }
}

#[async_trait]
impl GenerativeModel for ChatOpenAI {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages(request));
        let body = args
            .build()
            .map_err(|e| ModelError::Malformed(format!("request build failed: {}", e)))?;

        debug!(
            model = %self.model,
            user_chars = request.user_message.len(),
            "OpenAI chat create"
        );

        let response = self.client.chat().create(body).await.map_err(|e| {
            let err = map_error(e);
            warn!(error = %err, "OpenAI call failed");
            err
        })?;
        if let Ok(js) = serde_json::to_string(&response) {
            trace!(response = %js, "OpenAI response body");
        }

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::Malformed("response has no choices".to_string()))?;
        let content = choice.message.content.unwrap_or_default();
        if content.is_empty() && matches!(choice.finish_reason, Some(FinishReason::ContentFilter)) {
            return Ok(Generation::Blocked {
                reason: "CONTENT_FILTER".to_string(),
            });
        }
        Ok(Generation::Text(content))
    }
}
