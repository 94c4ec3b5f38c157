//! Generative-model port and its providers.
//!
//! Flows only see [`GenerativeModel`]: send a system instruction and one user
//! message, receive text, a content block, or a [`ModelError`].
//!
//! - [`GeminiModel`]: Gemini `generateContent` over reqwest.
//! - [`ChatOpenAI`]: OpenAI-compatible chat completions via async-openai.
//! - [`MockModel`]: scripted outcomes for tests.
//! - [`ResilientModel`]: per-attempt timeout and [`RetryPolicy`] around any model.

mod error;
mod gemini;
mod mock;
mod openai;
mod retry;

pub use error::ModelError;
pub use gemini::GeminiModel;
pub use mock::MockModel;
pub use openai::ChatOpenAI;
pub use retry::{ResilientModel, RetryPolicy};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Harm category a safety threshold applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Probability threshold at which a provider blocks content.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    BlockLowAndAbove,
    BlockMediumAndAbove,
    BlockOnlyHigh,
    BlockNone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

impl SafetySetting {
    /// The four harm categories, each blocked at medium probability and above.
    pub fn default_set() -> Vec<SafetySetting> {
        [
            HarmCategory::Harassment,
            HarmCategory::HateSpeech,
            HarmCategory::SexuallyExplicit,
            HarmCategory::DangerousContent,
        ]
        .into_iter()
        .map(|category| SafetySetting {
            category,
            threshold: BlockThreshold::BlockMediumAndAbove,
        })
        .collect()
    }
}

/// One model call: system instruction, a single user message, safety settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub user_message: String,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerationRequest {
    /// Request with the default safety settings.
    pub fn new(system_instruction: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_instruction: system_instruction.into(),
            user_message: user_message.into(),
            safety_settings: SafetySetting::default_set(),
        }
    }
}

/// What the provider returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Generation {
    /// Model text; may be empty.
    Text(String),
    /// The provider refused on content-policy grounds.
    Blocked { reason: String },
}

/// Text-generation endpoint.
///
/// Implementations must be cancel-safe; callers bound every call with a timeout.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_safety_set_serializes_to_provider_names() {
        let v = serde_json::to_value(SafetySetting::default_set()).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 4);
        assert_eq!(v[0]["category"], "HARM_CATEGORY_HARASSMENT");
        assert_eq!(v[3]["category"], "HARM_CATEGORY_DANGEROUS_CONTENT");
        assert_eq!(v[1]["threshold"], "BLOCK_MEDIUM_AND_ABOVE");
    }
}
