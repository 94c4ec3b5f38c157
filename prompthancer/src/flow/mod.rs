//! The enhancement and modification flows.
//!
//! [`PromptService`] owns the collaborators (rate limiter, models, prompts,
//! parser). Both flows run the same governance steps in order: rate check,
//! input validation, credential check, model call. Any failure is rendered as a
//! record (see [`Failure`]); callers always receive a schema-valid result.

mod enhance;
mod failure;
mod modify;

pub use failure::Failure;
pub use modify::compose_modification_message;

use std::sync::Arc;

use tracing::debug;

use crate::config::{FlowConfig, Provider};
use crate::llm::{
    ChatOpenAI, GeminiModel, Generation, GenerationRequest, GenerativeModel, ResilientModel,
    RetryPolicy,
};
use crate::parse::ResponseParser;
use crate::prompts::FlowPrompts;
use crate::rate_limit::{ClientKey, RateLimiter};

/// Models for the two flows, or the reason there are none.
#[derive(Clone)]
pub enum ModelBinding {
    Ready {
        enhance: Arc<dyn GenerativeModel>,
        modify: Arc<dyn GenerativeModel>,
    },
    /// No credential; flows answer with a configuration error naming `variable`.
    MissingCredential { variable: String },
}

impl ModelBinding {
    /// Same model for both flows.
    pub fn shared(model: Arc<dyn GenerativeModel>) -> Self {
        ModelBinding::Ready {
            enhance: model.clone(),
            modify: model,
        }
    }

    pub fn missing(variable: impl Into<String>) -> Self {
        ModelBinding::MissingCredential {
            variable: variable.into(),
        }
    }

    /// Builds provider clients from `config`, each wrapped with the configured timeout and retries.
    ///
    /// A missing or blank `api_key` yields [`ModelBinding::MissingCredential`].
    pub fn from_config(config: &FlowConfig, api_key: Option<String>) -> Self {
        let Some(key) = api_key.filter(|k| !k.trim().is_empty()) else {
            return Self::missing(config.provider.api_key_var());
        };
        let build = |model: &str| -> Arc<dyn GenerativeModel> {
            let inner: Arc<dyn GenerativeModel> = match config.provider {
                Provider::Gemini => {
                    let m = GeminiModel::new(key.clone(), model);
                    match &config.gemini_base_url {
                        Some(base) => Arc::new(m.with_base_url(base.clone())),
                        None => Arc::new(m),
                    }
                }
                Provider::OpenAI => {
                    let mut c = async_openai::config::OpenAIConfig::new().with_api_key(key.clone());
                    if let Some(base) = &config.openai_base_url {
                        c = c.with_api_base(base.clone());
                    }
                    Arc::new(ChatOpenAI::with_config(c, model))
                }
            };
            Arc::new(ResilientModel::new(
                inner,
                config.model_timeout,
                RetryPolicy::default_model_policy(config.model_max_retries),
            ))
        };
        ModelBinding::Ready {
            enhance: build(&config.enhance_model),
            modify: build(&config.modify_model),
        }
    }

    fn enhance(&self) -> Result<&Arc<dyn GenerativeModel>, Failure> {
        match self {
            ModelBinding::Ready { enhance, .. } => Ok(enhance),
            ModelBinding::MissingCredential { variable } => Err(Failure::MissingCredential {
                variable: variable.clone(),
            }),
        }
    }

    fn modify(&self) -> Result<&Arc<dyn GenerativeModel>, Failure> {
        match self {
            ModelBinding::Ready { modify, .. } => Ok(modify),
            ModelBinding::MissingCredential { variable } => Err(Failure::MissingCredential {
                variable: variable.clone(),
            }),
        }
    }
}

/// Entry point for both flows.
pub struct PromptService {
    limiter: Arc<dyn RateLimiter>,
    models: ModelBinding,
    prompts: FlowPrompts,
    parser: ResponseParser,
}

impl PromptService {
    pub fn new(
        limiter: Arc<dyn RateLimiter>,
        models: ModelBinding,
        prompts: FlowPrompts,
        parser: ResponseParser,
    ) -> Self {
        Self {
            limiter,
            models,
            prompts,
            parser,
        }
    }

    /// Wires provider models and parser limits from `config` around a caller-owned limiter.
    pub fn from_config(
        config: &FlowConfig,
        prompts: FlowPrompts,
        api_key: Option<String>,
        limiter: Arc<dyn RateLimiter>,
    ) -> Self {
        Self::new(
            limiter,
            ModelBinding::from_config(config, api_key),
            prompts,
            ResponseParser::new(config.fallback),
        )
    }

    pub fn models(&self) -> &ModelBinding {
        &self.models
    }

    async fn admit(&self, client: &ClientKey) -> Result<(), Failure> {
        let decision = self.limiter.check(client).await;
        match decision.message() {
            Some(message) => Err(Failure::RateLimited { message }),
            None => Ok(()),
        }
    }

    /// Calls `model` and returns non-blank text, or the failure it amounts to.
    async fn generate_text(
        &self,
        model: &Arc<dyn GenerativeModel>,
        request: &GenerationRequest,
    ) -> Result<String, Failure> {
        match model.generate(request).await? {
            Generation::Text(text) if text.trim().is_empty() => Err(Failure::EmptyResponse),
            Generation::Text(text) => {
                debug!(reply_chars = text.chars().count(), "model replied");
                Ok(text)
            }
            Generation::Blocked { reason } => Err(Failure::Blocked { reason }),
        }
    }
}
