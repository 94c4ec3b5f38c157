//! # Prompthancer
//!
//! Prompt enhancement flows with resilient response parsing and per-client rate limiting.
//!
//! A user prompt goes to a generative model together with a system instruction
//! asking for a labeled rewrite. The free-text reply is parsed into a structured
//! [`EnhancementResult`] (category, intent, opportunities, rewritten prompt,
//! explanation). A second flow applies a free-text modification request to an
//! already enhanced prompt and returns a [`ModificationResult`].
//!
//! Both flows are **total**: rate limiting, invalid input, missing credentials,
//! content blocks, empty or malformed replies and transport errors are all
//! rendered as schema-valid records whose prompt field starts with `"Error: "`.
//!
//! ## Main modules
//!
//! - [`flow`]: [`PromptService`] with `enhance` / `modify`; [`ModelBinding`]; [`Failure`].
//! - [`parse`]: [`ResponseParser`] (four parsing tiers), [`split_sections`], [`FallbackLimits`].
//! - [`rate_limit`]: [`RateLimiter`] trait, [`FixedWindowLimiter`], [`Clock`] / [`ManualClock`].
//! - [`schema`]: record types, input types, [`validate_enhancement`], [`enhancement_from_value`].
//! - [`llm`]: [`GenerativeModel`] port, [`GeminiModel`], [`ChatOpenAI`], [`MockModel`], [`ResilientModel`].
//! - [`prompts`]: system instructions from embedded YAML, `PROMPTS_DIR` and env.
//! - [`config`]: [`FlowConfig`] from environment variables.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use prompthancer::{
//!     ClientKey, EnhanceInput, FixedWindowLimiter, FlowPrompts, MockModel, ModelBinding,
//!     PromptService, ResponseParser,
//! };
//!
//! # #[tokio::main]
//! # async fn main() {
//! let service = PromptService::new(
//!     Arc::new(FixedWindowLimiter::default()),
//!     ModelBinding::shared(Arc::new(MockModel::text("Write a haiku about autumn rain."))),
//!     FlowPrompts::default(),
//!     ResponseParser::default(),
//! );
//! let result = service
//!     .enhance(&ClientKey::from("127.0.0.1"), EnhanceInput::new("poem rain"))
//!     .await;
//! println!("{}", result.enhanced_prompt);
//! # }
//! ```

pub mod config;
pub mod flow;
pub mod llm;
pub mod parse;
pub mod prompts;
pub mod rate_limit;
pub mod schema;

pub use config::{FlowConfig, Provider};
pub use flow::{compose_modification_message, Failure, ModelBinding, PromptService};
pub use llm::{
    BlockThreshold, ChatOpenAI, GeminiModel, Generation, GenerationRequest, GenerativeModel,
    HarmCategory, MockModel, ModelError, ResilientModel, RetryPolicy, SafetySetting,
};
pub use parse::{
    parse_failure_record, split_sections, FallbackLimits, ResponseParser, Section,
    SECTION_MARKERS,
};
pub use prompts::{
    default_from_embedded as default_prompts, load as load_prompts,
    load_or_default as load_prompts_or_default, FlowPrompts, LoadError as PromptsLoadError,
};
pub use rate_limit::{
    ClientKey, Clock, FixedWindowLimiter, ManualClock, RateDecision, RateLimitConfig,
    RateLimiter, SystemClock,
};
pub use schema::{
    enhancement_from_value, modification_from_value, validate_enhancement,
    validate_modification, EnhanceInput, EnhancementResult, ModificationResult, ModifyInput,
    PromptAnalysis, SchemaError,
};
