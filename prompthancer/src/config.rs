//! Flow configuration read from environment variables.
//!
//! Unset or unparsable values fall back to [`Default`]. Loading `.env` and XDG
//! `config.toml` into the environment is the `config` crate's job; this module
//! only reads the resulting variables.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::parse::FallbackLimits;
use crate::rate_limit::RateLimitConfig;

/// Which generative-model API to call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Provider {
    #[default]
    Gemini,
    OpenAI,
}

impl Provider {
    /// Env var holding this provider's API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Provider::Gemini => "GEMINI_API_KEY",
            Provider::OpenAI => "OPENAI_API_KEY",
        }
    }

    fn default_enhance_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-1.5-flash-latest",
            Provider::OpenAI => "gpt-4o-mini",
        }
    }

    fn default_modify_model(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini-2.0-flash",
            Provider::OpenAI => "gpt-4o-mini",
        }
    }
}

impl FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(Provider::Gemini),
            "openai" => Ok(Provider::OpenAI),
            other => Err(format!("unknown LLM provider: {other}")),
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Gemini => f.write_str("gemini"),
            Provider::OpenAI => f.write_str("openai"),
        }
    }
}

/// Everything the flows and the server need besides the credential and prompts.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowConfig {
    pub provider: Provider,
    pub enhance_model: String,
    pub modify_model: String,
    /// Gemini API base; `None` uses the public endpoint.
    pub gemini_base_url: Option<String>,
    /// OpenAI-compatible API base; `None` uses api.openai.com.
    pub openai_base_url: Option<String>,
    pub rate_limit: RateLimitConfig,
    pub fallback: FallbackLimits,
    /// Bound on each model attempt.
    pub model_timeout: Duration,
    /// Retries after the first attempt, for transient errors only.
    pub model_max_retries: usize,
    pub serve_addr: String,
    /// How often the server evicts expired rate-limit windows.
    pub rate_limit_sweep: Duration,
}

impl Default for FlowConfig {
    fn default() -> Self {
        let provider = Provider::default();
        Self {
            provider,
            enhance_model: provider.default_enhance_model().to_string(),
            modify_model: provider.default_modify_model().to_string(),
            gemini_base_url: None,
            openai_base_url: None,
            rate_limit: RateLimitConfig::default(),
            fallback: FallbackLimits::default(),
            model_timeout: Duration::from_secs(30),
            model_max_retries: 2,
            serve_addr: "127.0.0.1:8080".to_string(),
            rate_limit_sweep: Duration::from_secs(300),
        }
    }
}

impl FlowConfig {
    /// Builds the config from process environment variables.
    ///
    /// - `LLM_PROVIDER` (gemini | openai, default gemini)
    /// - `ENHANCE_MODEL`, `MODIFY_MODEL` (provider-specific defaults)
    /// - `GEMINI_BASE_URL`, `OPENAI_BASE_URL`
    /// - `RATE_LIMIT_MAX_REQUESTS` (5), `RATE_LIMIT_WINDOW_SECS` (60)
    /// - `FALLBACK_PROMPT_MULTIPLIER` (2), `FALLBACK_ALLOWANCE_CHARS` (400), `DIRECT_REPLY_MAX_CHARS` (1000)
    /// - `MODEL_TIMEOUT_SECS` (30), `MODEL_MAX_RETRIES` (2)
    /// - `SERVE_ADDR` (127.0.0.1:8080), `RATE_LIMIT_SWEEP_SECS` (300)
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default = Self::default();
        let text = |k: &str| lookup(k).map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
        let parsed = |k: &str| text(k).and_then(|s| s.parse::<u64>().ok());

        let provider = text("LLM_PROVIDER")
            .and_then(|s| s.parse().ok())
            .unwrap_or(default.provider);
        let secs = |k: &str, d: Duration| parsed(k).filter(|n| *n > 0).map(Duration::from_secs).unwrap_or(d);

        Self {
            provider,
            enhance_model: text("ENHANCE_MODEL")
                .unwrap_or_else(|| provider.default_enhance_model().to_string()),
            modify_model: text("MODIFY_MODEL")
                .unwrap_or_else(|| provider.default_modify_model().to_string()),
            gemini_base_url: text("GEMINI_BASE_URL"),
            openai_base_url: text("OPENAI_BASE_URL"),
            rate_limit: RateLimitConfig {
                max_requests: parsed("RATE_LIMIT_MAX_REQUESTS")
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or(default.rate_limit.max_requests),
                window: secs("RATE_LIMIT_WINDOW_SECS", default.rate_limit.window),
            },
            fallback: FallbackLimits {
                prompt_multiplier: parsed("FALLBACK_PROMPT_MULTIPLIER")
                    .map(|n| n as usize)
                    .unwrap_or(default.fallback.prompt_multiplier),
                allowance_chars: parsed("FALLBACK_ALLOWANCE_CHARS")
                    .map(|n| n as usize)
                    .unwrap_or(default.fallback.allowance_chars),
                direct_reply_max_chars: parsed("DIRECT_REPLY_MAX_CHARS")
                    .map(|n| n as usize)
                    .unwrap_or(default.fallback.direct_reply_max_chars),
            },
            model_timeout: secs("MODEL_TIMEOUT_SECS", default.model_timeout),
            model_max_retries: parsed("MODEL_MAX_RETRIES")
                .map(|n| n as usize)
                .unwrap_or(default.model_max_retries),
            serve_addr: text("SERVE_ADDR").unwrap_or(default.serve_addr),
            rate_limit_sweep: secs("RATE_LIMIT_SWEEP_SECS", default.rate_limit_sweep),
        }
    }
}
