//! Errors from a generative-model call.

use std::time::Duration;

use thiserror::Error;

/// Failure of one model invocation.
///
/// A content block is not an error; it is [`Generation::Blocked`](super::Generation::Blocked).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Connection, DNS or TLS failure, or the body could not be read.
    #[error("request failed: {0}")]
    Transport(String),
    /// The provider answered with an error.
    #[error("{}", provider_message(.status, .message))]
    Provider { status: Option<u16>, message: String },
    /// The provider answered, but not with the payload shape we expect.
    #[error("malformed response: {0}")]
    Malformed(String),
    /// The attempt did not finish in time.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

fn provider_message(status: &Option<u16>, message: &str) -> String {
    match status {
        Some(code) => format!("provider returned {code}: {message}"),
        None => format!("provider error: {message}"),
    }
}

impl ModelError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ModelError::Transport(_) | ModelError::Timeout(_) => true,
            ModelError::Provider {
                status: Some(code), ..
            } => *code == 429 || (500..600).contains(code),
            ModelError::Provider { status: None, .. } | ModelError::Malformed(_) => false,
        }
    }
}

impl From<reqwest::Error> for ModelError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return ModelError::Transport(format!("timed out: {e}"));
        }
        if e.is_decode() {
            return ModelError::Malformed(e.to_string());
        }
        ModelError::Transport(e.to_string())
    }
}
