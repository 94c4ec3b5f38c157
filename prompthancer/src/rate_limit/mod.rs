//! Per-client request governance.
//!
//! [`RateLimiter`] is the seam flows depend on; [`FixedWindowLimiter`] is the
//! in-process implementation. A distributed store can implement the same trait.

mod clock;
mod fixed_window;

pub use clock::{Clock, ManualClock, SystemClock};
pub use fixed_window::FixedWindowLimiter;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;

/// Identity that rate-limit windows are keyed by (usually the client IP).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientKey(String);

impl ClientKey {
    /// Key used when no identity can be derived from the request.
    pub const UNKNOWN: &'static str = "unknown-ip";

    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn unknown() -> Self {
        Self(Self::UNKNOWN.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ClientKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Outcome of one rate check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateDecision {
    pub limited: bool,
    /// Whole seconds until the current window ends; set only when limited.
    pub retry_after_secs: Option<u64>,
}

impl RateDecision {
    pub fn allowed() -> Self {
        Self {
            limited: false,
            retry_after_secs: None,
        }
    }

    pub fn limited(retry_after_secs: u64) -> Self {
        Self {
            limited: true,
            retry_after_secs: Some(retry_after_secs.max(1)),
        }
    }

    /// Human-readable message for a limited decision.
    pub fn message(&self) -> Option<String> {
        if !self.limited {
            return None;
        }
        let secs = self.retry_after_secs.unwrap_or(1);
        Some(format!("Rate limit exceeded. Try again in {secs} seconds."))
    }
}

/// Window size and request budget of a fixed-window limiter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(60),
        }
    }
}

/// Decides whether a client may make another request right now.
///
/// Implementations count the request when they allow it.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, client: &ClientKey) -> RateDecision;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limited_decision_message_and_floor() {
        let d = RateDecision::limited(0);
        assert_eq!(d.retry_after_secs, Some(1));
        assert_eq!(
            d.message().as_deref(),
            Some("Rate limit exceeded. Try again in 1 seconds.")
        );
        assert_eq!(RateDecision::allowed().message(), None);
    }

    #[test]
    fn client_key_unknown() {
        assert_eq!(ClientKey::unknown().as_str(), "unknown-ip");
        assert_eq!(ClientKey::from("10.0.0.1").to_string(), "10.0.0.1");
    }
}
