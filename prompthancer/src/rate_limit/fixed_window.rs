//! In-memory fixed-window counter keyed by client.
//!
//! Each key's read-modify-write happens under the DashMap shard lock for that
//! entry, so concurrent requests from one client cannot undercount.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{trace, warn};

use super::{Clock, ClientKey, RateDecision, RateLimitConfig, RateLimiter, SystemClock};

#[derive(Clone, Copy, Debug)]
struct Window {
    count: u32,
    start: Instant,
}

impl Window {
    fn open(now: Instant) -> Self {
        Self { count: 1, start: now }
    }
}

/// Fixed-window limiter: at most `max_requests` per client per `window`.
///
/// A window that is strictly older than the window size is replaced by a fresh
/// one on the next request; it is never merged.
pub struct FixedWindowLimiter {
    config: RateLimitConfig,
    windows: DashMap<ClientKey, Window>,
    clock: Arc<dyn Clock>,
}

impl FixedWindowLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            windows: DashMap::new(),
            clock,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Decides and records one request for `client`.
    pub fn check_now(&self, client: &ClientKey) -> RateDecision {
        let now = self.clock.now();
        match self.windows.entry(client.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(Window::open(now));
                RateDecision::allowed()
            }
            Entry::Occupied(mut slot) => {
                let window = slot.get_mut();
                if self.is_expired(window, now) {
                    *window = Window::open(now);
                    return RateDecision::allowed();
                }
                if window.count >= self.config.max_requests {
                    let remaining = window
                        .start
                        .checked_add(self.config.window)
                        .map_or(self.config.window, |end| end.saturating_duration_since(now));
                    let decision = RateDecision::limited(ceil_secs(remaining));
                    warn!(client = %client, retry_after = ?decision.retry_after_secs, "rate limit exceeded");
                    return decision;
                }
                window.count += 1;
                trace!(client = %client, count = window.count, "request counted");
                RateDecision::allowed()
            }
        }
    }

    /// Drops windows that have expired; returns how many were removed.
    ///
    /// Does not change any future [`check`](RateLimiter::check) outcome.
    pub fn evict_expired(&self) -> usize {
        let now = self.clock.now();
        let before = self.windows.len();
        self.windows.retain(|_, w| !self.is_expired(w, now));
        before.saturating_sub(self.windows.len())
    }

    /// Number of tracked windows.
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    fn is_expired(&self, window: &Window, now: Instant) -> bool {
        now.saturating_duration_since(window.start) > self.config.window
    }
}

impl Default for FixedWindowLimiter {
    fn default() -> Self {
        Self::new(RateLimitConfig::default())
    }
}

#[async_trait]
impl RateLimiter for FixedWindowLimiter {
    async fn check(&self, client: &ClientKey) -> RateDecision {
        self.check_now(client)
    }
}

fn ceil_secs(d: Duration) -> u64 {
    d.as_secs().saturating_add(u64::from(d.subsec_nanos() > 0))
}
