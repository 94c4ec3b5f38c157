//! Mock model for tests and offline runs.
//!
//! Returns scripted outcomes in order; once one outcome is left it is repeated.
//! Every request is recorded so tests can assert on what a flow sent.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{Generation, GenerationRequest, GenerativeModel, ModelError};

type Outcome = Result<Generation, ModelError>;

/// Scripted [`GenerativeModel`].
///
/// **Interaction**: stands in for `GeminiModel` / `ChatOpenAI` in flow and server tests.
pub struct MockModel {
    outcomes: Mutex<VecDeque<Outcome>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
}

impl MockModel {
    /// Mock that plays `outcomes` in order, repeating the last one.
    pub fn sequence(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            requests: Mutex::new(Vec::new()),
            delay: None,
        }
    }

    /// Always replies with `text`.
    pub fn text(text: impl Into<String>) -> Self {
        Self::sequence(vec![Ok(Generation::Text(text.into()))])
    }

    /// Always reports a content block.
    pub fn blocked(reason: impl Into<String>) -> Self {
        Self::sequence(vec![Ok(Generation::Blocked {
            reason: reason.into(),
        })])
    }

    /// Always fails with `error`.
    pub fn failing(error: ModelError) -> Self {
        Self::sequence(vec![Err(error)])
    }

    /// Sleeps before every reply (for timeout tests).
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn next_outcome(&self) -> Outcome {
        let mut outcomes = self.outcomes.lock().unwrap_or_else(|e| e.into_inner());
        if outcomes.len() > 1 {
            if let Some(next) = outcomes.pop_front() {
                return next;
            }
        }
        outcomes
            .front()
            .cloned()
            .unwrap_or_else(|| Ok(Generation::Text(String::new())))
    }
}

#[async_trait]
impl GenerativeModel for MockModel {
    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, ModelError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_outcome()
    }
}
