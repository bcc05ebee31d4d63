//! Boundary to the external text-generation service.
//!
//! The gateway takes a fully rendered prompt and the provider credential and returns the
//! provider's text verbatim. Implementations: [`GeminiGateway`](crate::GeminiGateway)
//! for live traffic, [`MockGateway`] for development and tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GatewayError;

#[async_trait]
pub trait AnalysisGateway: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Submit `prompt` as the entire request content and return the reply text.
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, GatewayError>;
}

/// Upper bound on a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(10);

/// Bounded exponential backoff for transient upstream failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, first one included. Always at least 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Single attempt, no retries.
    pub fn none() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Delay after failed attempt number `attempt` (1-based): base, 2x base, 4x base, ...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exp).min(MAX_BACKOFF)
    }

    /// Whether a failure on `attempt` should be followed by another try.
    pub fn should_retry(&self, attempt: u32, err: &GatewayError) -> bool {
        err.is_transient() && attempt < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(200))
    }
}

pub const MOCK_REPLY: &str = "## Overall Trends\n\n\
Mock analysis: Aura is running with `llm_mode = \"mock\"`, so no request was sent to Gemini.";

/// Returns a fixed reply and records how it was called.
pub struct MockGateway {
    reply: String,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockGateway {
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn was_called(&self) -> bool {
        self.calls() > 0
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }
}

impl Default for MockGateway {
    fn default() -> Self {
        Self::new(MOCK_REPLY)
    }
}

#[async_trait]
impl AnalysisGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, prompt: &str, _api_key: &str) -> Result<String, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        Ok(self.reply.clone())
    }
}
