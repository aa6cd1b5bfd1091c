//! Transport caller - one logical call with retry and backoff.
//!
//! Wraps a single [`ChatGateway`] completion in the retry loop every stage
//! uses: transient failures (rate limit, server error, network, timeout)
//! are retried after a backoff delay, terminal failures (client error,
//! malformed 200) fail the call immediately. The outcome is always a tagged
//! [`CallOutcome`], never an error: callers decide what a failure means.

use crate::ports::chat_gateway::{ChatGateway, ChatRequest};
use std::time::Duration;
use tracing::warn;

/// Retry budget and backoff schedule for one logical call
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Retries after the first attempt (total attempts = max_retries + 1)
    pub max_retries: u32,
    /// Base backoff; the delay before retry N is `backoff_unit * N` unless
    /// the provider supplied a hint
    pub backoff_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_unit: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy for tests
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            backoff_unit: Duration::ZERO,
        }
    }
}

/// Tagged result of one logical transport call
#[derive(Debug, Clone)]
pub enum CallOutcome {
    /// The reply text, trimmed
    Success { text: String },
    /// Human-readable reason (prefixed with the caller's label) and the
    /// number of attempts consumed
    Failure { reason: String, attempts: u32 },
}

impl CallOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CallOutcome::Success { .. })
    }
}

/// Perform one logical call: up to `max_retries + 1` attempts with backoff.
///
/// `label` is the display name used in logs and failure reasons.
pub async fn call_with_retry<G: ChatGateway + ?Sized>(
    gateway: &G,
    request: ChatRequest,
    label: &str,
    policy: &RetryPolicy,
) -> CallOutcome {
    for attempt in 0..=policy.max_retries {
        match gateway.complete(request.clone()).await {
            Ok(text) => {
                return CallOutcome::Success {
                    text: text.trim().to_string(),
                };
            }
            Err(err) if err.is_transient() && attempt < policy.max_retries => {
                let wait = err
                    .retry_hint()
                    .unwrap_or(policy.backoff_unit * (attempt + 1));
                warn!("{label}: {err}, retrying in {}s", wait.as_secs_f32());
                tokio::time::sleep(wait).await;
            }
            Err(err) if err.is_transient() => {
                return CallOutcome::Failure {
                    reason: format!("{label}: {err} after {} attempts", policy.max_retries + 1),
                    attempts: attempt + 1,
                };
            }
            Err(err) => {
                return CallOutcome::Failure {
                    reason: format!("{label}: {err}"),
                    attempts: attempt + 1,
                };
            }
        }
    }

    CallOutcome::Failure {
        reason: format!("{label}: unknown error"),
        attempts: policy.max_retries + 1,
    }
}
