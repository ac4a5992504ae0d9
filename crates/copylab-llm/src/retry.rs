//! Retry with exponential back-off and jitter for chat-completion calls.
//!
//! [`retry_with_backoff`] wraps any fallible async operation and retries on
//! transient errors (network failures, 429, 5xx). Anything else is returned
//! immediately so the chain can move on to the next provider.

use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
///
/// **Retriable:**
/// - Network-level failures: timeout, connection reset.
/// - HTTP 429 and 5xx responses.
///
/// **Not retriable:**
/// - Other 4xx responses (bad key, bad request).
/// - Malformed or empty completions: the same prompt tends to fail the same way.
pub(crate) fn is_retriable(err: &LlmError) -> bool {
    match err {
        LlmError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        LlmError::ApiError { status, .. } => *status == 429 || *status >= 500,
        LlmError::Deserialize { .. }
        | LlmError::EmptyCompletion { .. }
        | LlmError::InvalidBaseUrl { .. }
        | LlmError::Timeout { .. }
        | LlmError::NoProviders
        | LlmError::Exhausted { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms × 2ⁿ⁻¹` with ±25 % jitter,
/// capped at 30 s. Non-retriable errors are returned immediately.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    const MAX_DELAY_MS: u64 = 30_000;
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "transient LLM error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
