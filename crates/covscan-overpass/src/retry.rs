//! Retry with exponential back-off and jitter for Overpass requests.
//!
//! Public Overpass instances shed load with 429 and 504 responses, so those
//! and connection-level failures are retried; everything else is returned
//! immediately.

use std::future::Future;
use std::time::Duration;

use crate::error::OverpassError;

/// Returns `true` for errors that are worth retrying after a back-off delay.
pub(crate) fn is_retriable(err: &OverpassError) -> bool {
    match err {
        OverpassError::Http(e) => e.is_timeout() || e.is_connect(),
        OverpassError::Query { status, .. } => *status == 429 || *status >= 500,
        OverpassError::Deserialize { .. }
        | OverpassError::EmptyQuery
        | OverpassError::InvalidUrl { .. } => false,
    }
}

/// Runs `operation` with up to `max_retries` additional attempts on transient errors.
///
/// The n-th retry sleeps `backoff_base_ms * 2^(n-1)` ± 25 % jitter, capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, OverpassError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, OverpassError>>,
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
                    "Overpass transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
