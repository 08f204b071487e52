//! Bounded retry loop over a single-request attempt.

use std::future::Future;
use tracing::warn;

use super::{RetryPolicy, TransportError};

/// Run `attempt` until it succeeds, fails non-retryably, or exhausts the
/// policy's budget. Exactly `policy.retries + 1` attempts happen for a
/// persistently retryable failure; the most recent failure propagates
/// unwrapped. Attempts are strictly sequential with a fixed sleep between
/// them.
pub async fn read_with_retry<F, Fut>(
    policy: &RetryPolicy,
    mut attempt: F,
) -> Result<Vec<u8>, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Vec<u8>, TransportError>>,
{
    let mut budget = policy.retries;
    loop {
        match attempt().await {
            Ok(body) => return Ok(body),
            Err(err) => {
                if budget == 0 || !policy.should_retry(&err) {
                    return Err(err);
                }
                budget -= 1;
                warn!(error = %err, remaining = budget, "request failed, retrying");
                tokio::time::sleep(policy.sleep).await;
            }
        }
    }
}
