//! Re-running operations aborted by concurrent writers.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::ReservationError;

/// Base delay between attempts; attempt `n` waits `n` times this.
const BACKOFF_STEP: Duration = Duration::from_millis(10);

/// Run `attempt` until it succeeds, fails for a non-transient reason, or
/// `max_retries` re-runs have been spent.
pub(crate) async fn with_retries<T, F, Fut>(
    operation: &str,
    max_retries: u32,
    mut attempt: F,
) -> Result<T, ReservationError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ReservationError>>,
{
    let mut retries = 0;
    loop {
        match attempt().await {
            Err(e) if e.is_transient() && retries < max_retries => {
                retries += 1;
                warn!(operation, retries, error = %e, "Retrying after transaction conflict");
                tokio::time::sleep(BACKOFF_STEP * retries).await;
            }
            result => return result,
        }
    }
}
