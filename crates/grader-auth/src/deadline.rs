//! Bounded waits for calls that leave the process.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use grader_core::error::AppError;
use grader_core::result::AppResult;

/// Run `fut` with an upper bound. Elapsing the bound is an internal
/// failure; nothing is retried.
pub async fn bounded<T, F>(timeout: Duration, operation: &'static str, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    match tokio::time::timeout(timeout, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!(operation, timeout_ms = timeout.as_millis() as u64, "External call timed out");
            Err(AppError::internal(format!("{operation} timed out")))
        }
    }
}
