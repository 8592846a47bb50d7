use std::future::Future;

use crate::error::ChatError;

/// Attempt a provider call; on failure, use a deterministic fallback.
///
/// This is the single try/fallback point shared by routing, formatting, and
/// vision. One attempt only: the error is logged and the fallback value is
/// returned immediately, with no retry or backoff.
pub async fn with_fallback<T, P, F>(primary: P, fallback: F) -> T
where
    P: Future<Output = Result<T, ChatError>>,
    F: FnOnce() -> T,
{
    match primary.await {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, "Provider call failed, using deterministic fallback");
            fallback()
        }
    }
}
