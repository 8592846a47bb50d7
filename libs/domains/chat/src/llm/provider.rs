use async_trait::async_trait;

use crate::error::ChatResult;

/// Trait for text and vision completion providers.
///
/// Both operations may fail with quota/timeout errors; callers convert those
/// into their deterministic fallback paths and never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a text completion for a prompt.
    async fn complete(&self, prompt: &str) -> ChatResult<String>;

    /// Generate a completion for a base64-encoded image plus a prompt.
    async fn complete_vision(&self, image_base64: &str, prompt: &str) -> ChatResult<String>;
}
