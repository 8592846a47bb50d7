use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use domain_catalog::CatalogError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// LLM quota, timeout, or network failure. Always caught by a fallback
    /// path, never surfaced to the caller as an error.
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error("Malformed vision output: {0}")]
    MalformedVisionOutput(String),

    #[error("Store error: {0}")]
    Store(#[from] CatalogError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ChatResult<T> = Result<T, ChatError>;

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::ProviderUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(err: serde_json::Error) -> Self {
        ChatError::Internal(format!("JSON error: {}", err))
    }
}

/// Convert ChatError to AppError for standardized HTTP error responses
impl From<ChatError> for AppError {
    fn from(err: ChatError) -> Self {
        match err {
            ChatError::ProviderUnavailable(msg) => {
                AppError::ServiceUnavailable(format!("Provider unavailable: {}", msg))
            }
            ChatError::MalformedVisionOutput(msg) => {
                AppError::UnprocessableEntity(format!("Malformed vision output: {}", msg))
            }
            ChatError::Store(err) => err.into(),
            ChatError::Config(msg) => {
                AppError::InternalServerError(format!("Config error: {}", msg))
            }
            ChatError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
