use std::io;
use thiserror::Error;

/// Every error a caller of the classification core can observe.
///
/// Remote service problems never appear here: they are modelled by
/// [`crate::actors::messages::RemoteFailure`] and absorbed by the local fallback.
#[derive(Debug, Error)]
pub enum AppError {
    /// Neither the text nor the attachment resolved to usable content.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A category has no reply templates configured. Never recoverable.
    #[error("No response templates configured for category {0}")]
    TemplateExhaustion(String),

    /// Malformed input data, such as an unreadable attachment or a rejected setting.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad or inconsistent settings, detected while building components.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A reply from the classifier actor did not arrive in time.
    #[error("Timed out: {0}")]
    Timeout(String),

    /// The classifier actor is gone or dropped the reply.
    #[error("Classifier unavailable: {0}")]
    Actor(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// `true` when the caller broke the request contract, as opposed to a system fault.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, AppError::InvalidRequest(_))
    }
}

// io::Error is not Clone, so the I/O variant is rebuilt from its kind and message.
impl Clone for AppError {
    fn clone(&self) -> Self {
        match self {
            AppError::Io(e) => AppError::Io(io::Error::new(e.kind(), e.to_string())),
            AppError::InvalidRequest(s) => AppError::InvalidRequest(s.clone()),
            AppError::TemplateExhaustion(s) => AppError::TemplateExhaustion(s.clone()),
            AppError::Validation(s) => AppError::Validation(s.clone()),
            AppError::Config(s) => AppError::Config(s.clone()),
            AppError::Timeout(s) => AppError::Timeout(s.clone()),
            AppError::Actor(s) => AppError::Actor(s.clone()),
            AppError::Internal(s) => AppError::Internal(s.clone()),
        }
    }
}

impl From<tokio::time::error::Elapsed> for AppError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AppError::Timeout("no reply from the classifier".to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Validation(format!("invalid JSON: {}", err))
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(format!("invalid service URL: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

// Only raised while building the HTTP client; request errors become RemoteFailure.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Config(format!("cannot build HTTP client: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_keeps_variant_and_message() {
        let err = AppError::Io(io::Error::new(io::ErrorKind::NotFound, "email.pdf"));
        let cloned = err.clone();
        assert!(matches!(&cloned, AppError::Io(e) if e.kind() == io::ErrorKind::NotFound));
        assert_eq!(err.to_string(), cloned.to_string());
    }

    #[test]
    fn test_invalid_request_flag() {
        assert!(AppError::InvalidRequest("empty".into()).is_invalid_request());
        assert!(!AppError::TemplateExhaustion("Productive".into()).is_invalid_request());
    }
}
