//! [`ServiceError`] — the single failure type for both remote services.

use thiserror::Error;

/// Errors from a remote service submission.
///
/// Carries a human-readable message and is never retried automatically; the
/// controller surfaces it to the user as a system message in the
/// conversation log.
#[derive(Debug, Clone, Error)]
pub enum ServiceError {
    /// HTTP transport or connection error.
    #[error("request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be parsed as the expected JSON envelope.
    #[error("failed to parse service response: {0}")]
    Parse(String),

    /// The service answered with `success: false`; the message is the
    /// service's own error text.
    #[error("{0}")]
    Remote(String),
}

impl From<reqwest::Error> for ServiceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ServiceError::Timeout
        } else {
            ServiceError::Request(e.to_string())
        }
    }
}
