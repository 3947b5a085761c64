//! Error types for the REST client layer.
//!
//! Errors are classified by recoverability:
//! - Retryable: network issues, timeouts, rate limits, server errors
//! - NonRetryable: bad requests, decode failures, configuration errors
//!
//! Every error carries enough context for a short user-facing message;
//! nothing here is expected to propagate past a single panel or service
//! call.

use thiserror::Error;

/// Errors from backend API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    // Retryable errors
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out")]
    Timeout,

    /// Non-2xx response. `message` is the server's `error`/`message` body
    /// field when present, otherwise empty.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    // Non-retryable errors
    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// Returns true if this error is worth retrying (or re-probing).
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) | ApiError::Timeout => true,
            ApiError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Short user-facing message for inline panel display.
    ///
    /// Prefers the server-supplied message when there is one; falls back
    /// to a generic string rather than exposing transport details.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { status, message } => {
                if message.is_empty() {
                    format!("Request failed (HTTP {})", status)
                } else {
                    message.clone()
                }
            }
            ApiError::Network(_) | ApiError::Timeout => {
                "Network error. Please try again.".to_string()
            }
            ApiError::Decode(_) => "Unexpected response from server.".to_string(),
            ApiError::Config(msg) => format!("Configuration error: {}", msg),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(ApiError::Timeout.is_retryable());
        assert!(ApiError::Network("reset".into()).is_retryable());
        assert!(ApiError::Status { status: 503, message: String::new() }.is_retryable());
        assert!(ApiError::Status { status: 429, message: String::new() }.is_retryable());
        assert!(!ApiError::Status { status: 400, message: String::new() }.is_retryable());
        assert!(!ApiError::Decode("bad json".into()).is_retryable());
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Status { status: 403, message: "Not allowed".into() };
        assert_eq!(err.user_message(), "Not allowed");

        let bare = ApiError::Status { status: 404, message: String::new() };
        assert_eq!(bare.user_message(), "Request failed (HTTP 404)");
    }
}
