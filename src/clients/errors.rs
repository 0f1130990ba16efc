//! Transport-level error types.
//!
//! The SDK performs no retries: carrier-side business errors are reported
//! through parsed results, and transport failures below are propagated to
//! the caller unchanged.

use thiserror::Error;

/// Errors that can occur at the HTTP transport layer.
#[derive(Debug, Error)]
pub enum HttpError {
    /// Network or connection error, propagated from the HTTP collaborator.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status code.
    #[error("HTTP status {code}: {body}")]
    Status {
        /// The HTTP status code of the response.
        code: u16,
        /// The response body, as text.
        body: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_message_includes_code_and_body() {
        let error = HttpError::Status {
            code: 503,
            body: "Service Unavailable".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("503"));
        assert!(message.contains("Service Unavailable"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = HttpError::Status {
            code: 500,
            body: String::new(),
        };
        let _: &dyn std::error::Error = &error;
    }
}
