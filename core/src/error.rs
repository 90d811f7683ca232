//! Error types for the store admin API client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the record does not exist" from "the server returned an unexpected
//! status." A `{success: false, error}` envelope becomes `Rejected` with the
//! server's own message; any other non-2xx response lands in `HttpError`
//! with the raw status code and body for debugging. Stores flatten every
//! variant into a single display message, so the `#[error]` texts double as
//! user-facing strings.

use thiserror::Error;

/// Errors returned by the client, services and stores.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404; the requested record does not exist.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The server answered with a `{success: false}` envelope; `message` is
    /// its `error` (or `message`) text.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("{0}")]
    Transport(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

impl ApiError {
    /// Human-readable message for store state, or `fallback` when the error
    /// carries no text of its own.
    pub fn message_or(&self, fallback: &str) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_includes_status_and_body() {
        let err = ApiError::HttpError {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn rejection_displays_server_message_only() {
        let err = ApiError::Rejected {
            status: 400,
            message: "email inválido".to_string(),
        };
        assert_eq!(err.message_or("failed to create customer"), "email inválido");

        let silent = ApiError::Rejected {
            status: 200,
            message: String::new(),
        };
        assert_eq!(silent.message_or("failed to load customers"), "failed to load customers");
    }

    #[test]
    fn empty_transport_message_uses_fallback() {
        let err = ApiError::Transport(String::new());
        assert_eq!(err.message_or("failed to load products"), "failed to load products");
    }

    #[test]
    fn non_empty_message_wins_over_fallback() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.message_or("fallback"), "connection refused");
    }
}
