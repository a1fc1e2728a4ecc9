//! Error types surfaced by the HTTP client wrapper and the session layer

use serde_json::Value;

/// Terminal error of a backend request, after retries are exhausted
#[derive(Debug, Clone, thiserror::Error)]
pub enum HttpError {
    /// The backend could not be reached (DNS, connection refused, reset, ...)
    #[error("Network error: {message}")]
    Network {
        /// Transport error description
        message: String,
    },

    /// No response arrived before the per-attempt deadline
    #[error("Request timed out after {timeout_ms}ms")]
    Timeout {
        /// Deadline that was exceeded
        timeout_ms: u64,
    },

    /// The backend answered with a non-2xx status
    ///
    /// Backend validation failures arrive here and are passed through verbatim.
    #[error("HTTP error! status: {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` or `error` field of the response body, when present
        message: Option<String>,
        /// Parsed response body, when it was JSON
        body: Option<Value>,
    },

    /// The response body was not the expected JSON
    #[error("Failed to parse response: {0}")]
    Parse(String),
}

impl HttpError {
    /// Build a status error from a response body
    pub fn from_status(status: u16, body: Option<Value>) -> Self {
        let message = body.as_ref().and_then(extract_message);
        Self::Status {
            status,
            message,
            body,
        }
    }

    /// HTTP status code, when the backend answered
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the backend, when there is one
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// Whether the backend rejected the credentials
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// Single user-facing message: the server's own text or the given fallback
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Pull a human readable message out of a backend JSON body
///
/// The backend uses either `message` or `error` depending on the route.
pub fn extract_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Failure of the persisted token store
#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    /// The platform credential store could not be opened
    #[error("Failed to access keyring: {0}")]
    Access(String),

    /// Reading, writing or deleting the token failed
    #[error("Failed to {action} stored token: {message}")]
    Operation {
        /// What was attempted
        action: &'static str,
        /// Underlying error description
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_error_extracts_message_then_error_field() {
        let err = HttpError::from_status(400, Some(json!({ "message": "Name is required" })));
        assert_eq!(err.server_message(), Some("Name is required"));

        let err = HttpError::from_status(400, Some(json!({ "error": "Invalid price" })));
        assert_eq!(err.server_message(), Some("Invalid price"));

        let err = HttpError::from_status(500, Some(json!({ "detail": 1 })));
        assert_eq!(err.server_message(), None);
        assert_eq!(err.user_message("Error creating product"), "Error creating product");
    }

    #[test]
    fn test_display_matches_status_wording() {
        let err = HttpError::from_status(502, None);
        assert_eq!(err.to_string(), "HTTP error! status: 502");
        assert_eq!(err.status(), Some(502));
        assert!(HttpError::from_status(403, None).is_unauthorized());
    }
}
