//! API error taxonomy and normalization.
//!
//! Every failed call collapses into a single displayable message. The kind
//! records which of the mutually exclusive cases produced it:
//! a server response with a failure status, a request that got no response,
//! a request that could not be built, or a client-side deadline.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when a request was sent but no response arrived.
pub const NO_RESPONSE_MESSAGE: &str = "No response from the server. Check your internet connection or accept the self-signed certificate for the API host.";

/// Error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    /// Client-side check failed; no request was issued.
    Validation,
    /// Server rejected the credentials or token (401).
    Auth,
    /// Any other non-2xx response.
    Server,
    /// Request sent, no response received.
    Network,
    /// Client-side deadline exceeded.
    Timeout,
    /// Request could not be constructed (or the response was unusable).
    Request,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Validation => write!(f, "validation"),
            ApiErrorKind::Auth => write!(f, "auth"),
            ApiErrorKind::Server => write!(f, "server"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Timeout => write!(f, "timeout"),
            ApiErrorKind::Request => write!(f, "request"),
        }
    }
}

/// Normalized API error with kind and display message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error category
    pub kind: ApiErrorKind,
    /// One-line message suitable for display
    pub message: String,
    /// HTTP status, when the server responded
    pub status: Option<u16>,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    /// Creates a client-side validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    /// Creates an error from a server response with a failure status.
    ///
    /// Uses the body's `message` field when present, otherwise `fallback`.
    pub fn from_status(status: u16, body: &str, fallback: &str) -> Self {
        let server_message = extract_message(body);
        let detail = server_message.as_deref().unwrap_or(fallback);
        let kind = if status == 401 {
            ApiErrorKind::Auth
        } else {
            ApiErrorKind::Server
        };
        Self {
            kind,
            message: format!("Server error: {status} - {detail}"),
            status: Some(status),
        }
    }

    /// Creates the connectivity error (request sent, no response).
    pub fn no_response() -> Self {
        Self::new(ApiErrorKind::Network, NO_RESPONSE_MESSAGE)
    }

    /// Creates a timeout error.
    pub fn timeout(after: Duration) -> Self {
        Self::new(
            ApiErrorKind::Timeout,
            format!("Request timed out after {}s.", after.as_secs()),
        )
    }

    /// Creates a request-construction error.
    pub fn request(detail: impl fmt::Display) -> Self {
        Self::new(ApiErrorKind::Request, format!("Error: {detail}"))
    }

    /// Classifies a transport error from reqwest.
    pub fn from_reqwest(e: &reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            Self::timeout(timeout)
        } else if e.is_builder() {
            Self::request(e)
        } else if e.is_decode() {
            Self::request(format!("unreadable response: {e}"))
        } else {
            Self::no_response()
        }
    }

    /// True if this error must invalidate the session.
    pub fn is_auth(&self) -> bool {
        self.kind == ApiErrorKind::Auth
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for API operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Pulls a non-empty `message` string out of a JSON error body.
fn extract_message(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("message")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|msg| !msg.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_server_message() {
        let err = ApiError::from_status(400, r#"{"message":"Username taken"}"#, "fallback");
        assert_eq!(err.kind, ApiErrorKind::Server);
        assert_eq!(err.status, Some(400));
        assert_eq!(err.message, "Server error: 400 - Username taken");
    }

    #[test]
    fn status_falls_back_when_message_missing() {
        for body in ["", "{}", r#"{"message":""}"#, "<html>bad gateway</html>", r#"{"message":5}"#] {
            let err = ApiError::from_status(502, body, "Could not fetch the user list.");
            assert_eq!(
                err.message, "Server error: 502 - Could not fetch the user list.",
                "body: {body}"
            );
        }
    }

    #[test]
    fn unauthorized_maps_to_auth() {
        let err = ApiError::from_status(401, r#"{"message":"Invalid token"}"#, "x");
        assert!(err.is_auth());
        assert_eq!(err.message, "Server error: 401 - Invalid token");

        assert!(!ApiError::from_status(403, "", "x").is_auth());
    }

    #[test]
    fn timeout_and_request_messages() {
        assert_eq!(
            ApiError::timeout(Duration::from_secs(10)).to_string(),
            "Request timed out after 10s."
        );
        let err = ApiError::request("relative URL without a base");
        assert_eq!(err.kind, ApiErrorKind::Request);
        assert_eq!(err.message, "Error: relative URL without a base");
        assert_eq!(ApiError::no_response().kind, ApiErrorKind::Network);
    }
}
