//! Request outcome types and error definitions.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Machine-readable classifier for a failed request.
///
/// Transport-level failures use the closed set of variants; codes reported
/// by the backend in its error envelope are carried through verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorCode {
    /// The request did not complete within the configured budget.
    Timeout,
    /// The server could not be reached at the transport layer.
    Network,
    /// Any failure not otherwise classified.
    Unknown,
    /// Backend-reported domain code, verbatim.
    Server(String),
}

impl ErrorCode {
    /// Wire spelling of the code, as consumers match on it.
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::Network => "NETWORK_ERROR",
            ErrorCode::Unknown => "UNKNOWN_ERROR",
            ErrorCode::Server(code) => code,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation messages as reported by the backend.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Structured error every failed request is normalized into.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    /// Human-readable description, suitable for direct display.
    pub message: String,

    /// Optional machine-readable classifier.
    pub code: Option<ErrorCode>,

    /// Optional per-field validation messages.
    pub details: Option<FieldErrors>,

    /// HTTP status code, present when the server responded.
    pub status: Option<u16>,
}

impl ApiError {
    /// Request exceeded the configured time budget.
    pub fn timeout(budget_secs: u64) -> Self {
        Self {
            message: format!("Request timed out after {budget_secs} seconds"),
            code: Some(ErrorCode::Timeout),
            details: None,
            status: None,
        }
    }

    /// Server unreachable at the transport layer.
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(ErrorCode::Network),
            details: None,
            status: None,
        }
    }

    /// Unclassified failure, preserving the underlying message.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(ErrorCode::Unknown),
            details: None,
            status: None,
        }
    }

    /// True if the request was cut off by the local time budget.
    pub fn is_timeout(&self) -> bool {
        self.code == Some(ErrorCode::Timeout)
    }

    /// True if the transport could not reach the server.
    pub fn is_network(&self) -> bool {
        self.code == Some(ErrorCode::Network)
    }

    /// Label used for error metrics; unclassified HTTP failures share one.
    pub fn code_label(&self) -> &str {
        self.code
            .as_ref()
            .map(ErrorCode::as_str)
            .unwrap_or("HTTP_ERROR")
    }
}

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_spellings() {
        assert_eq!(ErrorCode::Timeout.as_str(), "TIMEOUT");
        assert_eq!(ErrorCode::Network.as_str(), "NETWORK_ERROR");
        assert_eq!(ErrorCode::Unknown.as_str(), "UNKNOWN_ERROR");
        assert_eq!(
            ErrorCode::Server("AGENT_LIMIT".to_string()).as_str(),
            "AGENT_LIMIT"
        );
    }

    #[test]
    fn test_display_is_the_message() {
        let err = ApiError::timeout(30);
        assert_eq!(err.to_string(), "Request timed out after 30 seconds");
        assert!(err.is_timeout());
        assert!(!err.is_network());
    }

    #[test]
    fn test_code_label_fallback() {
        let err = ApiError {
            message: "HTTP 500".to_string(),
            code: None,
            details: None,
            status: Some(500),
        };
        assert_eq!(err.code_label(), "HTTP_ERROR");
        assert_eq!(ApiError::network("down").code_label(), "NETWORK_ERROR");
    }
}
