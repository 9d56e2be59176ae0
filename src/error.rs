//! Error types for the portico client.
//!
//! This module contains the closed error taxonomy surfaced through failure
//! envelopes, plus configuration errors raised at client construction.
//!
//! # Error Handling
//!
//! Request-level failures never escape as panics or `Err` returns from the
//! pipeline; they are normalized into [`ApiError`] values carried inside a
//! failure envelope. Construction-time validation uses [`ConfigError`] and
//! fails fast with a clear, actionable message.
//!
//! # Example
//!
//! ```rust
//! use portico::{ApiError, ErrorKind};
//!
//! let error = ApiError::new(ErrorKind::InvalidResponse, 500)
//!     .with_message("Internal Server Error");
//! assert_eq!(error.kind, ErrorKind::InvalidResponse);
//! assert_eq!(error.status_code, 500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// The closed set of failure classes a request can resolve to.
///
/// Every failure envelope carries exactly one of these kinds. The set is
/// deliberately closed: match exhaustively rather than inventing ad hoc
/// string reasons.
///
/// `InvalidUrl`, `InvalidMethod`, `InvalidBody`, and `InvalidHeaders` are
/// reserved for stricter pre-dispatch validation and are not produced by
/// the current pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// The request URL was malformed. Reserved, currently unused.
    InvalidUrl,
    /// The HTTP method was not recognized. Reserved, currently unused.
    InvalidMethod,
    /// The request body could not be serialized. Reserved, currently unused.
    InvalidBody,
    /// The request headers were malformed. Reserved, currently unused.
    InvalidHeaders,
    /// The server answered 401. Also produced for 403 responses; see
    /// [`ApiError`] for the contract note.
    Unauthenticated,
    /// Declared for forward compatibility; the pipeline does not produce
    /// this kind today.
    Unauthorized,
    /// A non-2xx status outside the 401/403 pair, or a transport failure
    /// that yielded no response at all (status code 0).
    InvalidResponse,
    /// The response body could not be decoded as JSON, or the decoded body
    /// was rejected by the supplied schema.
    InvalidResponseJson,
}

impl ErrorKind {
    /// Returns the wire name for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidUrl => "INVALID_URL",
            Self::InvalidMethod => "INVALID_METHOD",
            Self::InvalidBody => "INVALID_BODY",
            Self::InvalidHeaders => "INVALID_HEADERS",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::InvalidResponse => "INVALID_RESPONSE",
            Self::InvalidResponseJson => "INVALID_RESPONSE_JSON",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error carried by every failure envelope.
///
/// An `ApiError` is constructed exactly once per failing outcome, wrapped
/// into a failure envelope, and never mutated afterward. It serializes as a
/// plain structured record so it can cross process or log boundaries
/// losslessly.
///
/// # Contract note
///
/// A 403 response resolves to `kind: Unauthenticated` with
/// `status_code: 403`. [`ErrorKind::Unauthorized`] stays a declared,
/// unproduced kind; consumers should not expect it from the pipeline today.
///
/// # Example
///
/// ```rust
/// use portico::{ApiError, ErrorKind};
/// use serde_json::json;
///
/// let error = ApiError::new(ErrorKind::InvalidResponseJson, 200)
///     .with_message("expected object")
///     .with_detail(json!([{"path": "id", "message": "missing field"}]));
///
/// assert!(error.to_string().contains("INVALID_RESPONSE_JSON"));
/// ```
#[derive(Clone, Debug, PartialEq, Error, Serialize, Deserialize)]
#[error("{kind} {status_code}{}", .message.as_deref().map(|m| format!(" {m}")).unwrap_or_default())]
pub struct ApiError {
    /// The failure class.
    pub kind: ErrorKind,
    /// The HTTP status code of the outcome, or 0 when no response was
    /// obtained from the transport.
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    /// Human-readable context for the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured failure detail, e.g. the validator's issue list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<serde_json::Value>,
}

impl ApiError {
    /// Creates a new error with the given kind and status code.
    ///
    /// This is a pure constructor: it performs no I/O and never fails.
    #[must_use]
    pub const fn new(kind: ErrorKind, status_code: u16) -> Self {
        Self {
            kind,
            status_code,
            message: None,
            detail: None,
        }
    }

    /// Attaches a human-readable message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attaches structured detail, such as a validation issue list.
    #[must_use]
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Errors that can occur while constructing a client.
///
/// All construction-time validation fails fast with one of these variants
/// rather than deferring the failure to the first request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Base URL cannot be empty.
    #[error("Base URL cannot be empty. Please provide a valid URL with scheme (e.g., 'https://api.example.com').")]
    EmptyBaseUrl,

    /// Base URL is missing a supported scheme.
    #[error("Invalid base URL '{url}'. Expected an 'http://' or 'https://' URL.")]
    InvalidBaseUrl {
        /// The invalid URL that was provided.
        url: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_kind_wire_names() {
        assert_eq!(ErrorKind::Unauthenticated.to_string(), "UNAUTHENTICATED");
        assert_eq!(ErrorKind::Unauthorized.to_string(), "UNAUTHORIZED");
        assert_eq!(ErrorKind::InvalidResponse.to_string(), "INVALID_RESPONSE");
        assert_eq!(
            ErrorKind::InvalidResponseJson.to_string(),
            "INVALID_RESPONSE_JSON"
        );
        assert_eq!(ErrorKind::InvalidUrl.to_string(), "INVALID_URL");
    }

    #[test]
    fn test_error_kind_serde_round_trip() {
        let json = serde_json::to_string(&ErrorKind::InvalidResponseJson).unwrap();
        assert_eq!(json, "\"INVALID_RESPONSE_JSON\"");

        let kind: ErrorKind = serde_json::from_str("\"UNAUTHENTICATED\"").unwrap();
        assert_eq!(kind, ErrorKind::Unauthenticated);
    }

    #[test]
    fn test_api_error_display_includes_kind_and_status() {
        let error = ApiError::new(ErrorKind::InvalidResponse, 404);
        assert_eq!(error.to_string(), "INVALID_RESPONSE 404");
    }

    #[test]
    fn test_api_error_display_includes_message_when_present() {
        let error = ApiError::new(ErrorKind::Unauthenticated, 401).with_message("token expired");
        assert_eq!(error.to_string(), "UNAUTHENTICATED 401 token expired");
    }

    #[test]
    fn test_api_error_serializes_as_plain_record() {
        let error = ApiError::new(ErrorKind::InvalidResponseJson, 200)
            .with_message("expected object")
            .with_detail(json!([{"path": "id", "message": "missing field `id`"}]));

        let value = serde_json::to_value(&error).unwrap();
        assert_eq!(value["kind"], "INVALID_RESPONSE_JSON");
        assert_eq!(value["statusCode"], 200);
        assert_eq!(value["message"], "expected object");
        assert_eq!(value["detail"][0]["path"], "id");
    }

    #[test]
    fn test_api_error_omits_absent_optional_fields() {
        let error = ApiError::new(ErrorKind::InvalidResponse, 500);
        let value = serde_json::to_value(&error).unwrap();

        assert!(value.get("message").is_none());
        assert!(value.get("detail").is_none());
    }

    #[test]
    fn test_config_error_messages_are_actionable() {
        let error = ConfigError::InvalidBaseUrl {
            url: "ftp://example.com".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("ftp://example.com"));
        assert!(message.contains("http://"));
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &ApiError::new(ErrorKind::InvalidResponse, 500);
        let _: &dyn std::error::Error = &ConfigError::EmptyBaseUrl;
    }
}
