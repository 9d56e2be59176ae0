//! The success/failure envelope returned by every request.
//!
//! This module provides [`ApiResponse`], the tagged result type all pipeline
//! calls resolve to. Exactly one variant is ever populated: the invalid
//! "both data and error" state is unrepresentable.
//!
//! # Example
//!
//! ```rust
//! use portico::{ApiError, ApiResponse, ErrorKind};
//! use serde_json::json;
//!
//! let ok: ApiResponse<serde_json::Value> = ApiResponse::success(json!({"id": 1}));
//! assert!(ok.is_success());
//!
//! let err: ApiResponse<serde_json::Value> =
//!     ApiResponse::failure(ApiError::new(ErrorKind::Unauthenticated, 401));
//! assert!(err.is_failure());
//! ```

use serde::ser::{Serialize, SerializeStruct, Serializer};

use crate::error::ApiError;

/// The envelope every request resolves to.
///
/// Callers branch on the discriminant rather than unwinding: a failing
/// request is a normal, inspectable value, not an exception. Only
/// [`ApiResponse::success`] and [`ApiResponse::failure`] fabricate
/// envelopes, so every value discriminates cleanly.
///
/// # Serialization
///
/// Serializes to `{"success": true, "data": ...}` or
/// `{"success": false, "error": {...}}`, with the error as a plain
/// structured record that survives process and log boundaries.
#[derive(Clone, Debug, PartialEq)]
pub enum ApiResponse<T> {
    /// The request succeeded; `data` holds the validated or raw payload.
    Success {
        /// The decoded (and, when a schema was supplied, validated) payload.
        data: T,
    },
    /// The request failed at some pipeline stage.
    Failure {
        /// The normalized failure.
        error: ApiError,
    },
}

impl<T> ApiResponse<T> {
    /// Wraps a payload in a success envelope.
    #[must_use]
    pub const fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Wraps an error in a failure envelope.
    #[must_use]
    pub const fn failure(error: ApiError) -> Self {
        Self::Failure { error }
    }

    /// Returns `true` for the success variant.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns `true` for the failure variant.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    /// Returns the payload, if this is a success envelope.
    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success { data } => Some(data),
            Self::Failure { .. } => None,
        }
    }

    /// Returns the error, if this is a failure envelope.
    #[must_use]
    pub const fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Success { .. } => None,
            Self::Failure { error } => Some(error),
        }
    }

    /// Converts the envelope into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the carried [`ApiError`] for the failure variant.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            Self::Success { data } => Ok(data),
            Self::Failure { error } => Err(error),
        }
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ApiResponse", 2)?;
        match self {
            Self::Success { data } => {
                state.serialize_field("success", &true)?;
                state.serialize_field("data", data)?;
            }
            Self::Failure { error } => {
                state.serialize_field("success", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}
