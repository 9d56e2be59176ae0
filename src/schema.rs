//! The injected schema-validation seam.
//!
//! A [`Schema`] confirms that a decoded response body has the expected
//! shape and produces the typed payload the success envelope carries.
//! Validation failure is a normal return value, never a panic: the
//! pipeline turns a [`ValidationFailure`] into an `INVALID_RESPONSE_JSON`
//! failure envelope carrying the issue list as detail.
//!
//! [`SerdeSchema`] is the provided implementation, deserializing into any
//! [`serde::de::DeserializeOwned`] type.
//!
//! # Example
//!
//! ```rust
//! use portico::{Schema, SerdeSchema};
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Debug, Deserialize)]
//! struct Todo {
//!     id: u64,
//!     title: String,
//! }
//!
//! let schema = SerdeSchema::<Todo>::new();
//! let todo = schema.parse(&json!({"id": 1, "title": "write docs"})).unwrap();
//! assert_eq!(todo.id, 1);
//! ```

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// One problem found while validating a decoded body.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Issue {
    /// Where in the value the problem was found; empty when the validator
    /// cannot attribute it to a path.
    pub path: String,
    /// What was wrong.
    pub message: String,
}

/// The report a schema returns when it rejects a value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationFailure {
    /// Summary of the rejection.
    pub message: String,
    /// The individual problems found.
    pub issues: Vec<Issue>,
}

impl ValidationFailure {
    /// Serializes the issue list for embedding in an error's detail field.
    #[must_use]
    pub fn issues_as_detail(&self) -> Value {
        serde_json::to_value(&self.issues).unwrap_or(Value::Null)
    }
}

/// A parse-or-report validator for decoded response bodies.
///
/// Implementations must never panic: rejection is reported through
/// [`ValidationFailure`]. `Output` is the typed payload a success envelope
/// carries once validation passes.
pub trait Schema: Send + Sync {
    /// The typed payload produced on success.
    type Output;

    /// Validates the decoded body, producing the typed payload.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationFailure`] describing every problem found.
    fn parse(&self, value: &Value) -> Result<Self::Output, ValidationFailure>;
}

/// A [`Schema`] backed by serde deserialization.
///
/// Accepts any value that deserializes into `T`; rejection carries the
/// deserializer's message as a single issue.
#[derive(Debug)]
pub struct SerdeSchema<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> SerdeSchema<T> {
    /// Creates a schema for `T`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for SerdeSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: DeserializeOwned> Schema for SerdeSchema<T> {
    type Output = T;

    fn parse(&self, value: &Value) -> Result<T, ValidationFailure> {
        serde_json::from_value(value.clone()).map_err(|err| {
            let message = err.to_string();
            ValidationFailure {
                issues: vec![Issue {
                    path: String::new(),
                    message: message.clone(),
                }],
                message,
            }
        })
    }
}
