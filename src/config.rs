//! Validated configuration values.
//!
//! Construction-time validation keeps bad values out of the client
//! entirely: a [`BaseUrl`] either parses or the builder fails with a
//! [`ConfigError`], so no request ever dispatches against a malformed
//! base.

use std::fmt;

use crate::error::ConfigError;

/// A validated base URL.
///
/// Validation checks the scheme and non-emptiness; the string is otherwise
/// preserved verbatim, trailing slash included, because request URLs are
/// formed by plain concatenation with the call path.
///
/// # Example
///
/// ```rust
/// use portico::BaseUrl;
///
/// let base = BaseUrl::new("https://api.example.com/v1/").unwrap();
/// assert_eq!(base.as_ref(), "https://api.example.com/v1/");
///
/// assert!(BaseUrl::new("api.example.com").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseUrl(String);

impl BaseUrl {
    /// Creates a validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyBaseUrl`] for an empty string and
    /// [`ConfigError::InvalidBaseUrl`] when the scheme is not `http` or
    /// `https`.
    pub fn new(url: impl Into<String>) -> Result<Self, ConfigError> {
        let url = url.into();
        if url.is_empty() {
            return Err(ConfigError::EmptyBaseUrl);
        }
        if !url.starts_with("https://") && !url.starts_with("http://") {
            return Err(ConfigError::InvalidBaseUrl { url });
        }
        Ok(Self(url))
    }

    /// Joins a call path onto the base by plain concatenation.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        format!("{}{path}", self.0)
    }
}

impl AsRef<str> for BaseUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(BaseUrl::new("https://api.example.com").is_ok());
        assert!(BaseUrl::new("http://localhost:8080").is_ok());
    }

    #[test]
    fn test_rejects_empty_url() {
        assert_eq!(BaseUrl::new(""), Err(ConfigError::EmptyBaseUrl));
    }

    #[test]
    fn test_rejects_missing_or_unsupported_scheme() {
        assert!(matches!(
            BaseUrl::new("api.example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            BaseUrl::new("ftp://api.example.com"),
            Err(ConfigError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn test_join_is_plain_concatenation() {
        let base = BaseUrl::new("https://api.example.com/todos/").unwrap();
        assert_eq!(base.join("1"), "https://api.example.com/todos/1");

        let no_slash = BaseUrl::new("https://api.example.com").unwrap();
        assert_eq!(no_slash.join("/items"), "https://api.example.com/items");
    }

    #[test]
    fn test_preserves_value_verbatim() {
        let base = BaseUrl::new("https://api.example.com/v1/").unwrap();
        assert_eq!(base.to_string(), "https://api.example.com/v1/");
    }
}
