//! Request types observed and mutated ahead of dispatch.
//!
//! This module provides the [`Method`] enum, the [`RequestDescriptor`] that
//! pre-request hooks observe, and the [`RequestOverlay`] patch an
//! `on_request` hook may return to mutate the outbound request.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// HTTP methods supported by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
    /// HTTP HEAD method for header-only retrieval.
    Head,
    /// HTTP OPTIONS method for capability discovery.
    Options,
    /// HTTP TRACE method for diagnostic echo.
    Trace,
}

impl Method {
    /// Returns the wire name of this method.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
        }
    }

    /// Returns `true` for the methods that carry a request body.
    #[must_use]
    pub const fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch)
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The outbound request as pre-request hooks observe it.
///
/// A descriptor is built once per call: default headers merged under the
/// fixed `Content-Type`, body serialized to its wire form. After the
/// `on_request` overlay (if any) is merged, the descriptor is final for the
/// remainder of the cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,
    /// The fully-joined request URL (base URL + path).
    pub url: String,
    /// The headers that will be sent with the request.
    pub headers: HashMap<String, String>,
    /// The JSON body, for body-bearing methods.
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Creates a descriptor with the given method and URL and no headers.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Merges an overlay into this descriptor.
    ///
    /// Overlay headers win over existing headers on key collision; an
    /// overlay body replaces the existing body. This is the one point in
    /// the cycle where a hook's return value feeds back into the request.
    pub fn apply(&mut self, overlay: RequestOverlay) {
        self.headers.extend(overlay.headers);
        if let Some(body) = overlay.body {
            self.body = Some(body);
        }
    }
}

/// A partial patch an `on_request` hook may return.
///
/// Absent fields leave the descriptor untouched. Headers present here win
/// over previously merged headers on key collision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequestOverlay {
    /// Headers to add or replace on the outbound request.
    pub headers: HashMap<String, String>,
    /// A replacement JSON body, if the hook rewrites it.
    pub body: Option<Value>,
}

impl RequestOverlay {
    /// Creates an empty overlay.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a header to the overlay.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets a replacement body on the overlay.
    #[must_use]
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_wire_names() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Trace.to_string(), "TRACE");
    }

    #[test]
    fn test_body_bearing_methods() {
        assert!(Method::Post.has_body());
        assert!(Method::Put.has_body());
        assert!(Method::Patch.has_body());
        assert!(!Method::Get.has_body());
        assert!(!Method::Head.has_body());
        assert!(!Method::Options.has_body());
        assert!(!Method::Trace.has_body());
    }

    #[test]
    fn test_overlay_headers_win_on_collision() {
        let mut descriptor = RequestDescriptor::new(Method::Get, "https://api.example.com/items");
        descriptor
            .headers
            .insert("Authorization".to_string(), "Bearer old".to_string());

        descriptor.apply(
            RequestOverlay::new()
                .header("Authorization", "Bearer new")
                .header("X-Trace-Id", "abc"),
        );

        assert_eq!(
            descriptor.headers.get("Authorization"),
            Some(&"Bearer new".to_string())
        );
        assert_eq!(descriptor.headers.get("X-Trace-Id"), Some(&"abc".to_string()));
    }

    #[test]
    fn test_overlay_without_body_preserves_existing_body() {
        let mut descriptor = RequestDescriptor::new(Method::Post, "https://api.example.com/items");
        descriptor.body = Some(json!({"title": "original"}));

        descriptor.apply(RequestOverlay::new().header("X-Trace-Id", "abc"));

        assert_eq!(descriptor.body, Some(json!({"title": "original"})));
    }

    #[test]
    fn test_overlay_body_replaces_existing_body() {
        let mut descriptor = RequestDescriptor::new(Method::Post, "https://api.example.com/items");
        descriptor.body = Some(json!({"title": "original"}));

        descriptor.apply(RequestOverlay::new().body(json!({"title": "rewritten"})));

        assert_eq!(descriptor.body, Some(json!({"title": "rewritten"})));
    }

    #[test]
    fn test_empty_overlay_is_a_no_op() {
        let mut descriptor = RequestDescriptor::new(Method::Get, "https://api.example.com/items");
        descriptor
            .headers
            .insert("Accept".to_string(), "application/json".to_string());
        let before = descriptor.clone();

        descriptor.apply(RequestOverlay::new());

        assert_eq!(descriptor, before);
    }
}
