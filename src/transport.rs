//! The injected network transport seam.
//!
//! The pipeline performs its single network call through the [`Transport`]
//! trait, decoupling the client from any specific HTTP library. The default
//! production implementation, [`ReqwestTransport`], drives a
//! [`reqwest::Client`]; tests and embedders can supply their own.
//!
//! # Contract
//!
//! A non-2xx status is a normal, inspectable [`RawResponse`]; transports
//! must not turn it into an `Err`. An `Err` means no response was obtained
//! at all (DNS failure, refused connection, broken stream).

use std::collections::HashMap;

use async_trait::async_trait;
use thiserror::Error;

use crate::request::RequestDescriptor;

/// Error returned when the transport obtained no response at all.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Description of the underlying network failure.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A buffered response from the transport.
///
/// The transport reads the full body before handing the response to the
/// pipeline, so decoding is a pure operation on the buffered bytes.
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: u16,
    /// Response headers, keys lowercased.
    pub headers: HashMap<String, String>,
    body: Vec<u8>,
}

impl RawResponse {
    /// Creates a response from its parts.
    #[must_use]
    pub const fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Returns `true` when the status is in the 2xx range.
    #[must_use]
    pub const fn ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Decodes the buffered body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error when the body is not valid JSON
    /// (including when it is empty).
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }

    /// Returns the buffered body as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The injected function performing the actual network call.
///
/// Implementations must be `Send + Sync`: one transport instance is shared
/// by every request made through a client.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs exactly one network exchange for the finalized descriptor.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError`] only when no response was obtained at
    /// all. Non-2xx responses are `Ok`.
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError>;
}

/// The default production transport over [`reqwest::Client`].
#[derive(Debug, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport around an existing reqwest client, preserving
    /// its connection pool and TLS configuration.
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let method = match request.method {
            crate::request::Method::Get => reqwest::Method::GET,
            crate::request::Method::Post => reqwest::Method::POST,
            crate::request::Method::Put => reqwest::Method::PUT,
            crate::request::Method::Patch => reqwest::Method::PATCH,
            crate::request::Method::Delete => reqwest::Method::DELETE,
            crate::request::Method::Head => reqwest::Method::HEAD,
            crate::request::Method::Options => reqwest::Method::OPTIONS,
            crate::request::Method::Trace => reqwest::Method::TRACE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder.send().await?;

        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            headers.insert(
                name.as_str().to_lowercase(),
                value.to_str().unwrap_or_default().to_string(),
            );
        }
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse::new(status, headers, body))
    }
}
