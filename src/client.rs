//! The client facade binding a base URL, default headers, and hooks.
//!
//! A [`Client`] exposes one bound call per HTTP method, a typed `_as`
//! variant of each that validates the response against a [`Schema`], and
//! query shortcuts that render a [`Query`] into the request path. All
//! state is fixed at construction; the client holds nothing mutable, so
//! any number of requests may be in flight concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use crate::config::BaseUrl;
use crate::error::ConfigError;
use crate::hooks::EventHooks;
use crate::pipeline;
use crate::query::{Filter, Paginate, Populate, Query, Search, Sort, Timebox};
use crate::request::{Method, RequestDescriptor};
use crate::response::ApiResponse;
use crate::schema::Schema;
use crate::transport::{ReqwestTransport, Transport};

/// A typed HTTP API client bound to one base URL.
///
/// # Thread Safety
///
/// `Client` is `Send + Sync`; share it behind an `Arc` or by reference and
/// issue requests from as many tasks as needed; nothing is mutated after
/// construction.
///
/// # Example
///
/// ```rust,ignore
/// use portico::{Client, SerdeSchema};
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Todo {
///     id: u64,
///     title: String,
/// }
///
/// let client = Client::builder("https://jsonplaceholder.typicode.com/todos/")
///     .header("Authorization", "Bearer 21978297389723189")
///     .build()?;
///
/// let todo = client.get_as("1", &SerdeSchema::<Todo>::new()).await;
/// if let Some(data) = todo.data() {
///     println!("fetched {}", data.title);
/// }
/// ```
pub struct Client {
    base_url: BaseUrl,
    headers: HashMap<String, String>,
    hooks: EventHooks,
    transport: Arc<dyn Transport>,
}

// Verify Client is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Client>();
};

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Creates a client with no default headers, no hooks, and the default
    /// reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is empty or has an
    /// unsupported scheme.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Self::builder(base_url).build()
    }

    /// Creates a builder for configuring headers, hooks, and the transport.
    ///
    /// # Example
    ///
    /// ```rust
    /// use portico::{Client, EventHooks};
    ///
    /// let client = Client::builder("https://api.example.com")
    ///     .header("Authorization", "Bearer token")
    ///     .hooks(EventHooks::new().on_failed_authentication(|| eprintln!("401")))
    ///     .build()
    ///     .unwrap();
    /// ```
    #[must_use]
    pub fn builder(base_url: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(base_url)
    }

    /// Returns the base URL this client is bound to.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the default headers sent with every request.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// Sends a GET request, returning the raw decoded body.
    pub async fn get(&self, path: &str) -> ApiResponse<Value> {
        self.request_raw(Method::Get, path, None).await
    }

    /// Sends a GET request validated against a schema.
    pub async fn get_as<S: Schema>(&self, path: &str, schema: &S) -> ApiResponse<S::Output> {
        self.request_as(Method::Get, path, None, schema).await
    }

    /// Sends a POST request with a JSON body, returning the raw decoded body.
    pub async fn post(&self, path: &str, body: Value) -> ApiResponse<Value> {
        self.request_raw(Method::Post, path, Some(body)).await
    }

    /// Sends a POST request validated against a schema.
    pub async fn post_as<S: Schema>(
        &self,
        path: &str,
        schema: &S,
        body: Value,
    ) -> ApiResponse<S::Output> {
        self.request_as(Method::Post, path, Some(body), schema).await
    }

    /// Sends a PUT request with a JSON body, returning the raw decoded body.
    pub async fn put(&self, path: &str, body: Value) -> ApiResponse<Value> {
        self.request_raw(Method::Put, path, Some(body)).await
    }

    /// Sends a PUT request validated against a schema.
    pub async fn put_as<S: Schema>(
        &self,
        path: &str,
        schema: &S,
        body: Value,
    ) -> ApiResponse<S::Output> {
        self.request_as(Method::Put, path, Some(body), schema).await
    }

    /// Sends a PATCH request with a JSON body, returning the raw decoded body.
    pub async fn patch(&self, path: &str, body: Value) -> ApiResponse<Value> {
        self.request_raw(Method::Patch, path, Some(body)).await
    }

    /// Sends a PATCH request validated against a schema.
    pub async fn patch_as<S: Schema>(
        &self,
        path: &str,
        schema: &S,
        body: Value,
    ) -> ApiResponse<S::Output> {
        self.request_as(Method::Patch, path, Some(body), schema)
            .await
    }

    /// Sends a DELETE request, returning the raw decoded body.
    pub async fn delete(&self, path: &str) -> ApiResponse<Value> {
        self.request_raw(Method::Delete, path, None).await
    }

    /// Sends a DELETE request validated against a schema.
    pub async fn delete_as<S: Schema>(&self, path: &str, schema: &S) -> ApiResponse<S::Output> {
        self.request_as(Method::Delete, path, None, schema).await
    }

    /// Sends a HEAD request, returning the raw decoded body.
    pub async fn head(&self, path: &str) -> ApiResponse<Value> {
        self.request_raw(Method::Head, path, None).await
    }

    /// Sends a HEAD request validated against a schema.
    pub async fn head_as<S: Schema>(&self, path: &str, schema: &S) -> ApiResponse<S::Output> {
        self.request_as(Method::Head, path, None, schema).await
    }

    /// Sends an OPTIONS request, returning the raw decoded body.
    pub async fn options(&self, path: &str) -> ApiResponse<Value> {
        self.request_raw(Method::Options, path, None).await
    }

    /// Sends an OPTIONS request validated against a schema.
    pub async fn options_as<S: Schema>(&self, path: &str, schema: &S) -> ApiResponse<S::Output> {
        self.request_as(Method::Options, path, None, schema).await
    }

    /// Sends a TRACE request, returning the raw decoded body.
    pub async fn trace(&self, path: &str) -> ApiResponse<Value> {
        self.request_raw(Method::Trace, path, None).await
    }

    /// Sends a TRACE request validated against a schema.
    pub async fn trace_as<S: Schema>(&self, path: &str, schema: &S) -> ApiResponse<S::Output> {
        self.request_as(Method::Trace, path, None, schema).await
    }

    /// Performs a GET against `path` plus the rendered query string.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use portico::query::{Filter, Query};
    ///
    /// let open = client
    ///     .query("issues", &Query::new().filter(Filter::new().prop("state").value("open")))
    ///     .await;
    /// ```
    pub async fn query(&self, path: &str, query: &Query) -> ApiResponse<Value> {
        let target = format!("{path}{}", query.to_query_string());
        self.get(&target).await
    }

    /// Performs a GET with only a populate sub-intent.
    pub async fn populate(&self, path: &str, populate: Populate) -> ApiResponse<Value> {
        self.query(path, &Query::new().populate(populate)).await
    }

    /// Performs a GET with only a timebox sub-intent.
    pub async fn timebox(&self, path: &str, timebox: Timebox) -> ApiResponse<Value> {
        self.query(path, &Query::new().timebox(timebox)).await
    }

    /// Performs a GET with only a filter sub-intent.
    pub async fn filter(&self, path: &str, filter: Filter) -> ApiResponse<Value> {
        self.query(path, &Query::new().filter(filter)).await
    }

    /// Performs a GET with only a search sub-intent.
    pub async fn search(&self, path: &str, search: Search) -> ApiResponse<Value> {
        self.query(path, &Query::new().search(search)).await
    }

    /// Performs a GET with only a sort sub-intent.
    pub async fn sort(&self, path: &str, sort: Sort) -> ApiResponse<Value> {
        self.query(path, &Query::new().sort(sort)).await
    }

    /// Performs a GET with only a paginate sub-intent.
    pub async fn paginate(&self, path: &str, paginate: Paginate) -> ApiResponse<Value> {
        self.query(path, &Query::new().paginate(paginate)).await
    }

    /// Builds the descriptor for one call: fixed `Content-Type` first, the
    /// client's default headers over it, body in wire form.
    fn build_request(&self, method: Method, path: &str, body: Option<Value>) -> RequestDescriptor {
        let mut headers = HashMap::new();
        headers.insert(
            "Content-Type".to_string(),
            "application/json".to_string(),
        );
        headers.extend(self.headers.clone());

        RequestDescriptor {
            method,
            url: self.base_url.join(path),
            headers,
            body,
        }
    }

    async fn request_raw(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> ApiResponse<Value> {
        let request = self.build_request(method, path, body);
        pipeline::execute_raw(self.transport.as_ref(), &self.hooks, request).await
    }

    async fn request_as<S: Schema>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        schema: &S,
    ) -> ApiResponse<S::Output> {
        let request = self.build_request(method, path, body);
        pipeline::execute_with_schema(self.transport.as_ref(), &self.hooks, request, schema).await
    }
}

/// Builder for [`Client`] instances.
///
/// Validation happens at [`build`](Self::build): an invalid base URL is
/// rejected before any request can be made.
pub struct ClientBuilder {
    base_url: String,
    headers: HashMap<String, String>,
    hooks: EventHooks,
    transport: Option<Arc<dyn Transport>>,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers: HashMap::new(),
            hooks: EventHooks::new(),
            transport: None,
        }
    }

    /// Adds a default header sent with every request.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Sets all default headers at once.
    #[must_use]
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the lifecycle hooks shared by every request.
    #[must_use]
    pub fn hooks(mut self, hooks: EventHooks) -> Self {
        self.hooks = hooks;
        self
    }

    /// Replaces the default reqwest transport.
    #[must_use]
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Builds the client, validating the base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the base URL is empty or has an
    /// unsupported scheme.
    pub fn build(self) -> Result<Client, ConfigError> {
        let base_url = BaseUrl::new(self.base_url)?;
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(ReqwestTransport::default()));

        Ok(Client {
            base_url,
            headers: self.headers,
            hooks: self.hooks,
            transport,
        })
    }
}
