//! # portico
//!
//! A typed HTTP API client: requests are built against a base URL,
//! executed through an injectable transport, optionally validated against
//! a schema, and resolved into a uniform success/failure envelope, with
//! lifecycle hooks observing every decision point along the way.
//!
//! ## Overview
//!
//! This crate provides:
//! - A request pipeline that classifies every outcome into a closed error
//!   taxonomy and never lets a failure escape as a panic
//! - A success/failure envelope ([`ApiResponse`]) callers branch on
//! - Optional lifecycle hooks ([`EventHooks`]), including a pre-dispatch
//!   hook that can mutate the outbound request
//! - A schema seam ([`Schema`], [`SerdeSchema`]) for typed, validated
//!   response payloads
//! - A transport seam ([`Transport`], [`ReqwestTransport`]) decoupling the
//!   pipeline from the HTTP library
//! - A query-string DSL ([`query`]) for filtering, searching, sorting,
//!   pagination, time-boxing, and relation population
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use portico::{Client, SerdeSchema};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Todo {
//!     id: u64,
//!     title: String,
//! }
//!
//! let client = Client::new("https://jsonplaceholder.typicode.com/todos/")?;
//!
//! match client.get_as("1", &SerdeSchema::<Todo>::new()).await {
//!     portico::ApiResponse::Success { data } => println!("{}", data.title),
//!     portico::ApiResponse::Failure { error } => eprintln!("{error}"),
//! }
//! ```
//!
//! ## Hooks
//!
//! Every request fires exactly one outcome hook, and the `on_request` hook
//! can patch the outbound request before dispatch:
//!
//! ```rust
//! use portico::{Client, EventHooks, RequestOverlay};
//!
//! let client = Client::builder("https://api.example.com")
//!     .hooks(
//!         EventHooks::new()
//!             .on_request(|_req| {
//!                 Some(RequestOverlay::new().header("Authorization", "Bearer token"))
//!             })
//!             .on_failed_authentication(|| eprintln!("credentials rejected")),
//!     )
//!     .build()
//!     .unwrap();
//! ```
//!
//! ## Query DSL
//!
//! ```rust
//! use portico::query::{Filter, Paginate, Query};
//!
//! let query = Query::new()
//!     .filter(Filter::new().prop("status").value("open"))
//!     .paginate(Paginate::new().limit(25).page(2));
//!
//! assert_eq!(
//!     query.to_query_string(),
//!     "?filter_prop=status&filter_val=open&limit=25&page=2"
//! );
//! ```
//!
//! ## Design Principles
//!
//! - **No exceptions past the boundary**: every failure resolves to a
//!   failure envelope with a closed-set error kind
//! - **No global state**: configuration is instance-based and fixed at
//!   construction
//! - **Thread-safe**: clients are `Send + Sync` and freely shared across
//!   tasks
//! - **Injectable seams**: transport and validator are traits, so tests
//!   and embedders can substitute their own

pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
mod pipeline;
pub mod query;
pub mod request;
pub mod response;
pub mod schema;
pub mod transport;

// Re-export public types at crate root for convenience
pub use client::{Client, ClientBuilder};
pub use config::BaseUrl;
pub use error::{ApiError, ConfigError, ErrorKind};
pub use hooks::EventHooks;
pub use request::{Method, RequestDescriptor, RequestOverlay};
pub use response::ApiResponse;
pub use schema::{Issue, Schema, SerdeSchema, ValidationFailure};
pub use transport::{RawResponse, ReqwestTransport, Transport, TransportError};
