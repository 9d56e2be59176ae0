//! The request execution pipeline.
//!
//! One invocation walks a fixed sequence of states (built, dispatched,
//! outcome-classified, validated, resolved) and always terminates in a
//! single envelope. Failures at any stage are normalized into
//! [`ApiError`] values; nothing panics or propagates past the pipeline
//! boundary. Hooks fire at each decision point but never change the
//! classification; only the `on_request` overlay feeds back, and only
//! before dispatch.

use serde_json::Value;

use crate::error::{ApiError, ErrorKind};
use crate::hooks::EventHooks;
use crate::request::RequestDescriptor;
use crate::response::ApiResponse;
use crate::schema::Schema;
use crate::transport::Transport;

/// Runs the pipeline without a schema: the success envelope wraps the raw
/// decoded body.
pub(crate) async fn execute_raw(
    transport: &dyn Transport,
    hooks: &EventHooks,
    request: RequestDescriptor,
) -> ApiResponse<Value> {
    match dispatch_and_decode(transport, hooks, request).await {
        Ok((_, body)) => {
            hooks.emit_success(&body);
            ApiResponse::success(body)
        }
        Err(error) => ApiResponse::failure(error),
    }
}

/// Runs the pipeline with a schema: the decoded body must pass validation
/// before the success envelope wraps the typed output.
pub(crate) async fn execute_with_schema<S: Schema + ?Sized>(
    transport: &dyn Transport,
    hooks: &EventHooks,
    request: RequestDescriptor,
    schema: &S,
) -> ApiResponse<S::Output> {
    match dispatch_and_decode(transport, hooks, request).await {
        Ok((status, body)) => match schema.parse(&body) {
            Ok(data) => {
                hooks.emit_success(&body);
                ApiResponse::success(data)
            }
            Err(failure) => {
                tracing::debug!("response body rejected by schema: {}", failure.message);
                hooks.emit_failed_validation(&failure.issues);
                let error = ApiError::new(ErrorKind::InvalidResponseJson, status)
                    .with_detail(failure.issues_as_detail())
                    .with_message(failure.message);
                ApiResponse::failure(error)
            }
        },
        Err(error) => ApiResponse::failure(error),
    }
}

/// The shared front of the pipeline: build, dispatch, classify, decode.
///
/// Returns the response status and decoded body for 2xx outcomes, or the
/// normalized error for everything else. Hooks for the failing stages fire
/// in here; the success and validation hooks belong to the callers.
async fn dispatch_and_decode(
    transport: &dyn Transport,
    hooks: &EventHooks,
    mut request: RequestDescriptor,
) -> Result<(u16, Value), ApiError> {
    // Built: both pre-dispatch hooks observe the built descriptor, then the
    // overlay (if any) finalizes it for the rest of the cycle.
    hooks.emit_before_request(&request);
    if let Some(overlay) = hooks.request_overlay(&request) {
        request.apply(overlay);
    }

    tracing::debug!("dispatching {} {}", request.method, request.url);

    // Dispatched: exactly one transport call, no retry.
    let response = match transport.send(&request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::debug!("transport yielded no response: {err}");
            return Err(
                ApiError::new(ErrorKind::InvalidResponse, 0).with_message(err.to_string())
            );
        }
    };

    // Outcome-classified.
    match response.status {
        401 => {
            hooks.emit_failed_authentication();
            return Err(ApiError::new(ErrorKind::Unauthenticated, 401));
        }
        // 403 keeps the Unauthenticated kind; Unauthorized stays reserved.
        403 => {
            hooks.emit_failed_authorization();
            return Err(ApiError::new(ErrorKind::Unauthenticated, 403));
        }
        status if !response.ok() => {
            tracing::debug!("request failed with status {status}");
            hooks.emit_failed_request(&response);
            return Err(ApiError::new(ErrorKind::InvalidResponse, status));
        }
        _ => {}
    }

    // Validated: decode the body.
    match response.json() {
        Ok(body) => Ok((response.status, body)),
        Err(err) => {
            hooks.emit_failed_parse();
            Err(ApiError::new(ErrorKind::InvalidResponseJson, response.status)
                .with_message(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::{Method, RequestOverlay};
    use crate::schema::SerdeSchema;
    use crate::transport::{RawResponse, TransportError};
    use async_trait::async_trait;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// A transport stub answering every request with one canned response.
    struct StubTransport {
        status: u16,
        body: Vec<u8>,
        seen: Mutex<Vec<RequestDescriptor>>,
    }

    impl StubTransport {
        fn new(status: u16, body: &[u8]) -> Self {
            Self {
                status,
                body: body.to_vec(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(RawResponse::new(
                self.status,
                HashMap::new(),
                self.body.clone(),
            ))
        }
    }

    /// A transport stub that never obtains a response.
    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        async fn send(&self, _request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
            Err(TransportError::new("connection refused"))
        }
    }

    fn request() -> RequestDescriptor {
        RequestDescriptor::new(Method::Get, "https://api.example.com/items")
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: u64,
    }

    #[tokio::test]
    async fn test_2xx_with_decodable_body_resolves_success() {
        let transport = StubTransport::new(200, br#"{"id": 1}"#);
        let hooks = EventHooks::new();

        let envelope = execute_raw(&transport, &hooks, request()).await;

        assert_eq!(envelope, ApiResponse::success(json!({"id": 1})));
    }

    #[tokio::test]
    async fn test_401_resolves_unauthenticated_and_fires_only_that_hook() {
        let transport = StubTransport::new(401, b"{}");
        let fired = Arc::new(Mutex::new(Vec::new()));

        let f1 = Arc::clone(&fired);
        let f2 = Arc::clone(&fired);
        let f3 = Arc::clone(&fired);
        let hooks = EventHooks::new()
            .on_failed_authentication(move || f1.lock().unwrap().push("authentication"))
            .on_failed_authorization(move || f2.lock().unwrap().push("authorization"))
            .on_success(move |_| f3.lock().unwrap().push("success"));

        let envelope = execute_raw(&transport, &hooks, request()).await;

        let error = envelope.error().unwrap();
        assert_eq!(error.kind, ErrorKind::Unauthenticated);
        assert_eq!(error.status_code, 401);
        assert_eq!(*fired.lock().unwrap(), vec!["authentication"]);
    }

    #[tokio::test]
    async fn test_403_fires_authorization_hook_but_keeps_unauthenticated_kind() {
        let transport = StubTransport::new(403, b"{}");
        let fired = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&fired);
        let hooks = EventHooks::new().on_failed_authorization(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        let envelope = execute_raw(&transport, &hooks, request()).await;

        let error = envelope.error().unwrap();
        assert_eq!(error.kind, ErrorKind::Unauthenticated);
        assert_eq!(error.status_code, 403);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_other_non_2xx_resolves_invalid_response_with_raw_hook() {
        let transport = StubTransport::new(500, b"oops");
        let observed_status = Arc::new(AtomicUsize::new(0));

        let o = Arc::clone(&observed_status);
        let hooks = EventHooks::new().on_failed_request(move |response| {
            o.store(response.status as usize, Ordering::SeqCst);
        });

        let envelope = execute_raw(&transport, &hooks, request()).await;

        let error = envelope.error().unwrap();
        assert_eq!(error.kind, ErrorKind::InvalidResponse);
        assert_eq!(error.status_code, 500);
        assert_eq!(observed_status.load(Ordering::SeqCst), 500);
    }

    #[tokio::test]
    async fn test_undecodable_body_resolves_invalid_response_json() {
        let transport = StubTransport::new(200, b"<html>not json</html>");
        let fired = Arc::new(AtomicUsize::new(0));

        let f = Arc::clone(&fired);
        let hooks = EventHooks::new().on_failed_parse(move || {
            f.fetch_add(1, Ordering::SeqCst);
        });

        let envelope = execute_raw(&transport, &hooks, request()).await;

        let error = envelope.error().unwrap();
        assert_eq!(error.kind, ErrorKind::InvalidResponseJson);
        assert_eq!(error.status_code, 200);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_schema_rejection_carries_issues_as_detail() {
        let transport = StubTransport::new(200, br#"{"wrong": true}"#);
        let issue_count = Arc::new(AtomicUsize::new(0));

        let c = Arc::clone(&issue_count);
        let hooks = EventHooks::new().on_failed_validation(move |issues| {
            c.store(issues.len(), Ordering::SeqCst);
        });

        let schema = SerdeSchema::<Item>::new();
        let envelope = execute_with_schema(&transport, &hooks, request(), &schema).await;

        let error = envelope.error().unwrap();
        assert_eq!(error.kind, ErrorKind::InvalidResponseJson);
        assert_eq!(error.status_code, 200);
        assert!(error.detail.is_some());
        assert_eq!(issue_count.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_schema_acceptance_resolves_typed_success() {
        let transport = StubTransport::new(200, br#"{"id": 9}"#);
        let hooks = EventHooks::new();

        let schema = SerdeSchema::<Item>::new();
        let envelope = execute_with_schema(&transport, &hooks, request(), &schema).await;

        assert_eq!(envelope.into_result().unwrap(), Item { id: 9 });
    }

    #[tokio::test]
    async fn test_transport_failure_resolves_invalid_response_with_status_zero() {
        let hooks = EventHooks::new();

        let envelope = execute_raw(&FailingTransport, &hooks, request()).await;

        let error = envelope.error().unwrap();
        assert_eq!(error.kind, ErrorKind::InvalidResponse);
        assert_eq!(error.status_code, 0);
        assert_eq!(error.message.as_deref(), Some("connection refused"));
    }

    #[tokio::test]
    async fn test_overlay_headers_reach_the_transport() {
        let transport = StubTransport::new(200, b"{}");
        let hooks = EventHooks::new()
            .on_request(|_| Some(RequestOverlay::new().header("Authorization", "Bearer t")));

        let mut built = request();
        built
            .headers
            .insert("Accept".to_string(), "application/json".to_string());
        execute_raw(&transport, &hooks, built).await;

        let seen = transport.seen.lock().unwrap();
        assert_eq!(
            seen[0].headers.get("Authorization"),
            Some(&"Bearer t".to_string())
        );
        assert_eq!(
            seen[0].headers.get("Accept"),
            Some(&"application/json".to_string())
        );
    }

    #[tokio::test]
    async fn test_before_request_observes_the_built_descriptor() {
        let transport = StubTransport::new(200, b"{}");
        let observed = Arc::new(Mutex::new(None));

        let o = Arc::clone(&observed);
        let hooks = EventHooks::new()
            .before_request(move |descriptor| {
                *o.lock().unwrap() = Some(descriptor.url.clone());
            })
            .on_request(|_| Some(RequestOverlay::new().header("X-Late", "1")));

        execute_raw(&transport, &hooks, request()).await;

        assert_eq!(
            observed.lock().unwrap().as_deref(),
            Some("https://api.example.com/items")
        );
    }

    #[tokio::test]
    async fn test_identical_requests_resolve_structurally_equal_envelopes() {
        let transport = StubTransport::new(200, br#"{"id": 1}"#);
        let hooks = EventHooks::new();

        let first = execute_raw(&transport, &hooks, request()).await;
        let second = execute_raw(&transport, &hooks, request()).await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_success_hook_sees_the_decoded_body() {
        let transport = StubTransport::new(200, br#"{"id": 5}"#);
        let seen = Arc::new(Mutex::new(None));

        let s = Arc::clone(&seen);
        let hooks = EventHooks::new().on_success(move |data| {
            *s.lock().unwrap() = Some(data.clone());
        });

        let schema = SerdeSchema::<Item>::new();
        execute_with_schema(&transport, &hooks, request(), &schema).await;

        assert_eq!(*seen.lock().unwrap(), Some(json!({"id": 5})));
    }
}
