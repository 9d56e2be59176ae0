//! Lifecycle hooks fired at fixed pipeline points.
//!
//! An [`EventHooks`] record is supplied once at client construction and
//! shared read-only by every request made through that client. Every slot
//! is optional; an absent slot is simply skipped. Hooks are observation
//! points that never change how an outcome is classified, with one
//! exception: `on_request` may return a [`RequestOverlay`] that is merged
//! into the outbound request before dispatch.
//!
//! # Example
//!
//! ```rust
//! use portico::{EventHooks, RequestOverlay};
//!
//! let hooks = EventHooks::new()
//!     .on_request(|_request| {
//!         Some(RequestOverlay::new().header("Authorization", "Bearer token"))
//!     })
//!     .on_success(|data| println!("got {data}"))
//!     .on_failed_authentication(|| eprintln!("credentials rejected"));
//! ```

use serde_json::Value;

use crate::request::{RequestDescriptor, RequestOverlay};
use crate::schema::Issue;
use crate::transport::RawResponse;

type OnRequestFn = Box<dyn Fn(&RequestDescriptor) -> Option<RequestOverlay> + Send + Sync>;
type BeforeRequestFn = Box<dyn Fn(&RequestDescriptor) + Send + Sync>;
type OnSuccessFn = Box<dyn Fn(&Value) + Send + Sync>;
type OnFailedValidationFn = Box<dyn Fn(&[Issue]) + Send + Sync>;
type OnFailedRequestFn = Box<dyn Fn(&RawResponse) + Send + Sync>;
type NotifyFn = Box<dyn Fn() + Send + Sync>;

/// The set of optional lifecycle callbacks a caller may supply.
///
/// | Slot | Fires when |
/// |------|------------|
/// | `on_request` | before dispatch; may return an overlay merged into the request |
/// | `before_request` | before dispatch; observation only, return value ignored |
/// | `on_success` | 2xx, body decoded, and schema (when supplied) accepted it |
/// | `on_failed_validation` | schema rejected the decoded body |
/// | `on_failed_parse` | body could not be decoded as JSON |
/// | `on_failed_request` | non-2xx status other than 401/403 |
/// | `on_failed_authentication` | 401 |
/// | `on_failed_authorization` | 403 |
///
/// Exactly one of the outcome slots fires per request.
#[derive(Default)]
pub struct EventHooks {
    on_request: Option<OnRequestFn>,
    before_request: Option<BeforeRequestFn>,
    on_success: Option<OnSuccessFn>,
    on_failed_validation: Option<OnFailedValidationFn>,
    on_failed_parse: Option<NotifyFn>,
    on_failed_request: Option<OnFailedRequestFn>,
    on_failed_authentication: Option<NotifyFn>,
    on_failed_authorization: Option<NotifyFn>,
}

impl std::fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventHooks")
            .field("on_request", &self.on_request.is_some())
            .field("before_request", &self.before_request.is_some())
            .field("on_success", &self.on_success.is_some())
            .field("on_failed_validation", &self.on_failed_validation.is_some())
            .field("on_failed_parse", &self.on_failed_parse.is_some())
            .field("on_failed_request", &self.on_failed_request.is_some())
            .field(
                "on_failed_authentication",
                &self.on_failed_authentication.is_some(),
            )
            .field(
                "on_failed_authorization",
                &self.on_failed_authorization.is_some(),
            )
            .finish()
    }
}

impl EventHooks {
    /// Creates an empty hook set; every slot is a no-op until filled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the request-mutation hook, fired before dispatch.
    ///
    /// The returned overlay (if any) is merged into the outbound request,
    /// overlay values winning on key collision.
    #[must_use]
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestDescriptor) -> Option<RequestOverlay> + Send + Sync + 'static,
    {
        self.on_request = Some(Box::new(hook));
        self
    }

    /// Sets the pre-dispatch observation hook; its return value is ignored.
    #[must_use]
    pub fn before_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestDescriptor) + Send + Sync + 'static,
    {
        self.before_request = Some(Box::new(hook));
        self
    }

    /// Sets the success hook, fired with the decoded response body.
    #[must_use]
    pub fn on_success<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on_success = Some(Box::new(hook));
        self
    }

    /// Sets the validation-failure hook, fired with the issue list.
    #[must_use]
    pub fn on_failed_validation<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[Issue]) + Send + Sync + 'static,
    {
        self.on_failed_validation = Some(Box::new(hook));
        self
    }

    /// Sets the parse-failure hook, fired when the body is not JSON.
    #[must_use]
    pub fn on_failed_parse<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_failed_parse = Some(Box::new(hook));
        self
    }

    /// Sets the generic-failure hook, fired with the raw response for
    /// non-2xx statuses other than 401/403.
    #[must_use]
    pub fn on_failed_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RawResponse) + Send + Sync + 'static,
    {
        self.on_failed_request = Some(Box::new(hook));
        self
    }

    /// Sets the authentication-failure hook, fired on 401.
    #[must_use]
    pub fn on_failed_authentication<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_failed_authentication = Some(Box::new(hook));
        self
    }

    /// Sets the authorization-failure hook, fired on 403.
    #[must_use]
    pub fn on_failed_authorization<F>(mut self, hook: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.on_failed_authorization = Some(Box::new(hook));
        self
    }

    pub(crate) fn request_overlay(&self, request: &RequestDescriptor) -> Option<RequestOverlay> {
        self.on_request.as_ref().and_then(|hook| hook(request))
    }

    pub(crate) fn emit_before_request(&self, request: &RequestDescriptor) {
        if let Some(hook) = &self.before_request {
            hook(request);
        }
    }

    pub(crate) fn emit_success(&self, data: &Value) {
        if let Some(hook) = &self.on_success {
            hook(data);
        }
    }

    pub(crate) fn emit_failed_validation(&self, issues: &[Issue]) {
        if let Some(hook) = &self.on_failed_validation {
            hook(issues);
        }
    }

    pub(crate) fn emit_failed_parse(&self) {
        if let Some(hook) = &self.on_failed_parse {
            hook();
        }
    }

    pub(crate) fn emit_failed_request(&self, response: &RawResponse) {
        if let Some(hook) = &self.on_failed_request {
            hook(response);
        }
    }

    pub(crate) fn emit_failed_authentication(&self) {
        if let Some(hook) = &self.on_failed_authentication {
            hook();
        }
    }

    pub(crate) fn emit_failed_authorization(&self) {
        if let Some(hook) = &self.on_failed_authorization {
            hook();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_empty_hook_set_is_all_no_ops() {
        let hooks = EventHooks::new();
        let request = RequestDescriptor::new(Method::Get, "https://api.example.com/");

        assert!(hooks.request_overlay(&request).is_none());
        hooks.emit_before_request(&request);
        hooks.emit_success(&json!({}));
        hooks.emit_failed_validation(&[]);
        hooks.emit_failed_parse();
        hooks.emit_failed_authentication();
        hooks.emit_failed_authorization();
    }

    #[test]
    fn test_on_request_overlay_is_returned() {
        let hooks = EventHooks::new()
            .on_request(|_| Some(RequestOverlay::new().header("X-Trace-Id", "t-1")));
        let request = RequestDescriptor::new(Method::Get, "https://api.example.com/");

        let overlay = hooks.request_overlay(&request).unwrap();
        assert_eq!(overlay.headers.get("X-Trace-Id"), Some(&"t-1".to_string()));
    }

    #[test]
    fn test_on_request_may_decline_to_overlay() {
        let hooks = EventHooks::new().on_request(|_| None);
        let request = RequestDescriptor::new(Method::Get, "https://api.example.com/");

        assert!(hooks.request_overlay(&request).is_none());
    }

    #[test]
    fn test_emit_helpers_invoke_installed_hooks() {
        let count = Arc::new(AtomicUsize::new(0));
        let c1 = Arc::clone(&count);
        let c2 = Arc::clone(&count);

        let hooks = EventHooks::new()
            .on_success(move |_| {
                c1.fetch_add(1, Ordering::SeqCst);
            })
            .on_failed_parse(move || {
                c2.fetch_add(1, Ordering::SeqCst);
            });

        hooks.emit_success(&json!({"ok": true}));
        hooks.emit_failed_parse();

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_hooks_are_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<EventHooks>();
    }

    #[test]
    fn test_debug_output_reports_slot_presence() {
        let hooks = EventHooks::new().on_failed_parse(|| {});
        let debug = format!("{hooks:?}");

        assert!(debug.contains("on_failed_parse: true"));
        assert!(debug.contains("on_success: false"));
    }
}
