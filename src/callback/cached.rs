//! Caching callback decorator
//!
//! Wraps an inner callback and answers `304 Not Modified` for a path it
//! has already served, when the client signals (via `If-Modified-Since`)
//! that it holds a cached copy. Two independent axes are involved:
//! server-side memory (has this instance served the path before?) and
//! the client-side cache lifetime sent back as a `Cache-Control`
//! max-age. A 304 is only sent when the server remembers the path AND
//! the client declared a cached copy; otherwise the inner callback runs
//! again in full.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use hyper::header::IF_MODIFIED_SINCE;
use hyper::StatusCode;

use crate::callback::{Callback, CallbackError};
use crate::http::{Exchange, Response};

/// Decorator that remembers which paths it has already served
///
/// Matching delegates unchanged to the inner callback. Each decorator
/// instance owns its own served-path memory; wrap it in an [`Arc`] to
/// keep a handle for [`reset`] after registering it with a dispatcher.
///
/// [`Arc`]: std::sync::Arc
/// [`reset`]: CachedCallback::reset
pub struct CachedCallback<C> {
    inner: C,
    served: Mutex<HashSet<String>>,
    server_caching_enabled: bool,
    client_caching_interval: u32,
}

impl<C: Callback> CachedCallback<C> {
    /// Wrap an existing callback; server-side caching starts enabled,
    /// client-side caching disabled
    #[must_use]
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            served: Mutex::new(HashSet::new()),
            server_caching_enabled: true,
            client_caching_interval: 0,
        }
    }

    /// Enable or disable answering 304 for already-served paths
    #[must_use]
    pub const fn with_server_caching(mut self, enabled: bool) -> Self {
        self.server_caching_enabled = enabled;
        self
    }

    /// Time, in seconds, that a client may keep a response in its local
    /// cache before asking again; negative values clamp to 0 (disabled)
    #[must_use]
    pub fn with_caching_interval(mut self, seconds: i32) -> Self {
        self.client_caching_interval = u32::try_from(seconds).unwrap_or(0);
        self
    }

    /// Forget every path served so far
    pub fn reset(&self) {
        self.served_set().clear();
    }

    /// Whether a path has been served since construction or the last reset
    #[must_use]
    pub fn has_served(&self, path: &str) -> bool {
        self.served_set().contains(path)
    }

    // A poisoned lock only means a peer panicked holding the guard; the
    // set itself stays usable, and answering beats propagating.
    fn served_set(&self) -> MutexGuard<'_, HashSet<String>> {
        self.served.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Callback> Callback for CachedCallback<C> {
    fn matches(&self, exchange: &Exchange) -> bool {
        self.inner.matches(exchange)
    }

    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError> {
        let path = exchange.path();
        let bypass_cache = !self.server_caching_enabled
            || !self.served_set().contains(path)
            || !exchange.has_header(IF_MODIFIED_SINCE.as_str());
        if bypass_cache {
            self.served_set().insert(path.to_string());
            let response = self.inner.process(exchange)?;
            if self.client_caching_interval > 0 {
                return Ok(response.enable_caching(self.client_caching_interval));
            }
            return Ok(response);
        }
        // Only reached when caching is enabled, the path has already
        // been served, and the browser says it has it in cache
        Ok(Response::empty(StatusCode::NOT_MODIFIED))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::StaticCallback;
    use crate::http::ContentType;
    use hyper::header::CACHE_CONTROL;

    fn cached_page() -> CachedCallback<StaticCallback> {
        CachedCallback::new(StaticCallback::new("page", ContentType::Html))
    }

    fn revisit(path: &str) -> Exchange {
        Exchange::get(path).with_header("If-Modified-Since", "Thu, 01 Jan 1970 00:00:00 GMT")
    }

    #[test]
    fn test_first_request_is_served_in_full() {
        let callback = cached_page();
        let response = callback.process(&Exchange::get("/foo.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::OK);
        assert!(callback.has_served("/foo.txt"));
    }

    #[test]
    fn test_revisit_with_client_copy_is_not_modified() {
        let callback = cached_page();
        callback.process(&Exchange::get("/foo.txt")).unwrap();
        let response = callback.process(&revisit("/foo.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::NOT_MODIFIED);
        assert!(response.body().is_empty());
        assert_eq!(response.content_type(), None);
    }

    #[test]
    fn test_revisit_without_client_copy_is_served_again() {
        let callback = cached_page();
        callback.process(&Exchange::get("/foo.txt")).unwrap();
        let response = callback.process(&Exchange::get("/foo.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::OK);
    }

    #[test]
    fn test_other_paths_are_unaffected() {
        let callback = cached_page();
        callback.process(&Exchange::get("/foo.txt")).unwrap();
        let response = callback.process(&revisit("/baz.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::OK);
    }

    #[test]
    fn test_reset_forgets_served_paths() {
        let callback = cached_page();
        callback.process(&Exchange::get("/foo.txt")).unwrap();
        callback.reset();
        assert!(!callback.has_served("/foo.txt"));
        let response = callback.process(&revisit("/foo.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::OK);
    }

    #[test]
    fn test_disabled_server_caching_always_serves() {
        let callback = cached_page().with_server_caching(false);
        callback.process(&Exchange::get("/foo.txt")).unwrap();
        let response = callback.process(&revisit("/foo.txt")).unwrap();
        assert_eq!(response.code(), StatusCode::OK);
    }

    #[test]
    fn test_client_caching_interval_sets_max_age() {
        let callback = cached_page().with_caching_interval(600);
        let response = callback.process(&Exchange::get("/foo.txt")).unwrap();
        assert_eq!(
            response.headers().get(CACHE_CONTROL).unwrap(),
            "private, max-age=600"
        );
    }

    #[test]
    fn test_negative_interval_clamps_to_disabled() {
        let callback = cached_page().with_caching_interval(-5);
        let response = callback.process(&Exchange::get("/foo.txt")).unwrap();
        assert!(response.headers().get(CACHE_CONTROL).is_none());
    }

    #[test]
    fn test_matching_delegates_to_inner() {
        let callback = cached_page();
        assert!(callback.matches(&Exchange::get("/anything")));
    }
}
