//! REST callback module
//!
//! Two matching styles over a configured method and path:
//!
//! - [`RestCallback`] matches the path exactly and reads parameters from
//!   the query string (GET) or the request body (anything else).
//! - [`CleanRestCallback`] matches the path as a prefix; the trailing
//!   segments become a positional parameter. For example
//!   `page?id=3&section=index` would be written as the clean URL
//!   `page/3/index`, where `page` is the registered path and the rest is
//!   actually parameters.

use std::collections::HashMap;

use hyper::Method;

use crate::callback::{Callback, CallbackError};
use crate::http::{Exchange, Response};

/// Attribute-value pairs extracted from a request
pub type Params = HashMap<String, String>;

/// Transform a query string into a map of attribute-value pairs
///
/// For example, the query of `http://abc.com/xyz?a=1&b=2` maps "a" to
/// "1" and "b" to "2". The corner cases:
///
/// - an absent or empty query yields a single empty-string key mapped to
///   an empty string;
/// - a single pair without `=` is a valueless key under GET, and the raw
///   payload stored under the empty-string key for any other method;
/// - each token splits at its first `=`, the value being everything
///   after it; later duplicate keys overwrite earlier ones.
#[must_use]
pub fn query_to_map(query: Option<&str>, method: &Method) -> Params {
    let mut out = Params::new();
    let Some(query) = query else {
        out.insert(String::new(), String::new());
        return out;
    };
    let pairs: Vec<&str> = query.split('&').collect();
    if pairs.len() == 1 && !pairs[0].contains('=') {
        if *method == Method::GET {
            // Single param with no value
            out.insert(pairs[0].to_string(), String::new());
        } else {
            // No params; likely a POST request with a raw payload
            out.insert(String::new(), pairs[0].to_string());
        }
        return out;
    }
    for pair in pairs {
        match pair.split_once('=') {
            Some((name, value)) => out.insert(name.to_string(), value.to_string()),
            None => out.insert(pair.to_string(), String::new()),
        };
    }
    out
}

fn method_matches(configured: &Method, ignore_method: bool, actual: &Method) -> bool {
    ignore_method || configured == actual
}

/// Callback matching a method and an exact path
pub struct RestCallback<H> {
    method: Method,
    ignore_method: bool,
    path: String,
    handler: H,
}

impl<H> RestCallback<H>
where
    H: Fn(&Exchange, &Params) -> Result<Response, CallbackError> + Send + Sync,
{
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, handler: H) -> Self {
        Self {
            method,
            ignore_method: false,
            path: path.into(),
            handler,
        }
    }

    /// Match any request method instead of the configured one
    ///
    /// The configured method still decides where parameters are read
    /// from (query string for GET, body otherwise).
    #[must_use]
    pub const fn ignore_method(mut self) -> Self {
        self.ignore_method = true;
        self
    }

    /// Parameters of the exchange, read from the query string (GET) or
    /// the request body (anything else)
    #[must_use]
    pub fn parameters(&self, exchange: &Exchange) -> Params {
        if self.method == Method::GET {
            query_to_map(exchange.query(), &self.method)
        } else {
            query_to_map(Some(&exchange.body_text()), &self.method)
        }
    }
}

impl<H> Callback for RestCallback<H>
where
    H: Fn(&Exchange, &Params) -> Result<Response, CallbackError> + Send + Sync,
{
    fn matches(&self, exchange: &Exchange) -> bool {
        method_matches(&self.method, self.ignore_method, exchange.method())
            && exchange.path() == self.path
    }

    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError> {
        let params = self.parameters(exchange);
        (self.handler)(exchange, &params)
    }
}

/// Callback for "clean" URLs: the registered path is a prefix and the
/// trailing segments are a positional parameter
pub struct CleanRestCallback<H> {
    method: Method,
    ignore_method: bool,
    path: String,
    handler: H,
}

impl<H> CleanRestCallback<H>
where
    H: Fn(&Exchange, &Params) -> Result<Response, CallbackError> + Send + Sync,
{
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>, handler: H) -> Self {
        Self {
            method,
            ignore_method: false,
            path: path.into(),
            handler,
        }
    }

    /// Match any request method instead of the configured one
    #[must_use]
    pub const fn ignore_method(mut self) -> Self {
        self.ignore_method = true;
        self
    }

    /// Parameters of the exchange
    ///
    /// The part of the path after the registered prefix, minus one
    /// leading slash, is stored under the empty-string key; query or
    /// body pairs are parsed on top of it, so an explicit empty-string
    /// key wins over the positional value.
    #[must_use]
    pub fn parameters(&self, exchange: &Exchange) -> Params {
        let mut trailing = &exchange.path()[self.path.len()..];
        if let Some(rest) = trailing.strip_prefix('/') {
            trailing = rest;
        }
        let mut params = Params::new();
        params.insert(String::new(), trailing.to_string());
        if self.method == Method::GET {
            if let Some(query) = exchange.query().filter(|q| !q.is_empty()) {
                params.extend(query_to_map(Some(query), &self.method));
            }
        } else {
            let body = exchange.body_text();
            if !body.is_empty() {
                params.extend(query_to_map(Some(&body), &self.method));
            }
        }
        params
    }
}

impl<H> Callback for CleanRestCallback<H>
where
    H: Fn(&Exchange, &Params) -> Result<Response, CallbackError> + Send + Sync,
{
    fn matches(&self, exchange: &Exchange) -> bool {
        if !method_matches(&self.method, self.ignore_method, exchange.method()) {
            return false;
        }
        exchange
            .path()
            .strip_prefix(&self.path)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError> {
        let params = self.parameters(exchange);
        (self.handler)(exchange, &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::ContentType;
    use hyper::StatusCode;

    fn echo_handler(_exchange: &Exchange, _params: &Params) -> Result<Response, CallbackError> {
        Ok(Response::new(StatusCode::OK, "Hi", ContentType::Text))
    }

    #[test]
    fn test_query_to_map_pair_and_bare_key() {
        let map = query_to_map(Some("p=v&q"), &Method::GET);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("p").unwrap(), "v");
        assert_eq!(map.get("q").unwrap(), "");
    }

    #[test]
    fn test_query_to_map_single_bare_key() {
        let map = query_to_map(Some("p"), &Method::GET);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("p").unwrap(), "");
    }

    #[test]
    fn test_query_to_map_empty() {
        let map = query_to_map(Some(""), &Method::GET);
        assert_eq!(map.len(), 1);
        assert!(map.contains_key(""));
    }

    #[test]
    fn test_query_to_map_absent() {
        let map = query_to_map(None, &Method::GET);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("").unwrap(), "");
    }

    #[test]
    fn test_query_to_map_all_bare() {
        let map = query_to_map(Some("p&q&r"), &Method::GET);
        assert_eq!(map.len(), 3);
        assert!(map.values().all(String::is_empty));
    }

    #[test]
    fn test_query_to_map_mixed() {
        let map = query_to_map(Some("p&q=2&r"), &Method::GET);
        assert_eq!(map.len(), 3);
        assert_eq!(map.get("q").unwrap(), "2");
    }

    #[test]
    fn test_query_to_map_splits_at_first_equals() {
        let map = query_to_map(Some("a=b=c"), &Method::GET);
        assert_eq!(map.get("a").unwrap(), "b=c");
    }

    #[test]
    fn test_query_to_map_raw_post_payload() {
        let map = query_to_map(Some("just a payload"), &Method::POST);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("").unwrap(), "just a payload");
    }

    #[test]
    fn test_query_to_map_duplicate_keys_overwrite() {
        let map = query_to_map(Some("a=1&a=2"), &Method::GET);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a").unwrap(), "2");
    }

    #[test]
    fn test_rest_matches_exact_path_only() {
        let callback = RestCallback::new(Method::GET, "/hello", echo_handler);
        assert!(callback.matches(&Exchange::get("/hello")));
        assert!(!callback.matches(&Exchange::get("/hello/world")));
        assert!(!callback.matches(&Exchange::get("/other")));
    }

    #[test]
    fn test_rest_checks_method() {
        let callback = RestCallback::new(Method::GET, "/hello", echo_handler);
        assert!(!callback.matches(&Exchange::post("/hello", "")));
        let any = RestCallback::new(Method::GET, "/hello", echo_handler).ignore_method();
        assert!(any.matches(&Exchange::post("/hello", "")));
    }

    #[test]
    fn test_rest_get_parameters_from_query() {
        let callback = RestCallback::new(Method::GET, "/hello", echo_handler);
        let params = callback.parameters(&Exchange::get("/hello?a=2&b=1"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("a").unwrap(), "2");
    }

    #[test]
    fn test_rest_post_parameters_from_body() {
        let callback = RestCallback::new(Method::POST, "/hello", echo_handler);
        let params = callback.parameters(&Exchange::post("/hello", "a=2&b=1"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("b").unwrap(), "1");
    }

    #[test]
    fn test_rest_process_runs_handler() {
        let callback = RestCallback::new(Method::GET, "/hello", |_ex: &Exchange, params: &Params| {
            Ok(Response::new(
                StatusCode::OK,
                params.get("name").cloned().unwrap_or_default(),
                ContentType::Text,
            ))
        });
        let response = callback.process(&Exchange::get("/hello?name=ada")).unwrap();
        assert_eq!(response.body().as_ref(), b"ada");
    }

    #[test]
    fn test_clean_matches_prefix() {
        let callback = CleanRestCallback::new(Method::GET, "/foo", echo_handler);
        assert!(callback.matches(&Exchange::get("/foo")));
        assert!(callback.matches(&Exchange::get("/foo/bar/baz")));
        assert!(!callback.matches(&Exchange::get("/foobar")));
        assert!(!callback.matches(&Exchange::get("/other")));
    }

    #[test]
    fn test_clean_exact_path_yields_empty_positional() {
        let callback = CleanRestCallback::new(Method::GET, "/foo", echo_handler);
        let params = callback.parameters(&Exchange::get("/foo"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("").unwrap(), "");
    }

    #[test]
    fn test_clean_trailing_segments_become_positional() {
        let callback = CleanRestCallback::new(Method::GET, "/foo", echo_handler);
        let params = callback.parameters(&Exchange::get("/foo/bar/baz"));
        assert_eq!(params.len(), 1);
        assert_eq!(params.get("").unwrap(), "bar/baz");
    }

    #[test]
    fn test_clean_merges_query_pairs() {
        let callback = CleanRestCallback::new(Method::GET, "/foo", echo_handler);
        let params = callback.parameters(&Exchange::get("/foo/bar/baz?a=2&b=1"));
        assert_eq!(params.len(), 3);
        assert_eq!(params.get("").unwrap(), "bar/baz");
        assert_eq!(params.get("a").unwrap(), "2");
        assert_eq!(params.get("b").unwrap(), "1");
    }

    #[test]
    fn test_clean_explicit_empty_key_wins() {
        let callback = CleanRestCallback::new(Method::GET, "/foo", echo_handler);
        let params = callback.parameters(&Exchange::get("/foo/bar?=override"));
        assert_eq!(params.get("").unwrap(), "override");
    }

    #[test]
    fn test_clean_post_merges_body_pairs() {
        let callback = CleanRestCallback::new(Method::POST, "/foo", echo_handler);
        let params = callback.parameters(&Exchange::post("/foo/bar", "a=2"));
        assert_eq!(params.len(), 2);
        assert_eq!(params.get("").unwrap(), "bar");
        assert_eq!(params.get("a").unwrap(), "2");
    }
}
