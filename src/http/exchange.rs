//! Request exchange module
//!
//! One `Exchange` represents a single inbound request together with the
//! outbound headers the transport layer wants on the reply. The dispatcher
//! borrows it for exactly one dispatch; nothing in the core outlives it.

use std::borrow::Cow;

use hyper::body::Bytes;
use hyper::header::{HeaderMap, HeaderName, HeaderValue};
use hyper::{Method, Uri};

use crate::logger;

/// A single inbound request paired with its outbound header sink
#[derive(Debug)]
pub struct Exchange {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
    /// Headers contributed outside of a callback's response, merged
    /// additively into the reply when it is sent
    response_headers: HeaderMap,
}

impl Exchange {
    /// Create an exchange from already-parsed request parts
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            response_headers: HeaderMap::new(),
        }
    }

    /// Create a GET exchange for a request target like `/page?p=v`
    ///
    /// Intended for programmatic requests, e.g. driving a dispatcher
    /// without a listening socket.
    ///
    /// # Panics
    /// Panics if `target` is not a valid request target.
    #[must_use]
    pub fn get(target: &str) -> Self {
        let uri: Uri = target.parse().expect("invalid request target");
        Self::new(Method::GET, uri, HeaderMap::new(), Bytes::new())
    }

    /// Create a POST exchange with the given body
    ///
    /// # Panics
    /// Panics if `target` is not a valid request target.
    #[must_use]
    pub fn post(target: &str, body: impl Into<Bytes>) -> Self {
        let uri: Uri = target.parse().expect("invalid request target");
        Self::new(Method::POST, uri, HeaderMap::new(), body.into())
    }

    /// Add a request header, replacing any previous value
    ///
    /// Invalid names or values are dropped with a warning.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        match parse_header(name, value) {
            Some((name, value)) => {
                self.headers.insert(name, value);
            }
            None => logger::log_warning(&format!("dropping invalid request header '{name}'")),
        }
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Raw query string, without the leading `?`
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a request header, if present and valid UTF-8
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    #[must_use]
    pub fn has_header(&self, name: &str) -> bool {
        self.headers.contains_key(name)
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// Request body decoded as text (lossy on invalid UTF-8)
    #[must_use]
    pub fn body_text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Append an outbound header to be merged into the reply
    ///
    /// Invalid names or values are dropped with a warning.
    pub fn add_response_header(&mut self, name: &str, value: &str) {
        match parse_header(name, value) {
            Some((name, value)) => {
                self.response_headers.append(name, value);
            }
            None => logger::log_warning(&format!("dropping invalid response header '{name}'")),
        }
    }

    #[must_use]
    pub const fn response_headers(&self) -> &HeaderMap {
        &self.response_headers
    }
}

fn parse_header(name: &str, value: &str) -> Option<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
    let value = HeaderValue::from_str(value).ok()?;
    Some((name, value))
}
