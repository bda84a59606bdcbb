//! Callback module
//!
//! A callback is one unit of the dispatch chain: it decides whether it
//! applies to an exchange (`matches`) and, when it does, computes the
//! response (`process`). The dispatcher consults callbacks in
//! registration order and stops at the first match.

pub mod cached;
pub mod rest;

use std::sync::Arc;

use hyper::body::Bytes;
use hyper::StatusCode;

use crate::http::{ContentType, Exchange, Response};

pub use cached::CachedCallback;
pub use rest::{query_to_map, CleanRestCallback, Params, RestCallback};

/// Error raised while a matched callback computes its response
///
/// The dispatcher is the single recovery point: any of these becomes a
/// 500 response, never a dropped connection.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Message(String),
}

impl CallbackError {
    /// Build an error from a plain message
    #[must_use]
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }
}

/// A matchable, invocable route handler
pub trait Callback: Send + Sync {
    /// Whether this callback applies to the exchange
    fn matches(&self, exchange: &Exchange) -> bool;

    /// Compute the response for an exchange this callback matched
    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError>;
}

impl<C: Callback + ?Sized> Callback for Arc<C> {
    fn matches(&self, exchange: &Exchange) -> bool {
        (**self).matches(exchange)
    }

    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError> {
        (**self).process(exchange)
    }
}

impl<C: Callback + ?Sized> Callback for Box<C> {
    fn matches(&self, exchange: &Exchange) -> bool {
        (**self).matches(exchange)
    }

    fn process(&self, exchange: &Exchange) -> Result<Response, CallbackError> {
        (**self).process(exchange)
    }
}

/// Callback that matches every exchange and serves a fixed body
///
/// Useful as the terminal element of a chain, e.g. a default homepage.
#[derive(Debug, Clone)]
pub struct StaticCallback {
    body: Bytes,
    content_type: ContentType,
}

impl StaticCallback {
    #[must_use]
    pub fn new(body: impl Into<Bytes>, content_type: ContentType) -> Self {
        Self {
            body: body.into(),
            content_type,
        }
    }
}

impl Callback for StaticCallback {
    fn matches(&self, _exchange: &Exchange) -> bool {
        true
    }

    fn process(&self, _exchange: &Exchange) -> Result<Response, CallbackError> {
        Ok(Response::new(
            StatusCode::OK,
            self.body.clone(),
            self.content_type,
        ))
    }
}
