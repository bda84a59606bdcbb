//! Request dispatch module
//!
//! The dispatcher owns the ordered chain of callbacks, routes each
//! exchange to the first callback that matches, synthesizes error
//! responses, and assembles the wire reply handed to the transport.
//! Every exchange that reaches [`Dispatcher::handle`] gets exactly one
//! response; a failing callback becomes a 500, an unmatched request a
//! 400, never a dropped connection.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, SERVER};
use hyper::StatusCode;

use crate::callback::{Callback, CallbackError};
use crate::http::{ContentType, Exchange, Response};
use crate::logger;

/// Default value of the `Server` response header
pub const DEFAULT_SERVER_NAME: &str = concat!("Switchboard/", env!("CARGO_PKG_VERSION"));

/// Ordered chain of callbacks answering HTTP requests
pub struct Dispatcher {
    callbacks: Vec<Box<dyn Callback>>,
    server_name: String,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Instantiate an empty dispatcher
    #[must_use]
    pub fn new() -> Self {
        Self {
            callbacks: Vec::new(),
            server_name: DEFAULT_SERVER_NAME.to_string(),
        }
    }

    /// Name sent as the `Server` header of every response
    pub fn set_server_name(&mut self, name: impl Into<String>) {
        self.server_name = name.into();
    }

    /// Number of registered callbacks
    #[must_use]
    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Add a callback at the end of the chain
    pub fn register<C: Callback + 'static>(&mut self, callback: C) {
        self.callbacks.push(Box::new(callback));
    }

    /// Add a callback at a given position in the chain
    ///
    /// A negative `position` is relative to the end of the list and
    /// lands at `position + len - 1`: registering at -1 leaves one slot
    /// free at the tail. Callers relying on relative insertion expect
    /// exactly this arithmetic, so it stays as is.
    ///
    /// # Panics
    /// Panics when the computed position is out of range, the same way
    /// `Vec::insert` does; registration happens at setup time and an
    /// out-of-range position is a programming error.
    pub fn register_at<C: Callback + 'static>(&mut self, position: isize, callback: C) {
        let at = if position < 0 {
            position + self.callbacks.len() as isize - 1
        } else {
            position
        };
        let at = usize::try_from(at).expect("callback position out of range");
        self.callbacks.insert(at, Box::new(callback));
    }

    /// Route an exchange to the first matching callback
    ///
    /// Returns the callback's response, a 400 when nothing matched, or
    /// a 500 carrying the rendered failure when the callback errored.
    #[must_use]
    pub fn dispatch(&self, exchange: &Exchange) -> Response {
        for callback in &self.callbacks {
            if callback.matches(exchange) {
                return match callback.process(exchange) {
                    Ok(response) => response,
                    Err(err) => {
                        logger::log_error(&format!(
                            "callback failed for {}: {err}",
                            exchange.path()
                        ));
                        internal_error_response(&err)
                    }
                };
            }
        }
        // No callback was triggered: bad request
        Response::empty(StatusCode::BAD_REQUEST)
    }

    /// Dispatch an exchange and assemble the wire response
    pub fn handle(&self, exchange: &Exchange) -> hyper::Response<Full<Bytes>> {
        let response = self.dispatch(exchange);
        self.send(exchange, response)
    }

    /// Merge a response into the exchange's outbound headers and build
    /// the reply handed to the transport
    ///
    /// Headers merge additively: a header present both at the exchange
    /// level and on the response keeps both values.
    pub fn send(&self, exchange: &Exchange, response: Response) -> hyper::Response<Full<Bytes>> {
        let (code, headers, body) = response.into_parts();
        let length = body.len();
        let mut out = hyper::Response::new(Full::new(body));
        *out.status_mut() = code;
        let out_headers = out.headers_mut();
        for (name, value) in exchange.response_headers() {
            out_headers.append(name, value.clone());
        }
        if let Ok(server) = HeaderValue::from_str(&self.server_name) {
            out_headers.append(SERVER, server);
        }
        for (name, value) in &headers {
            out_headers.append(name, value.clone());
        }
        if length > 0 && !out_headers.contains_key(CONTENT_TYPE) {
            out_headers.insert(
                CONTENT_TYPE,
                HeaderValue::from_static(ContentType::OctetStream.mime()),
            );
        }
        out_headers.insert(CONTENT_LENGTH, HeaderValue::from(length));
        out
    }
}

/// 500 response embedding the rendered failure diagnostic
fn internal_error_response(err: &CallbackError) -> Response {
    let mut diagnostic = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        diagnostic.push_str("\ncaused by: ");
        diagnostic.push_str(&cause.to_string());
        source = cause.source();
    }
    let body = format!(
        "<html><body><h1>Internal Server Error</h1>\n\
         <p>The server replied with this error:</p>\
         <pre>{diagnostic}</pre></body></html>"
    );
    Response::new(StatusCode::INTERNAL_SERVER_ERROR, body, ContentType::Html)
}
