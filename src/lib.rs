//! Switchboard, a minimal HTTP request-dispatch server
//!
//! An incoming request is matched against an ordered chain of
//! callbacks; the first callback whose `matches` predicate fires
//! computes the response. The dispatcher always answers: an unmatched
//! request gets a 400, a failing callback a 500 with the rendered
//! error, and a caching decorator can short-circuit repeat requests
//! with a 304.
//!
//! ```
//! use hyper::{Method, StatusCode};
//! use switchboard::callback::RestCallback;
//! use switchboard::http::{ContentType, Exchange, Response};
//! use switchboard::Dispatcher;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.register(RestCallback::new(Method::GET, "/hello", |_ex, params| {
//!     let name = params.get("name").map_or("world", String::as_str);
//!     Ok(Response::new(StatusCode::OK, format!("Hi {name}"), ContentType::Text))
//! }));
//!
//! let response = dispatcher.dispatch(&Exchange::get("/hello?name=ada"));
//! assert_eq!(response.body().as_ref(), b"Hi ada");
//! ```

pub mod callback;
pub mod config;
pub mod dispatcher;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;

pub use callback::{CachedCallback, Callback, CallbackError, StaticCallback};
pub use dispatcher::Dispatcher;
pub use http::{ContentType, Cookie, Exchange, Response};
