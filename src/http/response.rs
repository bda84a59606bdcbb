//! HTTP response building module
//!
//! A `Response` is what a callback hands back to the dispatcher: status
//! code, header map and body bytes. All setters are fluent and consume
//! the value, so a callback can chain them:
//!
//! ```
//! use switchboard::http::{ContentType, Response};
//! use hyper::StatusCode;
//!
//! let response = Response::default()
//!     .set_code(StatusCode::OK)
//!     .set_body("Hi")
//!     .set_content_type(ContentType::Text);
//! assert_eq!(response.code(), StatusCode::OK);
//! ```

use hyper::body::Bytes;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE, EXPIRES,
    LOCATION, PRAGMA, SET_COOKIE,
};
use hyper::StatusCode;

use crate::http::{ContentType, Cookie};
use crate::logger;

/// One HTTP reply under construction
#[derive(Debug, Clone)]
pub struct Response {
    code: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Default for Response {
    /// An empty 200 response with no content type
    fn default() -> Self {
        Self {
            code: StatusCode::OK,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }
}

impl Response {
    /// Create a response with a code, body and content type
    #[must_use]
    pub fn new(code: StatusCode, body: impl Into<Bytes>, content_type: ContentType) -> Self {
        Self::default()
            .set_code(code)
            .set_body(body)
            .set_content_type(content_type)
    }

    /// Create a response with an empty body and no content type
    #[must_use]
    pub fn empty(code: StatusCode) -> Self {
        Self::default().set_code(code)
    }

    /// A plain 404 Not Found response
    #[must_use]
    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "404 Not Found", ContentType::Text)
    }

    /// A 303 See Other redirect to the given target
    #[must_use]
    pub fn redirect(target: &str) -> Self {
        Self::empty(StatusCode::SEE_OTHER).set_header_parsed(LOCATION, target)
    }

    /// Sets the HTTP response code
    #[must_use]
    pub const fn set_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }

    /// Sets the response contents, from a string or raw bytes
    #[must_use]
    pub fn set_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the response's content type
    #[must_use]
    pub fn set_content_type(self, content_type: ContentType) -> Self {
        self.set_mime(content_type.mime())
    }

    /// Sets the response's content type from a raw MIME string
    #[must_use]
    pub fn set_mime(self, mime: &str) -> Self {
        self.set_header_parsed(CONTENT_TYPE, mime)
    }

    /// Sets a response header, replacing any previous value
    ///
    /// Invalid names or values are dropped with a warning, never a panic.
    #[must_use]
    pub fn set_header(mut self, name: &str, value: &str) -> Self {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            logger::log_warning(&format!("dropping invalid header name '{name}'"));
            return self;
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => logger::log_warning(&format!("dropping invalid value for header '{name}'")),
        }
        self
    }

    /// Adds a response header without replacing previous values
    #[must_use]
    pub fn add_header(mut self, name: &str, value: &str) -> Self {
        let Ok(name) = HeaderName::from_bytes(name.as_bytes()) else {
            logger::log_warning(&format!("dropping invalid header name '{name}'"));
            return self;
        };
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.append(name, value);
            }
            Err(_) => logger::log_warning(&format!("dropping invalid value for header '{name}'")),
        }
        self
    }

    /// Marks the response as an attachment to be downloaded
    #[must_use]
    pub fn set_attachment(self, filename: &str) -> Self {
        self.set_header_parsed(CONTENT_DISPOSITION, &format!("attachment; filename={filename}"))
    }

    /// Attaches a cookie to the response
    #[must_use]
    pub fn add_cookie(mut self, cookie: &Cookie) -> Self {
        let pair = format!("{}={}", cookie.name(), cookie.value());
        match HeaderValue::from_str(&pair) {
            Ok(value) => {
                self.headers.append(SET_COOKIE, value);
            }
            Err(_) => logger::log_warning(&format!(
                "dropping cookie '{}' with invalid value",
                cookie.name()
            )),
        }
        self
    }

    /// Allows the client to keep this response in its local cache
    /// for `seconds` before asking again
    #[must_use]
    pub fn enable_caching(self, seconds: u32) -> Self {
        self.append_header_parsed(CACHE_CONTROL, &format!("private, max-age={seconds}"))
    }

    /// Instructs the client not to cache this response at all
    #[must_use]
    pub fn disable_caching(mut self) -> Self {
        self.headers
            .append(PRAGMA, HeaderValue::from_static("no-cache"));
        self.headers.append(
            CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        self.headers.append(EXPIRES, HeaderValue::from_static("0"));
        self
    }

    #[must_use]
    pub const fn code(&self) -> StatusCode {
        self.code
    }

    #[must_use]
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    #[must_use]
    pub const fn body(&self) -> &Bytes {
        &self.body
    }

    /// The value of the Content-Type header, if one is set
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    /// Splits the response into its code, headers and body
    #[must_use]
    pub fn into_parts(self) -> (StatusCode, HeaderMap, Bytes) {
        (self.code, self.headers, self.body)
    }

    fn set_header_parsed(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.insert(name, value);
            }
            Err(_) => logger::log_warning(&format!("dropping invalid value for header '{name}'")),
        }
        self
    }

    fn append_header_parsed(mut self, name: HeaderName, value: &str) -> Self {
        match HeaderValue::from_str(value) {
            Ok(value) => {
                self.headers.append(name, value);
            }
            Err(_) => logger::log_warning(&format!("dropping invalid value for header '{name}'")),
        }
        self
    }
}
