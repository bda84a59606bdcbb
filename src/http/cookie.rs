//! HTTP cookie module

use hyper::header::COOKIE;

use crate::http::Exchange;

/// Representation of an HTTP request/response cookie
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    name: String,
    value: String,
}

impl Cookie {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Extract a named cookie from the request's `Cookie` headers
    ///
    /// If no cookie with this name is present, the value is an empty
    /// string.
    #[must_use]
    pub fn from_exchange(exchange: &Exchange, name: &str) -> Self {
        for header in exchange.headers().get_all(COOKIE) {
            let Ok(text) = header.to_str() else { continue };
            for pair in text.split(';') {
                if let Some((pair_name, value)) = pair.trim().split_once('=') {
                    if pair_name == name {
                        return Self::new(name, value);
                    }
                }
            }
        }
        Self::new(name, "")
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_cookie() {
        let exchange = Exchange::get("/").with_header("Cookie", "session=abc123");
        let cookie = Cookie::from_exchange(&exchange, "session");
        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "abc123");
    }

    #[test]
    fn test_extract_among_several() {
        let exchange = Exchange::get("/").with_header("Cookie", "a=1; session=xyz; b=2");
        assert_eq!(Cookie::from_exchange(&exchange, "b").value(), "2");
        assert_eq!(Cookie::from_exchange(&exchange, "session").value(), "xyz");
    }

    #[test]
    fn test_absent_cookie_is_empty() {
        let exchange = Exchange::get("/").with_header("Cookie", "a=1");
        assert_eq!(Cookie::from_exchange(&exchange, "missing").value(), "");
    }

    #[test]
    fn test_no_cookie_header() {
        let exchange = Exchange::get("/");
        assert_eq!(Cookie::from_exchange(&exchange, "a").value(), "");
    }
}
