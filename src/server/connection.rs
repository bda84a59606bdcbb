// Connection handling module
// Accepts and serves a single TCP connection

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, CONTENT_LENGTH, CONTENT_TYPE, REFERER, USER_AGENT};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response, StatusCode, Version};
use hyper_util::rt::TokioIo;

use crate::http::Exchange;
use crate::logger::{self, AccessLogEntry};
use crate::server::AppState;

/// Accept and process a connection, checking limits and logging.
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    if state.config.logging.access_log {
        logger::log_connection_accepted(&peer_addr);
    }

    handle_connection(stream, peer_addr, Arc::clone(state), Arc::clone(conn_counter));
}

/// Serve a single connection in a spawned task.
///
/// Wraps the TCP stream in `TokioIo`, configures HTTP/1.1 keep-alive,
/// applies the configured connection timeout, and decrements the
/// connection counter when done.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    conn_counter: Arc<AtomicUsize>,
) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let keep_alive = state.config.performance.keep_alive_timeout > 0;
        let timeout_duration = Duration::from_secs(std::cmp::max(
            state.config.performance.read_timeout,
            state.config.performance.write_timeout,
        ));

        let mut builder = http1::Builder::new();
        if keep_alive {
            builder.keep_alive(true);
        }

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let state = Arc::clone(&service_state);
                async move { serve_request(req, &state, peer_addr).await }
            }),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_warning(&format!(
                "Connection from {peer_addr} timed out after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}

/// Turn one parsed request into one dispatched response.
///
/// The body is fully read here so callbacks see in-memory bytes; the
/// dispatcher itself never blocks on request I/O.
async fn serve_request(
    req: Request<Incoming>,
    state: &Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let version = version_string(req.version());
    let (parts, body) = req.into_parts();

    // Reject oversized bodies before buffering anything
    if let Some(response) = check_body_size(&parts.headers, state.config.http.max_body_size) {
        return Ok(response);
    }

    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            // A broken request body still gets an answer; the callback
            // simply sees an empty payload
            logger::log_error(&format!("failed to read request body: {err}"));
            Bytes::new()
        }
    };

    let exchange = Exchange::new(parts.method, parts.uri, parts.headers, body);
    let response = state.dispatcher.handle(&exchange);

    if state.config.logging.access_log {
        let mut entry = AccessLogEntry::new(
            peer_addr.ip().to_string(),
            exchange.method().to_string(),
            exchange.path().to_string(),
        );
        entry.query = exchange.query().map(str::to_string);
        entry.http_version = version.to_string();
        entry.status = response.status().as_u16();
        entry.body_bytes = response
            .headers()
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);
        entry.referer = exchange.header(REFERER.as_str()).map(str::to_string);
        entry.user_agent = exchange.header(USER_AGENT.as_str()).map(str::to_string);
        entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Validate the Content-Length header and build a 413 if exceeded
fn check_body_size(headers: &HeaderMap, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = headers.get(CONTENT_LENGTH)?;
    let size_str = content_length.to_str().ok()?;
    match size_str.parse::<u64>() {
        Ok(size) if size > max_body_size => {
            logger::log_error(&format!(
                "Request body too large: {size} bytes (max: {max_body_size})"
            ));
            Some(build_413_response())
        }
        Err(_) => {
            logger::log_warning(&format!(
                "Invalid Content-Length value: '{size_str}', skipping size check"
            ));
            None
        }
        _ => None,
    }
}

/// Build 413 Payload Too Large response
fn build_413_response() -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::from("413 Payload Too Large")));
    *response.status_mut() = StatusCode::PAYLOAD_TOO_LARGE;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, hyper::header::HeaderValue::from_static("text/plain"));
    response
}

const fn version_string(version: Version) -> &'static str {
    match version {
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        _ => "1.1",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_body_size_rejects_oversized() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, hyper::header::HeaderValue::from_static("2048"));
        let response = check_body_size(&headers, 1024).unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_check_body_size_allows_small_and_absent() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_LENGTH, hyper::header::HeaderValue::from_static("10"));
        assert!(check_body_size(&headers, 1024).is_none());
        assert!(check_body_size(&HeaderMap::new(), 1024).is_none());
    }

    #[test]
    fn test_check_body_size_ignores_garbage() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_LENGTH,
            hyper::header::HeaderValue::from_static("not-a-number"),
        );
        assert!(check_body_size(&headers, 1024).is_none());
    }
}
