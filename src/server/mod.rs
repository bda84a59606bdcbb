//! Transport layer module
//!
//! Owns the listening socket and the per-connection serving logic; the
//! dispatch core only ever sees fully-parsed exchanges.

mod connection;
mod listener;

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::net::TcpListener;

pub use listener::create_reusable_listener;

use crate::config::Config;
use crate::dispatcher::Dispatcher;
use crate::logger;

/// Shared state for the serving loop
///
/// The dispatcher is assembled before serving begins and never mutated
/// afterwards; per-request state lives in the exchanges.
pub struct AppState {
    pub config: Config,
    pub dispatcher: Dispatcher,
}

/// Accept connections until a ctrl-c signal arrives
pub async fn run(
    listener: TcpListener,
    state: Arc<AppState>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = tokio::signal::ctrl_c() => {
                logger::log_shutdown();
                return Ok(());
            }
        }
    }
}
