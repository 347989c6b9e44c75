//! Server layer
//!
//! Listener setup, the accept loop, and per-connection handling shared by
//! the site and form services.

mod connection;
mod listener;
mod signal;

pub use connection::ServiceKind;
pub use listener::create_reusable_listener;
pub use signal::{start_signal_handler, SignalHandler};

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::AppState;
use crate::logger;

/// Accept connections forever, handing each off to a per-connection task.
pub async fn run_accept_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
    kind: ServiceKind,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer_addr)) => {
                connection::accept_connection(stream, peer_addr, &state, &active_connections, kind);
            }
            Err(e) => {
                logger::log_error(&format!(
                    "{} Failed to accept connection: {e}",
                    kind.label()
                ));
            }
        }
    }
}
