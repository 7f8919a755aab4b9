//! Liveness endpoint for uptime probing; not part of the monitoring core.

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;
use watch_logging::{watch_info, watch_warn};

const LIVENESS_REPLY: &str = "Streamwatch is running!";

pub fn router() -> Router {
    Router::new().route("/", get(|| async { LIVENESS_REPLY }))
}

/// Serves the liveness endpoint until the process exits. Binding or serving
/// failures degrade to a warning; the monitor itself keeps running.
pub async fn serve(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            watch_info!("Liveness endpoint listening on {addr}");
            if let Err(err) = axum::serve(listener, router()).await {
                watch_warn!("Liveness endpoint stopped: {err}");
            }
        }
        Err(err) => {
            watch_warn!("Could not bind liveness endpoint on {addr}: {err}");
        }
    }
}
