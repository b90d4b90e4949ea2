//! HTTP server exposing the Prometheus `/metrics` endpoint.

use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;

async fn metrics_handler() -> String {
    crate::metrics::gather()
}

/// Bind `0.0.0.0:port` and serve `/metrics`. Long-running; spawn as a task.
pub async fn run_http_server(port: u16) {
    let app = Router::new().route("/metrics", get(metrics_handler));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    tracing::info!(%addr, "metrics HTTP server listening");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(%addr, error = %e, "failed to bind metrics HTTP server");
            return;
        }
    };

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!(error = %e, "metrics HTTP server error");
    }
}
