//! `/metrics` HTTP endpoint.

use axum::{http::header, http::StatusCode, response::IntoResponse, routing::get, Router};
use prometheus::{Encoder, TextEncoder};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::error::TelemetryResult;

/// Render every registered metric in the text exposition format.
pub fn render_metrics() -> Result<String, String> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|e| e.to_string())?;
    String::from_utf8(buffer).map_err(|e| e.to_string())
}

async fn metrics_handler() -> impl IntoResponse {
    match render_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        ),
        Err(e) => {
            warn!(error = %e, "Failed to encode metrics");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain")],
                e,
            )
        }
    }
}

pub fn router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Serve `GET /metrics` on `0.0.0.0:port` until the task is dropped.
///
/// Port 0 disables the endpoint and returns immediately.
pub async fn serve_metrics(port: u16) -> TelemetryResult<()> {
    if port == 0 {
        info!("Metrics endpoint disabled");
        return Ok(());
    }

    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    info!(port, "Metrics endpoint listening on /metrics");
    axum::serve(listener, router()).await?;
    Ok(())
}
