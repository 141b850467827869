// Health and metrics endpoints.

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

use crate::error::ClientError;
use crate::metrics;

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "snake-swarm" }))
}

async fn metrics_handler() -> String {
    metrics::gather_metrics()
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
}

/// Serve the router on `0.0.0.0:port` until the process exits.
pub async fn serve(port: u16) -> Result<(), ClientError> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Metrics listening on port {}", port);
    axum::serve(listener, router()).await?;
    Ok(())
}
