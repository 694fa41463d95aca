//! Pulseboard REST API
//!
//! HTTP API layer for the dashboard, built with Axum.
//!
//! # Endpoints
//!
//! ## Data
//! - `GET /api/data?count=&startTime=` - Batch of synthetic fps/memory/latency samples
//!
//! ## Aggregation
//! - `POST /api/aggregate` - Send a worker request message, receive the response message
//!
//! ## Charts
//! - `GET /api/chart?series=&kind=&width=&height=&period=&minValue=&maxValue=&category=` -
//!   SVG chart of a live buffer
//!
//! ## Metrics
//! - `GET /api/metrics/stats` - Frame and memory statistics
//! - `GET /api/metrics/export` - Download the performance log
//! - `POST /api/metrics` - Record a performance sample
//! - `DELETE /api/metrics` - Clear the performance log
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! ## WebSocket
//! - `GET /api/realtime` - Live sample streaming
//!
//! # Example
//!
//! ```rust,ignore
//! use pulseboard::aggregate::{AggregationWorker, WorkerConfig};
//! use pulseboard::api::{serve, AppState};
//! use pulseboard::config::ApiConfig;
//! use pulseboard::metrics::MetricsCollector;
//! use pulseboard::stream::{LiveStreamConfig, StreamSet};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let streams = Arc::new(StreamSet::new(LiveStreamConfig::default()));
//!     let worker = Arc::new(AggregationWorker::spawn(WorkerConfig::default())?);
//!
//!     let state = AppState::new(streams, worker, MetricsCollector::default(), ApiConfig::default());
//!     serve(state).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::AppState;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::websocket::websocket_handler;

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/data", get(routes::data::fetch_data))
        .route("/aggregate", post(routes::aggregate::aggregate))
        .route("/chart", get(routes::chart::render_chart))
        .route(
            "/metrics",
            post(routes::metrics::record_sample).delete(routes::metrics::clear_metrics),
        )
        .route("/metrics/stats", get(routes::metrics::get_stats))
        .route("/metrics/export", get(routes::metrics::export_metrics))
        .route("/realtime", get(websocket_handler));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(shared_state)
}

/// Start the API server and run until ctrl-c or SIGTERM
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.config.addr();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Pulseboard API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Pulseboard API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
