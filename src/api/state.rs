//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::aggregate::AggregationWorker;
use crate::config::{ApiConfig, RenderConfig};
use crate::metrics::MetricsCollector;
use crate::stream::StreamSet;
use crate::websocket::{ConnectionHub, HubConfig};

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Live fps/memory/latency streams
    pub streams: Arc<StreamSet>,
    /// Off-thread aggregation worker
    pub worker: Arc<AggregationWorker>,
    /// Rendering performance log
    pub metrics: MetricsCollector,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Default chart dimensions
    pub render: Arc<RenderConfig>,
    /// Directory the metrics export is also written to, if any
    pub export_dir: Option<Arc<str>>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// WebSocket connection hub for real-time streaming
    pub ws_hub: Arc<ConnectionHub>,
}

impl AppState {
    pub fn new(
        streams: Arc<StreamSet>,
        worker: Arc<AggregationWorker>,
        metrics: MetricsCollector,
        config: ApiConfig,
    ) -> Self {
        Self {
            streams,
            worker,
            metrics,
            config: Arc::new(config),
            render: Arc::new(RenderConfig::default()),
            export_dir: None,
            start_time: Instant::now(),
            ws_hub: Arc::new(ConnectionHub::new(HubConfig::default())),
        }
    }

    /// Builder: default chart dimensions
    pub fn render_config(mut self, render: RenderConfig) -> Self {
        self.render = Arc::new(render);
        self
    }

    /// Builder: also write metrics exports under `dir`
    pub fn export_dir(mut self, dir: impl Into<String>) -> Self {
        self.export_dir = Some(Arc::from(dir.into()));
        self
    }

    /// Builder: custom WebSocket hub configuration
    pub fn ws_config(mut self, hub_config: HubConfig) -> Self {
        self.ws_hub = Arc::new(ConnectionHub::new(hub_config));
        self
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Get WebSocket connection count
    pub async fn ws_connection_count(&self) -> usize {
        self.ws_hub.connection_count().await
    }
}
