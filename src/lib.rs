//! # Pulseboard
//!
//! Telemetry dashboard core: streams synthetic fps, memory and latency
//! samples into bounded buffers, aggregates them into time windows on a
//! worker thread, and renders them as line, bar, scatter or heatmap charts.
//!
//! ## Features
//!
//! - **Live streams**: Restartable generators ticking into capped buffers
//! - **Off-thread aggregation**: Message-based worker with request timeouts
//! - **Rendering**: Backend-agnostic drawing with zoom, pan and hover
//! - **Performance metrics**: Rolling frame/memory log with percentiles
//! - **Real-time**: WebSocket push of every new sample
//!
//! ## Modules
//!
//! - [`stream`]: Sample generation and live streams
//! - [`aggregate`]: Bucketing, normalization and the aggregation worker
//! - [`render`]: Coordinate mapping and chart drawing
//! - [`metrics`]: Rendering performance log
//! - [`api`]: REST API server with Axum
//! - [`websocket`]: Real-time sample push
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pulseboard::aggregate::{aggregate, AggregationPeriod};
//! use pulseboard::render::{render_svg, ChartKind};
//! use pulseboard::stream::{LiveStream, LiveStreamConfig, SeriesKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let stream = LiveStream::new(SeriesKind::Fps, LiveStreamConfig::default());
//!     stream.start()?;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(1)).await;
//!     stream.stop().await;
//!
//!     let samples = stream.snapshot().await;
//!     let buckets = aggregate(&samples, AggregationPeriod::OneMinute);
//!     println!("{} samples in {} buckets", samples.len(), buckets.len());
//!
//!     let svg = render_svg(ChartKind::Line, &samples, 800.0, 400.0);
//!     std::fs::write("fps.svg", svg)?;
//!
//!     Ok(())
//! }
//! ```

pub mod aggregate;
pub mod api;
pub mod config;
pub mod metrics;
pub mod render;
pub mod stream;
pub mod websocket;

// Re-export top-level types for convenience
pub use stream::{
    generate_multi_series, BoundedBuffer, LiveStream, LiveStreamConfig, Sample, SampleFilter,
    SampleGenerator, SeriesKind, StreamError, StreamResult, StreamSet,
};

pub use aggregate::{
    AggregateBucket, AggregateError, AggregateResult, AggregationPeriod, AggregationWorker,
    WorkerRequest, WorkerResponse,
};

pub use render::{render_svg, ChartKind, ChartRenderer, RenderError, RenderResult, Surface, Viewport};

pub use metrics::{MetricsCollector, MetricsError, MetricsResult, MetricsSample, PerformanceReport};

pub use api::{build_router, serve, ApiError, AppState};

pub use websocket::{ClientMessage, ConnectionHub, HubConfig, HubError, ServerMessage, WsEvent};

pub use config::{
    ApiConfig as ConfigApiConfig, Config, ConfigError, LoggingConfig,
    MetricsConfig as ConfigMetricsConfig, RenderConfig, StreamConfig as ConfigStreamConfig,
    WorkerConfig as ConfigWorkerConfig,
};
