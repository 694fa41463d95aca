//! Rendering Performance Metrics
//!
//! - **sample**: `MetricsSample` and `MemoryReading`
//! - **collector**: Shared rolling log with stats and JSON export
//! - **stats**: Percentiles and the `PerformanceReport` summary
//! - **frame**: Per-frame timer that records one sample per second
//! - **memory**: Memory probes (`sysinfo`-backed by default)
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use pulseboard::metrics::{MetricsCollector, MetricsSample};
//!
//! let collector = MetricsCollector::default();
//! collector.record(MetricsSample::new(60.0, 16.4));
//!
//! if let Some(report) = collector.stats() {
//!     println!("p95 frame time: {:.1}ms", report.frame_time.p95);
//! }
//! ```

pub mod collector;
pub mod error;
pub mod frame;
pub mod memory;
pub mod sample;
pub mod stats;

pub use collector::{export_file_name, MetricsCollector, DEFAULT_MAX_SAMPLES};
pub use error::{MetricsError, MetricsResult};
pub use frame::FrameTimer;
pub use memory::{FixedMemoryProbe, MemoryProbe, NoMemoryProbe, SystemMemoryProbe};
pub use sample::{MemoryReading, MetricsSample};
pub use stats::{percentile, Distribution, PerformanceReport};
