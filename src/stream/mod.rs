//! Telemetry Stream Generation
//!
//! This module produces the synthetic fps, memory and latency series the
//! dashboard displays:
//!
//! - **types**: Core data structures (Sample, SeriesKind, SeriesProfile)
//! - **generator**: Restartable sample generator and batch series generation
//! - **buffer**: Bounded, oldest-evicted sample buffer
//! - **filter**: Value range and category filtering
//! - **live**: Timer-driven live streams with deterministic stop
//! - **error**: Error types
//!
//! # Architecture
//!
//! ```text
//! Live path:
//!   timer tick → SampleGenerator → BoundedBuffer (write lock) → broadcast
//!
//! Batch path:
//!   (count, start, end) → generate_series → Vec<Sample>
//! ```
//!
//! # Example
//!
//! ```rust,no_run
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
//!     println!("Buffered {} samples", stream.len().await);
//!     Ok(())
//! }
//! ```

pub mod buffer;
pub mod error;
pub mod filter;
pub mod generator;
pub mod live;
pub mod types;

// Re-export commonly used types
pub use buffer::BoundedBuffer;
pub use error::{StreamError, StreamResult};
pub use filter::SampleFilter;
pub use generator::{
    generate_multi_series, generate_series, sine_trend, GeneratorConfig, GeneratorState,
    MultiSeries, SampleGenerator,
};
pub use live::{LiveStream, LiveStreamConfig, StreamSet};
pub use types::{Sample, SeriesKind, SeriesProfile};
