//! Aggregation
//!
//! - **period**: Fixed aggregation windows (1min, 5min, 1hour)
//! - **bucket**: Pure aggregation, normalization and series statistics
//! - **worker**: Dedicated aggregation thread with a request/response channel
//! - **error**: Error types
//!
//! # Example
//!
//! ```rust,no_run
//! use pulseboard::aggregate::{aggregate, AggregationPeriod};
//! use pulseboard::stream::Sample;
//!
//! let samples = vec![Sample::new(0, 10.0), Sample::new(30_000, 20.0)];
//! let buckets = aggregate(&samples, AggregationPeriod::OneMinute);
//! assert_eq!(buckets[0].avg, 15.0);
//! ```

pub mod bucket;
pub mod error;
pub mod period;
pub mod worker;

pub use bucket::{aggregate, calculate_stats, normalize, AggregateBucket, SeriesStats};
pub use error::{AggregateError, AggregateResult};
pub use period::AggregationPeriod;
pub use worker::{
    process_message, process_request, AggregateRequest, AggregationWorker, NormalizeRequest,
    WorkerConfig, WorkerRequest, WorkerResponse,
};
