//! Aggregation error types

use thiserror::Error;

/// Errors raised by the aggregation worker
#[derive(Error, Debug)]
pub enum AggregateError {
    /// No response within the request timeout
    #[error("Aggregation request timed out after {0}ms")]
    Timeout(u64),

    /// The worker answered with an error message
    #[error("Worker error: {0}")]
    Worker(String),

    /// The worker thread is gone
    #[error("Aggregation worker is closed")]
    Closed,

    /// The worker thread could not be started
    #[error("Failed to spawn aggregation worker: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Result type alias for aggregation operations
pub type AggregateResult<T> = Result<T, AggregateError>;
