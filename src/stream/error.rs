//! Stream error types

use thiserror::Error;

use super::types::SeriesKind;

/// Errors that can occur while driving live streams
#[derive(Error, Debug, PartialEq)]
pub enum StreamError {
    /// `start` was called on a stream whose timer is already running
    #[error("Stream already running: {0}")]
    AlreadyRunning(SeriesKind),

    /// Requested series does not exist
    #[error("Unknown series: {0}")]
    UnknownSeries(String),
}

/// Result type alias for stream operations
pub type StreamResult<T> = Result<T, StreamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StreamError::AlreadyRunning(SeriesKind::Fps);
        assert_eq!(err.to_string(), "Stream already running: fps");

        let err = StreamError::UnknownSeries("cpu".to_string());
        assert_eq!(err.to_string(), "Unknown series: cpu");
    }
}
