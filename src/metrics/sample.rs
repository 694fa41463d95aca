//! Performance sample types

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Memory usage at one point in time, in bytes
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct MemoryReading {
    pub used: u64,
    pub limit: u64,
}

/// One rendering performance measurement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSample {
    /// Frames drawn during the last reporting window
    pub fps: f64,
    /// Duration of the last frame
    pub frame_time_ms: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heap_used: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heap_limit: Option<u64>,
    /// Unix timestamp in milliseconds
    #[serde(default = "now_millis")]
    pub timestamp: i64,
}

impl MetricsSample {
    /// Sample stamped with the current time
    pub fn new(fps: f64, frame_time_ms: f64) -> Self {
        Self {
            fps,
            frame_time_ms,
            heap_used: None,
            heap_limit: None,
            timestamp: now_millis(),
        }
    }

    /// Builder: attach a memory reading
    pub fn memory(mut self, reading: Option<MemoryReading>) -> Self {
        self.heap_used = reading.map(|m| m.used);
        self.heap_limit = reading.map(|m| m.limit);
        self
    }

    /// Builder: set the timestamp
    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Memory reading, if this sample carries one
    pub fn memory_reading(&self) -> Option<MemoryReading> {
        match (self.heap_used, self.heap_limit) {
            (Some(used), Some(limit)) => Some(MemoryReading { used, limit }),
            (Some(used), None) => Some(MemoryReading { used, limit: 0 }),
            _ => None,
        }
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
