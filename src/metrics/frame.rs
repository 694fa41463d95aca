//! Frame timing
//!
//! [`FrameTimer`] is ticked once per rendered frame. It counts frames and,
//! once at least a second has passed since its last report, records a
//! sample with the frame count as fps and the latest frame delta as the
//! frame time.

use std::time::{Duration, Instant};

use super::collector::MetricsCollector;
use super::memory::MemoryProbe;
use super::sample::MetricsSample;

/// How often a sample is recorded
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_millis(1000);

pub struct FrameTimer {
    collector: MetricsCollector,
    probe: Box<dyn MemoryProbe>,
    report_interval: Duration,
    frames: u32,
    last_frame: Instant,
    last_report: Instant,
}

impl FrameTimer {
    pub fn new(collector: MetricsCollector, probe: Box<dyn MemoryProbe>, start: Instant) -> Self {
        Self {
            collector,
            probe,
            report_interval: DEFAULT_REPORT_INTERVAL,
            frames: 0,
            last_frame: start,
            last_report: start,
        }
    }

    /// Builder: override the report interval
    pub fn report_interval(mut self, interval: Duration) -> Self {
        self.report_interval = interval;
        self
    }

    /// Count a frame that finished at `now`; returns the recorded sample
    /// when this frame closed a reporting window
    pub fn tick(&mut self, now: Instant) -> Option<MetricsSample> {
        let frame_time = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frames += 1;

        if now.saturating_duration_since(self.last_report) < self.report_interval {
            return None;
        }

        let sample = MetricsSample::new(self.frames as f64, frame_time.as_secs_f64() * 1000.0)
            .memory(self.probe.read());
        self.collector.record(sample.clone());

        tracing::debug!(fps = sample.fps, frame_time_ms = sample.frame_time_ms, "Frame timing");

        self.frames = 0;
        self.last_report = now;
        Some(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::memory::{FixedMemoryProbe, NoMemoryProbe};
    use crate::metrics::sample::MemoryReading;

    #[test]
    fn test_reports_once_per_second() {
        let collector = MetricsCollector::default();
        let start = Instant::now();
        let mut timer = FrameTimer::new(collector.clone(), Box::new(NoMemoryProbe), start);

        let mut reports = Vec::new();
        for i in 1..=120u64 {
            if let Some(sample) = timer.tick(start + Duration::from_millis(i * 20)) {
                reports.push(sample);
            }
        }

        // 120 frames at 20ms = 2.4s, windows close at 1000ms and 2000ms
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].fps, 50.0);
        assert_eq!(reports[1].fps, 50.0);
        assert!((reports[0].frame_time_ms - 20.0).abs() < 1e-9);
        assert_eq!(collector.len(), 2);
    }

    #[test]
    fn test_attaches_memory_reading() {
        let collector = MetricsCollector::default();
        let start = Instant::now();
        let reading = MemoryReading { used: 64, limit: 128 };
        let mut timer = FrameTimer::new(collector, Box::new(FixedMemoryProbe(reading)), start)
            .report_interval(Duration::from_millis(10));

        let sample = timer.tick(start + Duration::from_millis(10)).unwrap();
        assert_eq!(sample.memory_reading(), Some(reading));
    }
}
