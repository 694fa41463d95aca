//! Live, timer-driven streams
//!
//! A [`LiveStream`] owns a bounded buffer and a tokio task that pulls one
//! sample from a [`SampleGenerator`] every `interval_ms` and appends it.
//! Appended samples are also published on a broadcast channel so real-time
//! subscribers can follow along.
//!
//! Stopping is deterministic: [`LiveStream::stop`] takes the buffer's write
//! lock before flipping the run flag, so once it returns no tick can append.

use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::buffer::BoundedBuffer;
use super::error::{StreamError, StreamResult};
use super::generator::{generate_series, GeneratorConfig, SampleGenerator};
use super::types::{Sample, SeriesKind};

/// Capacity of the per-stream broadcast channel
const EVENT_CAPACITY: usize = 256;

/// Live stream parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveStreamConfig {
    /// Timer period and timestamp spacing
    pub interval_ms: u64,
    /// Buffer capacity
    pub max_points: usize,
    /// Samples generated up front so charts are not empty
    pub initial_count: usize,
}

impl Default for LiveStreamConfig {
    fn default() -> Self {
        Self {
            interval_ms: 100,
            max_points: 1000,
            initial_count: 100,
        }
    }
}

/// Handle on a running timer task
struct RunHandle {
    running: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

/// A bounded, continuously-appended telemetry series
pub struct LiveStream {
    series: SeriesKind,
    config: LiveStreamConfig,
    generator: GeneratorConfig,
    buffer: Arc<RwLock<BoundedBuffer>>,
    events: broadcast::Sender<Sample>,
    run: Mutex<Option<RunHandle>>,
}

impl LiveStream {
    /// Create a stopped stream for one of the dashboard series, seeded with
    /// `initial_count` samples ending now
    pub fn new(series: SeriesKind, config: LiveStreamConfig) -> Self {
        let generator = GeneratorConfig::for_series(series, config.interval_ms)
            .count(config.max_points as u64);
        Self::with_generator(series, config, generator)
    }

    /// Create a stopped stream driven by a custom generator
    pub fn with_generator(
        series: SeriesKind,
        config: LiveStreamConfig,
        generator: GeneratorConfig,
    ) -> Self {
        let now = Utc::now().timestamp_millis();
        let seed_span = (config.initial_count as u64).saturating_mul(config.interval_ms);
        let seed_span = i64::try_from(seed_span).unwrap_or(i64::MAX);
        let seed = generate_series(
            config.initial_count,
            now.saturating_sub(seed_span),
            now,
            generator.profile,
            &mut rand::thread_rng(),
        );

        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Self {
            series,
            config,
            generator,
            buffer: Arc::new(RwLock::new(BoundedBuffer::with_samples(config.max_points, seed))),
            events,
            run: Mutex::new(None),
        }
    }

    pub fn series(&self) -> SeriesKind {
        self.series
    }

    pub fn config(&self) -> &LiveStreamConfig {
        &self.config
    }

    /// Whether the timer task is active
    pub fn is_running(&self) -> bool {
        self.lock_run()
            .as_ref()
            .map(|handle| handle.running.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Start the timer task. Must be called from within a tokio runtime.
    pub fn start(&self) -> StreamResult<()> {
        let mut run = self.lock_run();
        if run.as_ref().map_or(false, |h| h.running.load(Ordering::SeqCst)) {
            return Err(StreamError::AlreadyRunning(self.series));
        }

        let running = Arc::new(AtomicBool::new(true));
        let task = tokio::spawn(tick_loop(
            self.series,
            self.config.interval_ms,
            self.generator,
            Arc::clone(&self.buffer),
            self.events.clone(),
            Arc::clone(&running),
        ));

        *run = Some(RunHandle { running, task });
        tracing::info!(
            series = %self.series,
            interval_ms = self.config.interval_ms,
            max_points = self.config.max_points,
            "Live stream started"
        );
        Ok(())
    }

    /// Stop the timer task.
    ///
    /// When this returns the buffer will not be appended to again until the
    /// next `start`.
    pub async fn stop(&self) {
        let _guard = self.buffer.write().await;
        let handle = self.lock_run().take();
        if let Some(handle) = handle {
            handle.running.store(false, Ordering::SeqCst);
            handle.task.abort();
            tracing::info!(series = %self.series, "Live stream stopped");
        }
    }

    /// Copy of the current buffer contents, oldest first
    pub async fn snapshot(&self) -> Vec<Sample> {
        self.buffer.read().await.snapshot()
    }

    pub async fn len(&self) -> usize {
        self.buffer.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.buffer.read().await.is_empty()
    }

    pub async fn latest(&self) -> Option<Sample> {
        self.buffer.read().await.latest().cloned()
    }

    /// Drop all buffered samples
    pub async fn clear(&self) {
        self.buffer.write().await.clear();
    }

    /// Receive every sample appended from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Sample> {
        self.events.subscribe()
    }

    fn lock_run(&self) -> std::sync::MutexGuard<'_, Option<RunHandle>> {
        self.run.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for LiveStream {
    fn drop(&mut self) {
        if let Some(handle) = self.lock_run().take() {
            handle.running.store(false, Ordering::SeqCst);
            handle.task.abort();
        }
    }
}

async fn tick_loop(
    series: SeriesKind,
    interval_ms: u64,
    generator_config: GeneratorConfig,
    buffer: Arc<RwLock<BoundedBuffer>>,
    events: broadcast::Sender<Sample>,
    running: Arc<AtomicBool>,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(interval_ms.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    // The first tick completes immediately; appends start one interval in.
    ticker.tick().await;

    let mut generator = SampleGenerator::new(generator_config);
    let start_at = buffer
        .read()
        .await
        .latest()
        .map(|s| s.timestamp + interval_ms as i64)
        .unwrap_or(0)
        .max(Utc::now().timestamp_millis());
    generator.start(start_at);

    loop {
        ticker.tick().await;

        let sample = match generator.next_sample() {
            Some(sample) => sample,
            None => {
                let last = buffer.read().await.latest().map(|s| s.timestamp);
                let base = next_base_time(last, interval_ms);
                tracing::debug!(series = %series, base_time = base, "Generator exhausted, restarting");
                generator.restart(base);
                match generator.next_sample() {
                    Some(sample) => sample,
                    None => continue,
                }
            }
        };

        {
            let mut buffer = buffer.write().await;
            if !running.load(Ordering::SeqCst) {
                break;
            }
            buffer.push(sample.clone());
        }

        // No subscribers is fine
        let _ = events.send(sample);
    }
}

/// Base time for a restarted generator: now, but never before the last
/// buffered sample
fn next_base_time(last_timestamp: Option<i64>, interval_ms: u64) -> i64 {
    let now = Utc::now().timestamp_millis();
    match last_timestamp {
        Some(last) => now.max(last + interval_ms as i64),
        None => now,
    }
}

/// The fps, memory and latency streams of one dashboard
pub struct StreamSet {
    streams: BTreeMap<SeriesKind, LiveStream>,
}

impl StreamSet {
    /// Create one stopped stream per series
    pub fn new(config: LiveStreamConfig) -> Self {
        let streams = SeriesKind::all()
            .iter()
            .map(|&series| (series, LiveStream::new(series, config)))
            .collect();
        Self { streams }
    }

    pub fn get(&self, series: SeriesKind) -> Option<&LiveStream> {
        self.streams.get(&series)
    }

    /// Look up a stream by name
    pub fn by_name(&self, name: &str) -> StreamResult<&LiveStream> {
        SeriesKind::parse(name)
            .and_then(|series| self.streams.get(&series))
            .ok_or_else(|| StreamError::UnknownSeries(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &LiveStream> {
        self.streams.values()
    }

    /// Start every stream that is not already running
    pub fn start_all(&self) {
        for stream in self.streams.values() {
            if let Err(e) = stream.start() {
                tracing::debug!(error = %e, "Stream not started");
            }
        }
    }

    pub async fn stop_all(&self) {
        for stream in self.streams.values() {
            stream.stop().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_config(max_points: usize, initial_count: usize) -> LiveStreamConfig {
        LiveStreamConfig {
            interval_ms: 5,
            max_points,
            initial_count,
        }
    }

    #[tokio::test]
    async fn test_seeded_with_initial_samples() {
        let stream = LiveStream::new(SeriesKind::Fps, fast_config(50, 20));
        let samples = stream.snapshot().await;
        assert_eq!(samples.len(), 20);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert!(!stream.is_running());
    }

    #[tokio::test]
    async fn test_seed_larger_than_capacity_is_trimmed() {
        let stream = LiveStream::new(SeriesKind::Latency, fast_config(10, 40));
        assert_eq!(stream.len().await, 10);
    }

    #[tokio::test]
    async fn test_stream_appends_and_caps() {
        let stream = LiveStream::new(SeriesKind::Fps, fast_config(8, 0));
        stream.start().unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;
        stream.stop().await;

        let samples = stream.snapshot().await;
        assert_eq!(samples.len(), 8);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_no_appends_after_stop() {
        let stream = LiveStream::new(SeriesKind::Memory, fast_config(1000, 0));
        stream.start().unwrap();
        tokio::time::sleep(Duration::from_millis(40)).await;
        stream.stop().await;

        let stopped_len = stream.len().await;
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(stream.len().await, stopped_len);
        assert!(!stream.is_running());
    }

    #[tokio::test]
    async fn test_double_start_rejected() {
        let stream = LiveStream::new(SeriesKind::Fps, fast_config(10, 0));
        stream.start().unwrap();
        assert_eq!(
            stream.start(),
            Err(StreamError::AlreadyRunning(SeriesKind::Fps))
        );
        stream.stop().await;
        assert!(stream.start().is_ok());
        stream.stop().await;
    }

    #[tokio::test]
    async fn test_exhausted_generator_restarts() {
        let generator = GeneratorConfig::new(5, 60.0, 1.0).count(3);
        let stream = LiveStream::with_generator(SeriesKind::Fps, fast_config(100, 0), generator);
        stream.start().unwrap();
        tokio::time::sleep(Duration::from_millis(100)).await;
        stream.stop().await;

        let samples = stream.snapshot().await;
        assert!(samples.len() > 3);
        assert!(samples.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    }

    #[tokio::test]
    async fn test_subscribers_receive_samples() {
        let stream = LiveStream::new(SeriesKind::Latency, fast_config(10, 0));
        let mut rx = stream.subscribe();
        stream.start().unwrap();

        let sample = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("sample within a second")
            .unwrap();
        stream.stop().await;

        assert!((50.0..=150.0).contains(&sample.value));
    }

    #[tokio::test]
    async fn test_clear() {
        let stream = LiveStream::new(SeriesKind::Fps, fast_config(10, 5));
        stream.clear().await;
        assert!(stream.is_empty().await);
    }

    #[tokio::test]
    async fn test_stream_set_lookup() {
        let set = StreamSet::new(fast_config(10, 2));
        assert!(set.by_name("fps").is_ok());
        assert_eq!(
            set.by_name("gpu").err(),
            Some(StreamError::UnknownSeries("gpu".to_string()))
        );
        assert_eq!(set.iter().count(), 3);
    }
}
