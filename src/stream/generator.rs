//! Synthetic telemetry generation
//!
//! Two flavours:
//!
//! - [`SampleGenerator`]: a restartable, lazily-evaluated sample sequence
//!   driven as an explicit `Idle → Running → Stopped` state machine. Used by
//!   live streams, one sample per timer tick.
//! - [`generate_series`] / [`generate_multi_series`]: batch generation of a
//!   whole series spread over a time range. Used to seed buffers and to
//!   answer the data endpoint.
//!
//! # Value model
//!
//! ```text
//! value = base + uniform(±variance/2) + sin(i / 100 · 2π) · variance · 0.3
//! ```
//!
//! clamped to the profile's range and rounded to one decimal place.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use std::f64::consts::PI;

use super::types::{round_tenth, Sample, SeriesKind, SeriesProfile};

/// Period of the sine trend, in ticks
const TREND_PERIOD_TICKS: f64 = 100.0;

/// Trend amplitude as a fraction of the variance
const TREND_AMPLITUDE: f64 = 0.3;

/// Upper bound of the trend amplitude for batch-generated series
const BATCH_TREND_AMPLITUDE: f64 = 2.0;

/// Streaming generator parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorConfig {
    /// Spacing between consecutive timestamps
    pub interval_ms: u64,
    /// Number of samples before exhaustion (`None` = infinite)
    pub count: Option<u64>,
    /// Base value, variance and clamp range
    pub profile: SeriesProfile,
}

impl GeneratorConfig {
    pub fn new(interval_ms: u64, base_value: f64, variance: f64) -> Self {
        Self {
            interval_ms,
            count: None,
            profile: SeriesProfile::new(base_value, variance),
        }
    }

    /// Generator for one of the dashboard series
    pub fn for_series(series: SeriesKind, interval_ms: u64) -> Self {
        Self {
            interval_ms,
            count: None,
            profile: series.profile(),
        }
    }

    /// Builder: finite sequence of `count` samples
    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Builder: clamp values to `[min, max]`
    pub fn clamp(mut self, min: f64, max: f64) -> Self {
        self.profile = self.profile.clamp(min, max);
        self
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(100, 60.0, 5.0)
    }
}

/// Lifecycle state of a [`SampleGenerator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorState {
    /// Created, not yet started
    Idle,
    /// Emitting samples
    Running,
    /// Stopped explicitly or exhausted
    Stopped,
}

/// Sine trend contribution at tick `index`
pub fn sine_trend(index: u64, variance: f64) -> f64 {
    (index as f64 / TREND_PERIOD_TICKS * PI * 2.0).sin() * (variance * TREND_AMPLITUDE)
}

/// Restartable synthetic sample sequence
pub struct SampleGenerator {
    config: GeneratorConfig,
    state: GeneratorState,
    base_time: i64,
    emitted: u64,
    rng: StdRng,
}

impl SampleGenerator {
    /// Create an idle generator seeded from OS entropy
    pub fn new(config: GeneratorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create an idle generator with a fixed seed (reproducible noise)
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GeneratorConfig, rng: StdRng) -> Self {
        Self {
            config,
            state: GeneratorState::Idle,
            base_time: 0,
            emitted: 0,
            rng,
        }
    }

    /// Create a generator that is already running from `base_time`
    pub fn started(config: GeneratorConfig, base_time: i64) -> Self {
        let mut generator = Self::new(config);
        generator.start(base_time);
        generator
    }

    pub fn state(&self) -> GeneratorState {
        self.state
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn base_time(&self) -> i64 {
        self.base_time
    }

    /// Samples emitted since the last (re)start
    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Idle → Running. Has no effect unless the generator is idle.
    pub fn start(&mut self, base_time: i64) {
        if self.state == GeneratorState::Idle {
            self.base_time = base_time;
            self.emitted = 0;
            self.state = GeneratorState::Running;
        }
    }

    /// Any state → Stopped
    pub fn stop(&mut self) {
        self.state = GeneratorState::Stopped;
    }

    /// Any state → Running with a fresh base time and tick index zero.
    ///
    /// Samples handed out before the restart are owned by the caller and are
    /// not affected.
    pub fn restart(&mut self, base_time: i64) {
        self.base_time = base_time;
        self.emitted = 0;
        self.state = GeneratorState::Running;
    }

    /// Whether a finite sequence has produced all its samples
    pub fn is_exhausted(&self) -> bool {
        self.config.count.map_or(false, |count| self.emitted >= count)
    }

    /// Produce the next sample, or `None` if not running or exhausted.
    pub fn next_sample(&mut self) -> Option<Sample> {
        if self.state != GeneratorState::Running {
            return None;
        }
        if self.is_exhausted() {
            self.state = GeneratorState::Stopped;
            return None;
        }

        let index = self.emitted;
        let profile = self.config.profile;
        let noise = (self.rng.gen::<f64>() - 0.5) * profile.variance;
        let value = profile.base_value + noise + sine_trend(index, profile.variance);
        let offset =
            i64::try_from(index.saturating_mul(self.config.interval_ms)).unwrap_or(i64::MAX);
        let timestamp = self.base_time.saturating_add(offset);

        self.emitted += 1;
        if self.is_exhausted() {
            self.state = GeneratorState::Stopped;
        }

        Some(Sample::new(timestamp, round_tenth(profile.apply_range(value))))
    }
}

impl Iterator for SampleGenerator {
    type Item = Sample;

    fn next(&mut self) -> Option<Sample> {
        self.next_sample()
    }
}

/// Three telemetry series sharing one time axis
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MultiSeries {
    pub fps: Vec<Sample>,
    pub memory: Vec<Sample>,
    pub latency: Vec<Sample>,
}

impl MultiSeries {
    pub fn get(&self, series: SeriesKind) -> &[Sample] {
        match series {
            SeriesKind::Fps => &self.fps,
            SeriesKind::Memory => &self.memory,
            SeriesKind::Latency => &self.latency,
        }
    }
}

/// Generate `count` samples spread evenly over `[start, end)`.
///
/// The trend is one slow sine period across the whole series, with an
/// amplitude of at most the profile's variance. Timestamps are
/// non-decreasing; if `end <= start` every sample lands on `start`.
pub fn generate_series(
    count: usize,
    start: i64,
    end: i64,
    profile: SeriesProfile,
    rng: &mut impl Rng,
) -> Vec<Sample> {
    if count == 0 {
        return Vec::new();
    }

    let span = end.saturating_sub(start).max(0) as f64;
    let interval = span / count as f64;
    let amplitude = BATCH_TREND_AMPLITUDE.min(profile.variance);

    (0..count)
        .map(|i| {
            let timestamp = start.saturating_add((i as f64 * interval) as i64);
            let noise = (rng.gen::<f64>() - 0.5) * profile.variance;
            let trend = (i as f64 / count as f64 * PI * 2.0).sin() * amplitude;
            let value = profile.apply_range(profile.base_value + noise + trend);
            Sample::new(timestamp, round_tenth(value))
        })
        .collect()
}

/// Generate the fps, memory and latency series over `[start, end)`
pub fn generate_multi_series(count: usize, start: i64, end: i64) -> MultiSeries {
    let mut rng = StdRng::from_entropy();
    MultiSeries {
        fps: generate_series(count, start, end, SeriesKind::Fps.profile(), &mut rng),
        memory: generate_series(count, start, end, SeriesKind::Memory.profile(), &mut rng),
        latency: generate_series(count, start, end, SeriesKind::Latency.profile(), &mut rng),
    }
}
