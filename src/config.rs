//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::aggregate;
use crate::stream::LiveStreamConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub stream: StreamConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub worker: WorkerConfig,

    #[serde(default)]
    pub metrics: MetricsConfig,

    #[serde(default)]
    pub render: RenderConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Live stream configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StreamConfig {
    #[serde(default = "default_interval")]
    pub interval_ms: u64,

    #[serde(default = "default_max_points")]
    pub max_points: usize,

    #[serde(default = "default_initial_count")]
    pub initial_count: usize,
}

fn default_interval() -> u64 {
    100
}

fn default_max_points() -> usize {
    1000
}

fn default_initial_count() -> usize {
    100
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval(),
            max_points: default_max_points(),
            initial_count: default_initial_count(),
        }
    }
}

impl StreamConfig {
    pub fn live_config(&self) -> LiveStreamConfig {
        LiveStreamConfig {
            interval_ms: self.interval_ms,
            max_points: self.max_points,
            initial_count: self.initial_count,
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Upper bound on `count` for the data endpoint
    #[serde(default = "default_max_count")]
    pub max_count: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_count() -> usize {
    100_000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_count: default_max_count(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Aggregation worker configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerConfig {
    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_channel_capacity() -> usize {
    64
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_request_timeout(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl WorkerConfig {
    pub fn worker_config(&self) -> aggregate::WorkerConfig {
        aggregate::WorkerConfig {
            request_timeout: Duration::from_millis(self.request_timeout_ms),
            channel_capacity: self.channel_capacity,
        }
    }
}

/// Performance metrics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_max_samples")]
    pub max_samples: usize,

    #[serde(default = "default_sample_interval")]
    pub sample_interval_ms: u64,

    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

fn default_max_samples() -> usize {
    1000
}

fn default_sample_interval() -> u64 {
    1000
}

fn default_export_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("pulseboard").join("metrics").to_string_lossy().to_string())
        .unwrap_or_else(|| "./metrics".to_string())
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            max_samples: default_max_samples(),
            sample_interval_ms: default_sample_interval(),
            export_dir: default_export_dir(),
        }
    }
}

/// Chart rendering configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_width")]
    pub width: f64,

    #[serde(default = "default_height")]
    pub height: f64,

    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,
}

fn default_width() -> f64 {
    800.0
}

fn default_height() -> f64 {
    400.0
}

fn default_frame_interval() -> u64 {
    16
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            frame_interval_ms: default_frame_interval(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pulseboard").join("config.toml")),
            Some(PathBuf::from("/etc/pulseboard/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path_opt in config_paths.iter().flatten() {
            if path_opt.exists() {
                match Self::load_with_env(path_opt) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path_opt);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path_opt, e);
                    }
                }
            }
        }

        // Fall back to environment-only config
        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Stream overrides
        override_parsed("PULSEBOARD_STREAM_INTERVAL_MS", &mut self.stream.interval_ms);
        override_parsed("PULSEBOARD_STREAM_MAX_POINTS", &mut self.stream.max_points);

        // API overrides
        if let Ok(host) = std::env::var("PULSEBOARD_API_HOST") {
            self.api.host = host;
        }
        override_parsed("PULSEBOARD_API_PORT", &mut self.api.port);
        override_parsed("PULSEBOARD_API_MAX_COUNT", &mut self.api.max_count);

        // Worker overrides
        override_parsed("PULSEBOARD_WORKER_TIMEOUT_MS", &mut self.worker.request_timeout_ms);

        // Metrics overrides
        if let Ok(dir) = std::env::var("PULSEBOARD_METRICS_EXPORT_DIR") {
            self.metrics.export_dir = dir;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("PULSEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("PULSEBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn override_parsed<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(value) = std::env::var(var) {
        match value.parse() {
            Ok(parsed) => *target = parsed,
            Err(_) => tracing::warn!("Ignoring invalid value for {}: {:?}", var, value),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pulseboard Configuration
#
# Environment variables override these settings:
# - PULSEBOARD_STREAM_INTERVAL_MS
# - PULSEBOARD_STREAM_MAX_POINTS
# - PULSEBOARD_API_HOST
# - PULSEBOARD_API_PORT
# - PULSEBOARD_API_MAX_COUNT
# - PULSEBOARD_WORKER_TIMEOUT_MS
# - PULSEBOARD_METRICS_EXPORT_DIR
# - PULSEBOARD_LOG_LEVEL
# - PULSEBOARD_LOG_FORMAT

[stream]
# Tick interval of the live fps/memory/latency streams (ms)
interval_ms = 100

# Samples kept per live stream
max_points = 1000

# Samples generated at startup so charts are not empty
initial_count = 100

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 3000

# Largest `count` accepted by GET /api/data
max_count = 100000

[worker]
# How long a caller waits for the aggregation worker (ms)
request_timeout_ms = 5000

# Queued requests before callers wait
channel_capacity = 64

[metrics]
# Rolling performance log size
max_samples = 1000

# How often the frame timer records a sample (ms)
sample_interval_ms = 1000

# Where exported performance-metrics-<ms>.json files go
export_dir = "./metrics"

[render]
# Default chart size (px)
width = 800.0
height = 400.0

# Minimum time between redraws (ms)
frame_interval_ms = 16

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
