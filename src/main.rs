//! Pulseboard Server
//!
//! Run with: cargo run --bin pulseboard
//!
//! # Configuration
//!
//! Settings are read from the first config file found at
//! `~/.config/pulseboard/config.toml`, `/etc/pulseboard/config.toml` or
//! `./config.toml`, or from the path in `PULSEBOARD_CONFIG`. `PULSEBOARD_*`
//! environment variables override file values, and `RUST_LOG` overrides
//! the configured log level.

use anyhow::Context;
use pulseboard::aggregate::AggregationWorker;
use pulseboard::api::{serve, AppState};
use pulseboard::config::{Config, LoggingConfig};
use pulseboard::metrics::{FrameTimer, MetricsCollector, SystemMemoryProbe};
use pulseboard::render::{ChartKind, ChartRenderer, SvgSurface};
use pulseboard::stream::{SeriesKind, StreamSet};
use pulseboard::websocket::forward_samples;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.logging);

    tracing::info!("Starting Pulseboard v{}", env!("CARGO_PKG_VERSION"));

    let worker = AggregationWorker::spawn(config.worker.worker_config())
        .context("failed to start aggregation worker")?;
    let worker = Arc::new(worker);

    let streams = Arc::new(StreamSet::new(config.stream.live_config()));
    streams.start_all();
    tracing::info!(
        interval_ms = config.stream.interval_ms,
        max_points = config.stream.max_points,
        "Live streams started"
    );

    let metrics = MetricsCollector::new(config.metrics.max_samples);

    let state = AppState::new(
        Arc::clone(&streams),
        worker,
        metrics.clone(),
        config.api.clone(),
    )
    .render_config(config.render.clone())
    .export_dir(config.metrics.export_dir.clone());

    let relays: Vec<JoinHandle<()>> = streams
        .iter()
        .map(|stream| forward_samples(Arc::clone(&state.ws_hub), stream.series(), stream.subscribe()))
        .collect();

    let render_loop = spawn_render_loop(Arc::clone(&streams), metrics, &config);

    let result = serve(state).await;

    render_loop.abort();
    streams.stop_all().await;
    for relay in relays {
        relay.abort();
    }

    tracing::info!("Pulseboard shutdown complete");
    result.context("API server failed")
}

fn load_config() -> anyhow::Result<Config> {
    match std::env::var_os("PULSEBOARD_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            Config::load_with_env(&path)
                .with_context(|| format!("failed to load config from {}", path.display()))
        }
        None => Ok(Config::load_default()),
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("pulseboard={},tower_http=info", logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Headless redraw loop over the fps stream. Every drawn frame is counted
/// by a [`FrameTimer`] feeding the shared metrics log.
fn spawn_render_loop(
    streams: Arc<StreamSet>,
    metrics: MetricsCollector,
    config: &Config,
) -> JoinHandle<()> {
    let frame_interval = Duration::from_millis(config.render.frame_interval_ms.max(1));
    let report_interval = Duration::from_millis(config.metrics.sample_interval_ms.max(1));
    let (width, height) = (config.render.width, config.render.height);

    tokio::spawn(async move {
        let Some(stream) = streams.get(SeriesKind::Fps) else {
            tracing::warn!("No fps stream, render loop not started");
            return;
        };

        let mut renderer = ChartRenderer::new(ChartKind::Line, width, height)
            .with_surface(SvgSurface::new(width, height))
            .frame_interval(frame_interval);
        let mut timer = FrameTimer::new(metrics, Box::new(SystemMemoryProbe::new()), Instant::now())
            .report_interval(report_interval);

        let mut ticker = tokio::time::interval(frame_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let before = renderer.frames_drawn();
            renderer.set_data(stream.snapshot().await);
            renderer.on_frame(Instant::now());

            if renderer.frames_drawn() > before {
                if let Some(sample) = timer.tick(Instant::now()) {
                    tracing::trace!(fps = sample.fps, "Render loop report");
                }
            }
        }
    })
}
