//! Pulseboard CLI
//!
//! Command-line client for a running Pulseboard server:
//! - Fetch synthetic data batches
//! - Aggregate or normalize samples through the worker
//! - Render charts to SVG
//! - Inspect and export performance metrics

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use pulseboard::aggregate::{AggregateRequest, AggregationPeriod, NormalizeRequest, WorkerRequest};
use pulseboard::stream::Sample;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pulseboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client for the Pulseboard telemetry dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:3000", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch a batch of fps, memory and latency samples
    Fetch {
        /// Samples per series
        #[arg(short, long)]
        count: Option<usize>,
        /// Start time in epoch millis (default: one hour ago)
        #[arg(short, long)]
        start_time: Option<i64>,
    },

    /// Bucket a fetched series by period
    Aggregate {
        /// Series to aggregate (fps, memory, latency)
        #[arg(default_value = "fps")]
        series: String,
        /// Period (1min, 5min, 1hour)
        #[arg(short, long, default_value = "1min")]
        period: String,
        /// Samples to fetch
        #[arg(short, long, default_value = "1000")]
        count: usize,
        /// Normalize to [0, 1] instead of bucketing
        #[arg(long)]
        normalize: bool,
    },

    /// Render a live series to an SVG file
    Render {
        /// Series to draw (fps, memory, latency)
        #[arg(default_value = "fps")]
        series: String,
        /// Chart kind (line, bar, scatter, heatmap)
        #[arg(short, long, default_value = "line")]
        kind: String,
        #[arg(long, default_value = "800")]
        width: u32,
        #[arg(long, default_value = "400")]
        height: u32,
        /// Plot bucket averages for this period
        #[arg(short, long)]
        period: Option<String>,
        /// Output file
        #[arg(short, long, default_value = "chart.svg")]
        output: PathBuf,
    },

    /// Show performance statistics
    Stats,

    /// Download the performance log
    Export {
        /// Output file (default: server-suggested name)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Clear the performance log
    Clear,

    /// Show server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Fetch { count, start_time } => {
            let mut query: Vec<(&str, String)> = Vec::new();
            if let Some(count) = count {
                query.push(("count", count.to_string()));
            }
            if let Some(start) = start_time {
                query.push(("startTime", start.to_string()));
            }

            let data: serde_json::Value = get_json(
                client
                    .get(format!("{}/api/data", cli.api_url))
                    .query(&query),
            )
            .await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&data)?),
                _ => {
                    println!("{:<10} {:>8} {:>10} {:>10} {:>10}", "Series", "Count", "Min", "Max", "Avg");
                    println!("{}", "-".repeat(52));
                    for series in ["fps", "memory", "latency"] {
                        let samples: Vec<Sample> = serde_json::from_value(data[series].clone())?;
                        print_summary_row(series, &samples);
                    }
                }
            }
        }

        Commands::Aggregate {
            series,
            period,
            count,
            normalize,
        } => {
            let data: serde_json::Value = get_json(
                client
                    .get(format!("{}/api/data", cli.api_url))
                    .query(&[("count", count.to_string())]),
            )
            .await?;

            let points: Vec<Sample> = serde_json::from_value(data[series.as_str()].clone())
                .with_context(|| format!("unknown series: {}", series))?;

            let request = if normalize {
                WorkerRequest::Normalize(NormalizeRequest { points })
            } else {
                let Some(period) = AggregationPeriod::from_label(&period) else {
                    bail!("Invalid period: {}. Use: 1min, 5min, 1hour", period);
                };
                WorkerRequest::Aggregate(AggregateRequest { points, period })
            };

            let response: serde_json::Value = get_json(
                client
                    .post(format!("{}/api/aggregate", cli.api_url))
                    .json(&request),
            )
            .await?;

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&response)?),
                _ => print_buckets(&response),
            }
        }

        Commands::Render {
            series,
            kind,
            width,
            height,
            period,
            output,
        } => {
            let mut query = vec![
                ("series", series),
                ("kind", kind),
                ("width", width.to_string()),
                ("height", height.to_string()),
            ];
            if let Some(period) = period {
                query.push(("period", period));
            }

            let response = client
                .get(format!("{}/api/chart", cli.api_url))
                .query(&query)
                .send()
                .await?;
            let svg = read_success(response).await?;

            std::fs::write(&output, svg)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!("Chart written to {}", output.display());
        }

        Commands::Stats => {
            let stats: serde_json::Value =
                get_json(client.get(format!("{}/api/metrics/stats", cli.api_url))).await?;

            if stats.is_null() {
                println!("No performance samples recorded yet.");
            } else if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                print_stats(&stats);
            }
        }

        Commands::Export { output } => {
            let response = client
                .get(format!("{}/api/metrics/export", cli.api_url))
                .send()
                .await?;

            let suggested = response
                .headers()
                .get(reqwest::header::CONTENT_DISPOSITION)
                .and_then(|v| v.to_str().ok())
                .and_then(attachment_name);
            let body = read_success(response).await?;

            let path = output
                .or_else(|| suggested.map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("performance-metrics.json"));
            std::fs::write(&path, body)
                .with_context(|| format!("failed to write {}", path.display()))?;
            println!("Exported to {}", path.display());
        }

        Commands::Clear => {
            let result: serde_json::Value =
                get_json(client.delete(format!("{}/api/metrics", cli.api_url))).await?;
            println!("Cleared {} samples", result["cleared"].as_u64().unwrap_or(0));
        }

        Commands::Status => {
            let response = client.get(format!("{}/health", cli.api_url)).send().await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Pulseboard v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!("API Status: {}", health["status"].as_str().unwrap_or("unknown"));
                    println!("Worker: {}", health["worker"].as_str().unwrap_or("unknown"));
                    println!("Streams running: {}", health["streams_running"].as_u64().unwrap_or(0));
                    println!("WebSocket clients: {}", health["ws_connections"].as_u64().unwrap_or(0));

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => bail!("API returned error: {}", resp.status()),
                Err(e) => {
                    eprintln!("Cannot connect to Pulseboard API at {}", cli.api_url);
                    eprintln!();
                    eprintln!("Make sure the server is running:");
                    eprintln!("  cargo run --bin pulseboard");
                    return Err(e.into());
                }
            }
        }

        Commands::Config { output } => {
            let config = pulseboard::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {}", path.display());
                }
                None => print!("{}", config),
            }
        }
    }

    Ok(())
}

/// Send a request and decode a JSON body. Worker `ERROR` replies carry a
/// JSON body too, so the body is surfaced in the error.
async fn get_json(request: reqwest::RequestBuilder) -> anyhow::Result<serde_json::Value> {
    let response = request.send().await?;
    let body = read_success(response).await?;
    serde_json::from_str(&body).context("invalid JSON from server")
}

async fn read_success(response: reqwest::Response) -> anyhow::Result<String> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        bail!("Request failed ({}): {}", status, text);
    }
    Ok(text)
}

/// `attachment; filename="x.json"` → `x.json`
fn attachment_name(disposition: &str) -> Option<String> {
    let (_, rest) = disposition.split_once("filename=")?;
    Some(rest.trim_matches('"').to_string())
}

fn print_summary_row(series: &str, samples: &[Sample]) {
    let stats = pulseboard::aggregate::calculate_stats(samples);
    println!(
        "{:<10} {:>8} {:>10.1} {:>10.1} {:>10.1}",
        series,
        samples.len(),
        stats.min,
        stats.max,
        stats.avg
    );
}

fn print_buckets(response: &serde_json::Value) {
    let rows = match response["data"].as_array() {
        Some(rows) if !rows.is_empty() => rows,
        _ => {
            println!("No data");
            return;
        }
    };

    if response["type"] == "NORMALIZE_RESULT" {
        println!("{:<22} {:>8}", "Time", "Value");
        println!("{}", "-".repeat(31));
        for row in rows {
            println!(
                "{:<22} {:>8.3}",
                format_time(row["timestamp"].as_i64().unwrap_or(0)),
                row["value"].as_f64().unwrap_or(0.0)
            );
        }
        return;
    }

    println!("{:<22} {:>8} {:>8} {:>8} {:>6}", "Bucket", "Min", "Max", "Avg", "Count");
    println!("{}", "-".repeat(56));
    for row in rows {
        println!(
            "{:<22} {:>8.1} {:>8.1} {:>8.1} {:>6}",
            format_time(row["timestamp"].as_i64().unwrap_or(0)),
            row["min"].as_f64().unwrap_or(0.0),
            row["max"].as_f64().unwrap_or(0.0),
            row["avg"].as_f64().unwrap_or(0.0),
            row["count"].as_u64().unwrap_or(0)
        );
    }
}

fn print_stats(stats: &serde_json::Value) {
    println!("Samples: {}", stats["sampleCount"].as_u64().unwrap_or(0));
    println!();
    println!("{:<12} {:>8} {:>8} {:>8} {:>8} {:>8}", "", "Avg", "p50", "p95", "p99", "Max");
    println!("{}", "-".repeat(58));
    for (label, key) in [("FPS", "fps"), ("Frame (ms)", "frameTime")] {
        let d = &stats[key];
        println!(
            "{:<12} {:>8.1} {:>8.1} {:>8.1} {:>8.1} {:>8.1}",
            label,
            d["avg"].as_f64().unwrap_or(0.0),
            d["p50"].as_f64().unwrap_or(0.0),
            d["p95"].as_f64().unwrap_or(0.0),
            d["p99"].as_f64().unwrap_or(0.0),
            d["max"].as_f64().unwrap_or(0.0)
        );
    }

    if let Some(memory) = stats.get("memory") {
        let mb = |v: &serde_json::Value| v.as_u64().unwrap_or(0) as f64 / (1024.0 * 1024.0);
        println!();
        println!("Memory peak: {:.1} MB of {:.1} MB", mb(&memory["used"]), mb(&memory["limit"]));
    }
}

fn format_time(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp_millis(timestamp)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
