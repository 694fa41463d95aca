//! Off-thread aggregation worker
//!
//! Aggregation over large series runs on a dedicated OS thread so it never
//! stalls the async runtime. Callers talk to it through an
//! [`AggregationWorker`] handle: each request is queued on a bounded FIFO
//! channel and answered exactly once over a oneshot channel.
//!
//! # Wire format
//!
//! ```text
//! {"type":"AGGREGATE","data":{"points":[...],"period":"1min"}}
//!   → {"type":"AGGREGATE_RESULT","data":[bucket, ...]}
//! {"type":"NORMALIZE","data":{"points":[...]}}
//!   → {"type":"NORMALIZE_RESULT","data":[sample, ...]}
//! anything else
//!   → {"type":"ERROR","error":"..."}
//! ```

use serde::{Deserialize, Serialize};
use std::thread::JoinHandle;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use super::bucket::{aggregate, normalize, AggregateBucket};
use super::error::{AggregateError, AggregateResult};
use super::period::{lenient_period, AggregationPeriod};
use crate::stream::Sample;

/// Payload of an `AGGREGATE` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateRequest {
    pub points: Vec<Sample>,
    #[serde(default, deserialize_with = "lenient_period")]
    pub period: AggregationPeriod,
}

/// Payload of a `NORMALIZE` request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NormalizeRequest {
    pub points: Vec<Sample>,
}

/// Messages accepted by the worker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum WorkerRequest {
    #[serde(rename = "AGGREGATE")]
    Aggregate(AggregateRequest),
    #[serde(rename = "NORMALIZE")]
    Normalize(NormalizeRequest),
}

/// Messages produced by the worker
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WorkerResponse {
    #[serde(rename = "AGGREGATE_RESULT")]
    AggregateResult { data: Vec<AggregateBucket> },
    #[serde(rename = "NORMALIZE_RESULT")]
    NormalizeResult { data: Vec<Sample> },
    #[serde(rename = "ERROR")]
    Error { error: String },
}

impl WorkerResponse {
    pub fn error(message: impl Into<String>) -> Self {
        WorkerResponse::Error {
            error: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, WorkerResponse::Error { .. })
    }
}

/// Answer a typed request
pub fn process_request(request: WorkerRequest) -> WorkerResponse {
    match request {
        WorkerRequest::Aggregate(req) => WorkerResponse::AggregateResult {
            data: aggregate(&req.points, req.period),
        },
        WorkerRequest::Normalize(req) => WorkerResponse::NormalizeResult {
            data: normalize(&req.points),
        },
    }
}

/// Answer a raw JSON message.
///
/// Never fails: malformed input and unknown message types come back as
/// `ERROR` responses.
pub fn process_message(raw: &str) -> WorkerResponse {
    let value: serde_json::Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(e) => return WorkerResponse::error(e.to_string()),
    };

    let known = matches!(
        value.get("type").and_then(serde_json::Value::as_str),
        Some("AGGREGATE") | Some("NORMALIZE")
    );
    if !known {
        return WorkerResponse::error("Unknown message type");
    }

    match serde_json::from_value::<WorkerRequest>(value) {
        Ok(request) => process_request(request),
        Err(e) => WorkerResponse::error(e.to_string()),
    }
}

/// Worker settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkerConfig {
    /// How long a caller waits for one response
    pub request_timeout: Duration,
    /// Maximum number of queued requests
    pub channel_capacity: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_millis(5000),
            channel_capacity: 64,
        }
    }
}

enum Job {
    Request(WorkerRequest, oneshot::Sender<WorkerResponse>),
    Raw(String, oneshot::Sender<WorkerResponse>),
}

/// Owned handle on the aggregation thread.
///
/// Dropping the handle (or calling [`shutdown`](Self::shutdown)) closes the
/// request channel and joins the thread.
pub struct AggregationWorker {
    sender: Option<mpsc::Sender<Job>>,
    thread: Option<JoinHandle<()>>,
    config: WorkerConfig,
}

impl AggregationWorker {
    /// Start the worker thread
    pub fn spawn(config: WorkerConfig) -> AggregateResult<Self> {
        let (sender, mut receiver) = mpsc::channel::<Job>(config.channel_capacity.max(1));

        let thread = std::thread::Builder::new()
            .name("aggregation-worker".to_string())
            .spawn(move || {
                tracing::debug!("Aggregation worker started");
                while let Some(job) = receiver.blocking_recv() {
                    let (response, reply) = match job {
                        Job::Request(request, reply) => (process_request(request), reply),
                        Job::Raw(raw, reply) => (process_message(&raw), reply),
                    };
                    // Caller may have timed out; late results are discarded
                    if reply.send(response).is_err() {
                        tracing::debug!("Dropping result for abandoned request");
                    }
                }
                tracing::debug!("Aggregation worker stopped");
            })?;

        tracing::info!(
            timeout_ms = config.request_timeout.as_millis() as u64,
            capacity = config.channel_capacity,
            "Aggregation worker spawned"
        );

        Ok(Self {
            sender: Some(sender),
            thread: Some(thread),
            config,
        })
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Bucket `points` by `period` off-thread
    pub async fn aggregate(
        &self,
        points: &[Sample],
        period: AggregationPeriod,
    ) -> AggregateResult<Vec<AggregateBucket>> {
        let request = WorkerRequest::Aggregate(AggregateRequest {
            points: points.to_vec(),
            period,
        });
        match self.submit(|reply| Job::Request(request, reply)).await? {
            WorkerResponse::AggregateResult { data } => Ok(data),
            other => Err(unexpected(other)),
        }
    }

    /// Normalize `points` off-thread
    pub async fn normalize(&self, points: &[Sample]) -> AggregateResult<Vec<Sample>> {
        let request = WorkerRequest::Normalize(NormalizeRequest {
            points: points.to_vec(),
        });
        match self.submit(|reply| Job::Request(request, reply)).await? {
            WorkerResponse::NormalizeResult { data } => Ok(data),
            other => Err(unexpected(other)),
        }
    }

    /// Send a raw JSON message and return the worker's response message,
    /// including `ERROR` responses
    pub async fn handle_raw(&self, raw: impl Into<String>) -> AggregateResult<WorkerResponse> {
        let raw = raw.into();
        self.submit(|reply| Job::Raw(raw, reply)).await
    }

    async fn submit(
        &self,
        job: impl FnOnce(oneshot::Sender<WorkerResponse>) -> Job,
    ) -> AggregateResult<WorkerResponse> {
        let sender = self.sender.as_ref().ok_or(AggregateError::Closed)?;
        let (reply, response) = oneshot::channel();
        let job = job(reply);
        let timeout = self.config.request_timeout;

        let exchange = async {
            sender.send(job).await.map_err(|_| AggregateError::Closed)?;
            response.await.map_err(|_| AggregateError::Closed)
        };

        match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Aggregation request timed out");
                Err(AggregateError::Timeout(timeout.as_millis() as u64))
            }
        }
    }

    /// Close the channel and wait for the thread to finish
    pub fn shutdown(&mut self) {
        self.sender.take();
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::error!("Aggregation worker panicked");
            }
        }
    }
}

impl Drop for AggregationWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn unexpected(response: WorkerResponse) -> AggregateError {
    match response {
        WorkerResponse::Error { error } => AggregateError::Worker(error),
        _ => AggregateError::Worker("Unexpected response type".to_string()),
    }
}
