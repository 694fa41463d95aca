//! WebSocket Connection Hub
//!
//! Tracks live connections and their topic subscriptions, and fans stream
//! samples out to subscribers.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::messages::{ServerMessage, WsEvent, ALL_SERIES_TOPIC, SERIES_TOPIC_PREFIX};
use crate::stream::{Sample, SeriesKind};

/// Unique identifier for a WebSocket connection
pub type ConnectionId = String;

/// Manages all WebSocket connections and subscriptions
pub struct ConnectionHub {
    /// ConnectionId → ConnectionHandle
    connections: RwLock<HashMap<ConnectionId, ConnectionHandle>>,
    /// Topic → subscribed ConnectionIds
    subscriptions: RwLock<HashMap<String, HashSet<ConnectionId>>>,
    config: HubConfig,
}

/// Configuration for the connection hub
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Maximum number of concurrent connections
    pub max_connections: usize,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            max_connections: 1000,
        }
    }
}

/// Handle for sending messages to a specific connection
pub struct ConnectionHandle {
    pub sender: mpsc::UnboundedSender<ServerMessage>,
    pub subscriptions: HashSet<String>,
}

impl ConnectionHub {
    pub fn new(config: HubConfig) -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            subscriptions: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Register a new WebSocket connection
    ///
    /// Returns the connection ID, or an error once the connection limit
    /// has been reached.
    pub async fn register(
        &self,
        sender: mpsc::UnboundedSender<ServerMessage>,
    ) -> Result<ConnectionId, HubError> {
        let mut connections = self.connections.write().await;
        if connections.len() >= self.config.max_connections {
            return Err(HubError::TooManyConnections(self.config.max_connections));
        }

        let id = Uuid::new_v4().to_string();
        connections.insert(
            id.clone(),
            ConnectionHandle {
                sender,
                subscriptions: HashSet::new(),
            },
        );

        tracing::info!(connection_id = %id, "WebSocket connected");
        Ok(id)
    }

    /// Unregister a connection and clean up its subscriptions
    pub async fn unregister(&self, id: &str) {
        let handle = self.connections.write().await.remove(id);

        if let Some(handle) = handle {
            let mut subs = self.subscriptions.write().await;
            for topic in handle.subscriptions {
                if let Some(subscribers) = subs.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&topic);
                    }
                }
            }
        }

        tracing::info!(connection_id = %id, "WebSocket disconnected");
    }

    /// Subscribe a connection to topics; invalid topics are skipped
    pub async fn subscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut subscribed = Vec::new();

        for topic in topics {
            if !is_valid_topic(&topic) {
                tracing::warn!(topic = %topic, "Invalid topic ignored");
                continue;
            }

            handle.subscriptions.insert(topic.clone());
            subs.entry(topic.clone()).or_default().insert(id.to_string());
            subscribed.push(topic);
        }

        tracing::debug!(connection_id = %id, topics = ?subscribed, "Subscribed to topics");
        Ok(subscribed)
    }

    /// Unsubscribe a connection from topics
    pub async fn unsubscribe(&self, id: &str, topics: Vec<String>) -> Result<Vec<String>, HubError> {
        let mut connections = self.connections.write().await;
        let handle = connections.get_mut(id).ok_or(HubError::ConnectionNotFound)?;

        let mut subs = self.subscriptions.write().await;
        let mut unsubscribed = Vec::new();

        for topic in topics {
            if handle.subscriptions.remove(&topic) {
                if let Some(subscribers) = subs.get_mut(&topic) {
                    subscribers.remove(id);
                    if subscribers.is_empty() {
                        subs.remove(&topic);
                    }
                }
                unsubscribed.push(topic);
            }
        }

        tracing::debug!(connection_id = %id, topics = ?unsubscribed, "Unsubscribed from topics");
        Ok(unsubscribed)
    }

    /// Send an event to the subscribers of its topic and of `series.*`
    ///
    /// Returns the number of connections the message was queued for.
    pub async fn broadcast(&self, event: &WsEvent) -> usize {
        let subs = self.subscriptions.read().await;
        let connections = self.connections.read().await;

        let mut recipients: HashSet<&ConnectionId> = HashSet::new();
        if let Some(ids) = subs.get(&event.topic) {
            recipients.extend(ids);
        }
        if event.topic.starts_with(SERIES_TOPIC_PREFIX) {
            if let Some(ids) = subs.get(ALL_SERIES_TOPIC) {
                recipients.extend(ids);
            }
        }

        let mut sent = 0;
        for id in recipients {
            if let Some(handle) = connections.get(id) {
                if handle.sender.send(event.message.clone()).is_ok() {
                    sent += 1;
                }
            }
        }

        if sent > 0 {
            tracing::trace!(topic = %event.topic, subscribers = sent, "Broadcast event");
        }
        sent
    }

    /// Send a message directly to a specific connection
    pub async fn send_to(&self, id: &str, message: ServerMessage) -> Result<(), HubError> {
        let connections = self.connections.read().await;
        let handle = connections.get(id).ok_or(HubError::ConnectionNotFound)?;

        handle.sender.send(message).map_err(|_| HubError::SendFailed)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    pub async fn subscription_count(&self, topic: &str) -> usize {
        self.subscriptions
            .read()
            .await
            .get(topic)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

/// Valid topics are `series.*` and `series.<name>` for a known series
pub fn is_valid_topic(topic: &str) -> bool {
    if topic == ALL_SERIES_TOPIC {
        return true;
    }
    topic
        .strip_prefix(SERIES_TOPIC_PREFIX)
        .and_then(SeriesKind::parse)
        .is_some()
}

/// Relay every sample from a stream subscription into the hub until the
/// stream's sender is dropped
pub fn forward_samples(
    hub: Arc<ConnectionHub>,
    series: SeriesKind,
    mut samples: broadcast::Receiver<Sample>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match samples.recv().await {
                Ok(sample) => {
                    hub.broadcast(&WsEvent::sample(series, &sample)).await;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(series = %series.as_str(), skipped, "Realtime relay lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!(series = %series.as_str(), "Realtime relay stopped");
    })
}

/// Errors that can occur in the connection hub
#[derive(Debug, Error)]
pub enum HubError {
    #[error("Too many connections (limit: {0})")]
    TooManyConnections(usize),

    #[error("Connection not found")]
    ConnectionNotFound,

    #[error("Failed to send message")]
    SendFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_topics() {
        assert!(is_valid_topic("series.fps"));
        assert!(is_valid_topic("series.memory"));
        assert!(is_valid_topic("series.latency"));
        assert!(is_valid_topic("series.*"));

        assert!(!is_valid_topic("series.cpu"));
        assert!(!is_valid_topic("fps"));
        assert!(!is_valid_topic(""));
        assert!(!is_valid_topic("metrics.fps"));
    }

    #[tokio::test]
    async fn test_register_unregister() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();

        let id = hub.register(tx).await.unwrap();
        assert!(!id.is_empty());
        assert_eq!(hub.connection_count().await, 1);

        hub.unregister(&id).await;
        assert_eq!(hub.connection_count().await, 0);
    }

    #[tokio::test]
    async fn test_subscribe_unsubscribe() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, _rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        let subscribed = hub
            .subscribe(&id, vec!["series.fps".to_string(), "bogus".to_string()])
            .await
            .unwrap();
        assert_eq!(subscribed, vec!["series.fps"]);
        assert_eq!(hub.subscription_count("series.fps").await, 1);

        let unsubscribed = hub
            .unsubscribe(&id, vec!["series.fps".to_string(), "series.memory".to_string()])
            .await
            .unwrap();
        assert_eq!(unsubscribed, vec!["series.fps"]);
        assert_eq!(hub.subscription_count("series.fps").await, 0);

        hub.unregister(&id).await;
    }

    #[tokio::test]
    async fn test_unknown_connection() {
        let hub = ConnectionHub::new(HubConfig::default());
        let result = hub.subscribe("missing", vec!["series.*".to_string()]).await;
        assert!(matches!(result, Err(HubError::ConnectionNotFound)));
    }

    #[tokio::test]
    async fn test_connection_limit() {
        let hub = ConnectionHub::new(HubConfig { max_connections: 2 });

        let (tx1, _) = mpsc::unbounded_channel();
        let (tx2, _) = mpsc::unbounded_channel();
        let (tx3, _) = mpsc::unbounded_channel();

        hub.register(tx1).await.unwrap();
        hub.register(tx2).await.unwrap();
        let result = hub.register(tx3).await;

        assert!(matches!(result, Err(HubError::TooManyConnections(2))));
    }

    #[tokio::test]
    async fn test_broadcast_to_subscribers() {
        let hub = ConnectionHub::new(HubConfig::default());

        let (tx1, mut rx1) = mpsc::unbounded_channel();
        let (tx2, mut rx2) = mpsc::unbounded_channel();
        let id1 = hub.register(tx1).await.unwrap();
        let id2 = hub.register(tx2).await.unwrap();

        hub.subscribe(&id1, vec!["series.fps".to_string()]).await.unwrap();
        hub.subscribe(&id2, vec!["series.memory".to_string()]).await.unwrap();

        let event = WsEvent::sample(SeriesKind::Fps, &Sample::new(1_000, 60.0));
        assert_eq!(hub.broadcast(&event).await, 1);

        assert_eq!(rx1.try_recv().unwrap(), event.message);
        assert!(rx2.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_wildcard_delivers_once() {
        let hub = ConnectionHub::new(HubConfig::default());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();

        hub.subscribe(&id, vec!["series.*".to_string(), "series.latency".to_string()])
            .await
            .unwrap();

        let event = WsEvent::sample(SeriesKind::Latency, &Sample::new(1_000, 42.0));
        assert_eq!(hub.broadcast(&event).await, 1);
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_forward_samples() {
        let hub = Arc::new(ConnectionHub::new(HubConfig::default()));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let id = hub.register(tx).await.unwrap();
        hub.subscribe(&id, vec!["series.*".to_string()]).await.unwrap();

        let (samples_tx, samples_rx) = broadcast::channel(16);
        let relay = forward_samples(Arc::clone(&hub), SeriesKind::Memory, samples_rx);

        samples_tx.send(Sample::new(5, 48.0)).unwrap();
        drop(samples_tx);
        relay.await.unwrap();

        assert_eq!(
            rx.try_recv().unwrap(),
            ServerMessage::Sample {
                series: SeriesKind::Memory,
                timestamp: 5,
                value: 48.0,
            }
        );
    }
}
