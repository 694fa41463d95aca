//! WebSocket Message Types
//!
//! Defines the messages exchanged between dashboard clients and the
//! realtime endpoint.

use serde::{Deserialize, Serialize};

use crate::stream::{Sample, SeriesKind};

/// Topic prefix for per-series sample updates
pub const SERIES_TOPIC_PREFIX: &str = "series.";

/// Wildcard topic matching every series
pub const ALL_SERIES_TOPIC: &str = "series.*";

/// Messages sent from client to server
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to topics (e.g. "series.fps", "series.*")
    Subscribe { topics: Vec<String> },
    /// Unsubscribe from topics
    Unsubscribe { topics: Vec<String> },
    /// Keepalive
    Ping,
}

/// Messages sent from server to client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// A live stream appended a sample
    Sample {
        series: SeriesKind,
        timestamp: i64,
        value: f64,
    },
    /// Subscription confirmed
    Subscribed { topics: Vec<String> },
    /// Unsubscription confirmed
    Unsubscribed { topics: Vec<String> },
    Pong,
    Error { message: String },
    /// Sent once after the upgrade completes
    Connected { connection_id: String },
}

/// A message routed to the subscribers of one topic
#[derive(Debug, Clone)]
pub struct WsEvent {
    pub topic: String,
    pub message: ServerMessage,
}

impl WsEvent {
    /// Event for a freshly appended stream sample, on `series.<name>`
    pub fn sample(series: SeriesKind, sample: &Sample) -> Self {
        Self {
            topic: series_topic(series),
            message: ServerMessage::Sample {
                series,
                timestamp: sample.timestamp,
                value: sample.value,
            },
        }
    }
}

/// `series.<name>`
pub fn series_topic(series: SeriesKind) -> String {
    format!("{}{}", SERIES_TOPIC_PREFIX, series.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_message_deserialize_subscribe() {
        let json = r#"{"type": "subscribe", "topics": ["series.fps", "series.*"]}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Subscribe { topics } => {
                assert_eq!(topics, vec!["series.fps", "series.*"]);
            }
            _ => panic!("Expected Subscribe"),
        }
    }

    #[test]
    fn test_client_message_deserialize_ping() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type": "ping"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn test_server_message_serialize_sample() {
        let event = WsEvent::sample(SeriesKind::Fps, &Sample::new(1_000, 59.5));
        assert_eq!(event.topic, "series.fps");

        let json: serde_json::Value = serde_json::to_value(&event.message).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "sample",
                "series": "fps",
                "timestamp": 1000,
                "value": 59.5
            })
        );
    }

    #[test]
    fn test_server_message_serialize_connected() {
        let msg = ServerMessage::Connected {
            connection_id: "abc-123".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"connected\""));
        assert!(json.contains("\"connection_id\":\"abc-123\""));
    }
}
