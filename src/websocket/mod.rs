//! WebSocket Real-Time Streaming
//!
//! Pushes live stream samples to dashboard clients.
//!
//! ## Architecture
//!
//! - **ConnectionHub**: Manages active connections and subscriptions
//! - **Handler**: Handles the upgrade and per-connection message loop
//! - **Messages**: Client and server message formats
//!
//! ## Usage
//!
//! Clients connect to `/api/realtime` and subscribe to topics:
//! - `series.*` - Every series
//! - `series.{name}` - One series (`fps`, `memory`, `latency`)
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:3000/api/realtime');
//!
//! ws.onopen = () => {
//!   ws.send(JSON.stringify({type: 'subscribe', topics: ['series.fps']}));
//! };
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   // {type: 'sample', series: 'fps', timestamp: ..., value: ...}
//! };
//! ```

mod handler;
mod hub;
mod messages;

pub use handler::websocket_handler;
pub use hub::{forward_samples, is_valid_topic, ConnectionHub, ConnectionId, HubConfig, HubError};
pub use messages::{series_topic, ClientMessage, ServerMessage, WsEvent, ALL_SERIES_TOPIC};
