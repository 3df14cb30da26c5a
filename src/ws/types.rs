//! WebSocket message types for the chat hub.
//!
//! These types define the protocol between clients and the hub.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chat::ChatMessage;

/// Sender name used for join/leave presence notices.
pub const SYSTEM_SENDER: &str = "System";

/// Events sent from the hub to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// WebSocket connection established.
    Connected,

    /// Recent history, oldest first. Sent once, to the connecting client
    /// only.
    ReceiveChatHistory { messages: Vec<ChatMessage> },

    /// One chat utterance or a presence notice (sender = "System").
    ReceiveMessage {
        sender: String,
        body: String,
        sent_at: DateTime<Utc>,
    },

    /// Error message, delivered to one connection.
    Error { message: String },

    /// Heartbeat/keepalive ping.
    Ping,
}

impl ChatEvent {
    /// Build a presence notice from the system sender.
    pub fn system_notice(body: String, sent_at: DateTime<Utc>) -> Self {
        ChatEvent::ReceiveMessage {
            sender: SYSTEM_SENDER.to_string(),
            body,
            sent_at,
        }
    }
}

/// Commands sent from clients to the hub.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatCommand {
    /// Send a chat message to the room.
    SendMessage { body: String },

    /// Pong response to ping.
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receive_message_serialization() {
        let event = ChatEvent::ReceiveMessage {
            sender: "Alice".to_string(),
            body: "hello".to_string(),
            sent_at: Utc::now(),
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"type\":\"receive_message\""));
        assert!(json.contains("\"sender\":\"Alice\""));
    }

    #[test]
    fn test_system_notice_sender() {
        let event = ChatEvent::system_notice("Alice has joined the chat.".to_string(), Utc::now());
        match event {
            ChatEvent::ReceiveMessage { sender, .. } => assert_eq!(sender, SYSTEM_SENDER),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_send_message_deserialization() {
        let cmd: ChatCommand =
            serde_json::from_str(r#"{"type":"send_message","body":"hi"}"#).unwrap();
        match cmd {
            ChatCommand::SendMessage { body } => assert_eq!(body, "hi"),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
