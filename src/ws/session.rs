//! Chat session lifecycle: connect, inbound messages, disconnect.

use anyhow::{Context, Result};
use chrono::Utc;
use log::warn;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;

use crate::chat::{MessageRepository, NewChatMessage};

use super::hub::{ChatHub, ConnectionId};
use super::types::ChatEvent;

/// How many stored messages are replayed to a newly joined client.
pub const HISTORY_LIMIT: i64 = 50;

/// One participant's session in the chat room.
///
/// Connect-time side effects run strictly in order: register, fetch
/// history, deliver history privately, announce the join to everyone.
/// A client therefore never sees its own join notice before its history.
pub struct ChatSession {
    hub: Arc<ChatHub>,
    messages: MessageRepository,
    conn: ConnectionId,
    user_id: String,
    display_name: String,
}

impl ChatSession {
    /// Establish a session for a verified identity.
    ///
    /// Returns the session and the receiver half of the connection's
    /// outbound channel. On a history fetch failure the registration is
    /// rolled back and no presence event is emitted.
    pub async fn connect(
        hub: Arc<ChatHub>,
        messages: MessageRepository,
        user_id: &str,
        display_name: &str,
    ) -> Result<(Self, mpsc::Receiver<ChatEvent>)> {
        let (conn, rx) = hub.register(user_id, display_name);

        let history = match messages.recent(HISTORY_LIMIT).await {
            Ok(history) => history,
            Err(e) => {
                hub.unregister(conn);
                return Err(e).context("fetching chat history");
            }
        };

        // History goes to the caller only; everyone else already has it.
        hub.send_to(conn, ChatEvent::ReceiveChatHistory { messages: history });

        hub.broadcast(&ChatEvent::system_notice(
            format!("{display_name} has joined the chat."),
            Utc::now(),
        ));
        info!(user_id, conn, "chat session established");

        Ok((
            Self {
                hub,
                messages,
                conn,
                user_id: user_id.to_string(),
                display_name: display_name.to_string(),
            },
            rx,
        ))
    }

    /// Handle one inbound chat message.
    ///
    /// Empty or whitespace-only bodies are discarded silently. Otherwise
    /// the message is persisted first and broadcast only on success; a
    /// persistence failure is reported to the sender alone and leaves the
    /// connection open.
    pub async fn handle_message(&self, body: &str) {
        if body.trim().is_empty() {
            return;
        }

        let message = NewChatMessage {
            sender_id: self.user_id.clone(),
            sender_name: self.display_name.clone(),
            body: body.to_string(),
            sent_at: Utc::now(),
        };

        match self.messages.append(message).await {
            Ok(stored) => {
                // Sender included: its UI updates through the same
                // broadcast path as everyone else's.
                self.hub.broadcast(&ChatEvent::ReceiveMessage {
                    sender: stored.sender_name,
                    body: stored.body,
                    sent_at: stored.sent_at,
                });
            }
            Err(e) => {
                warn!(
                    "Failed to persist message from user {}: {:#}",
                    self.user_id, e
                );
                self.hub.send_to(
                    self.conn,
                    ChatEvent::Error {
                        message: "message could not be saved".to_string(),
                    },
                );
            }
        }
    }

    /// Tear the session down after transport closure.
    ///
    /// Exactly-once: the departure notice is tied to the first successful
    /// unregistration, so racing close paths cannot announce twice.
    pub fn disconnect(&self) {
        if let Some(peer) = self.hub.unregister(self.conn) {
            self.hub.broadcast(&ChatEvent::system_notice(
                format!("{} has left the chat.", peer.display_name),
                Utc::now(),
            ));
            info!(user_id = %self.user_id, conn = self.conn, "chat session closed");
        }
    }
}
