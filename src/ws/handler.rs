//! WebSocket handler for chat connections.

use axum::{
    extract::{
        State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use log::{debug, error, info, warn};
use std::time::Duration;

use crate::api::AppState;
use crate::auth::CurrentUser;

use super::session::ChatSession;
use super::types::{ChatCommand, ChatEvent};

/// Ping interval for keepalive.
const PING_INTERVAL_SECS: u64 = 30;

/// WebSocket upgrade handler.
///
/// GET /chat
///
/// The auth middleware has already verified the credential; an invalid or
/// missing token is rejected with 401 before the upgrade, so no
/// unauthenticated connection ever reaches the hub.
pub async fn chat_handler(
    State(state): State<AppState>,
    user: CurrentUser,
    ws: WebSocketUpgrade,
) -> Response {
    info!("WebSocket upgrade request from user {}", user.id());
    ws.on_upgrade(move |socket| handle_connection(socket, state, user))
}

/// Drive one WebSocket connection through its session lifecycle.
async fn handle_connection(socket: WebSocket, state: AppState, user: CurrentUser) {
    let (mut sender, mut receiver) = socket.split();

    // Transport-level ack; chat events only start after the session is up.
    if let Ok(json) = serde_json::to_string(&ChatEvent::Connected)
        && sender.send(Message::Text(json.into())).await.is_err()
    {
        error!("Failed to send connected message to user {}", user.id());
        return;
    }

    let (session, mut event_rx) = match ChatSession::connect(
        state.hub.clone(),
        state.messages.clone(),
        user.id(),
        user.display_name(),
    )
    .await
    {
        Ok(established) => established,
        Err(e) => {
            error!("Failed to establish chat session for {}: {:#}", user.id(), e);
            let _ = sender.close().await;
            return;
        }
    };

    // Writer task: drains the per-connection channel so one slow client
    // never blocks another's broadcast.
    let send_task = tokio::spawn(async move {
        let mut ping_interval = tokio::time::interval(Duration::from_secs(PING_INTERVAL_SECS));

        loop {
            tokio::select! {
                event = event_rx.recv() => {
                    let Some(event) = event else { break };
                    let json = match serde_json::to_string(&event) {
                        Ok(j) => j,
                        Err(e) => {
                            warn!("Failed to serialize event: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }

                _ = ping_interval.tick() => {
                    let Ok(ping_json) = serde_json::to_string(&ChatEvent::Ping) else { break };
                    if sender.send(Message::Text(ping_json.into())).await.is_err() {
                        break;
                    }
                }
            }
        }
    });

    // Reader loop: inbound messages are processed in arrival order.
    while let Some(msg_result) = receiver.next().await {
        match msg_result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ChatCommand>(&text) {
                Ok(ChatCommand::SendMessage { body }) => {
                    session.handle_message(&body).await;
                }
                Ok(ChatCommand::Pong) => {}
                Err(e) => {
                    warn!("Failed to parse command from user {}: {}", user.id(), e);
                }
            },
            Ok(Message::Binary(_)) => {
                debug!("Received binary message from user {}, ignoring", user.id());
            }
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Ok(Message::Close(_)) => {
                info!("User {} closed chat connection", user.id());
                break;
            }
            Err(e) => {
                // Abrupt transport failure takes the same teardown path as
                // a graceful close.
                warn!("WebSocket error for user {}: {}", user.id(), e);
                break;
            }
        }
    }

    send_task.abort();
    session.disconnect();
}
