//! Connection registry and broadcast router for the chat hub.

use dashmap::DashMap;
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;

use super::types::ChatEvent;

/// Size of the per-connection send buffer.
///
/// A recipient that falls this far behind has its deliveries dropped
/// (best-effort) rather than stalling the broadcast.
const CONNECTION_BUFFER_SIZE: usize = 64;

/// Opaque handle for one live connection.
pub type ConnectionId = u64;

/// A registered connection: bound identity plus its outbound channel.
#[derive(Debug)]
pub struct Peer {
    pub user_id: String,
    pub display_name: String,
    tx: mpsc::Sender<ChatEvent>,
}

/// Chat hub managing all live connections.
///
/// The hub is responsible for:
/// - Tracking connected, authenticated participants
/// - Delivering events to a single connection
/// - Broadcasting events to every connection
///
/// Multiple connections may share one user ID (several devices or tabs);
/// each gets its own handle and its own outbound buffer.
pub struct ChatHub {
    /// Connection ID -> peer
    peers: DashMap<ConnectionId, Peer>,

    /// Next handle to assign.
    next_id: AtomicU64,
}

impl ChatHub {
    /// Create a new hub.
    pub fn new() -> Self {
        Self {
            peers: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Register a new connection bound to a verified identity.
    ///
    /// Returns the assigned handle and the receiver half of the
    /// connection's outbound channel.
    pub fn register(
        &self,
        user_id: &str,
        display_name: &str,
    ) -> (ConnectionId, mpsc::Receiver<ChatEvent>) {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER_SIZE);
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        self.peers.insert(
            id,
            Peer {
                user_id: user_id.to_string(),
                display_name: display_name.to_string(),
                tx,
            },
        );
        info!("Registered connection {} for user {}", id, user_id);

        (id, rx)
    }

    /// Remove a connection.
    ///
    /// Idempotent: removing an absent handle is a no-op and returns `None`.
    /// Disconnect notifications can race; only the first caller gets the
    /// peer back.
    pub fn unregister(&self, id: ConnectionId) -> Option<Peer> {
        let removed = self.peers.remove(&id).map(|(_, peer)| peer);
        if let Some(ref peer) = removed {
            info!("Unregistered connection {} for user {}", id, peer.user_id);
        }
        removed
    }

    /// Deliver an event to a single connection.
    ///
    /// Returns false if the handle is absent or its channel is closed; a
    /// closed channel removes the handle.
    pub fn send_to(&self, id: ConnectionId, event: ChatEvent) -> bool {
        let Some(peer) = self.peers.get(&id) else {
            return false;
        };

        match peer.tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Send buffer full for connection {}, dropping event", id);
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                drop(peer);
                self.unregister(id);
                false
            }
        }
    }

    /// Deliver an event to every registered connection.
    ///
    /// Each delivery is independent: a dead or slow recipient never blocks
    /// the others. Per-recipient ordering follows the FIFO outbound
    /// channel. Dead channels found during the sweep are unregistered.
    pub fn broadcast(&self, event: &ChatEvent) {
        let mut dead: Vec<ConnectionId> = Vec::new();

        for entry in self.peers.iter() {
            match entry.tx.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(
                        "Send buffer full for connection {}, dropping broadcast",
                        entry.key()
                    );
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Connection {} closed during broadcast", entry.key());
                    dead.push(*entry.key());
                }
            }
        }

        // Removal happens after the sweep; removing mid-iteration would
        // contend on the shard locks.
        for id in dead {
            self.unregister(id);
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.peers.len()
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}
