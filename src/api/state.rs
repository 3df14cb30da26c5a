//! Application state shared across handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::AuthState;
use crate::chat::MessageRepository;
use crate::db::Database;
use crate::listing::{ListingRepository, ListingService};
use crate::storage::Storage;
use crate::user::{UserRepository, UserService};
use crate::ws::ChatHub;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User account service.
    pub users: Arc<UserService>,
    /// Listing service.
    pub listings: Arc<ListingService>,
    /// Chat message store.
    pub messages: MessageRepository,
    /// Chat hub: connection registry and broadcast router.
    pub hub: Arc<ChatHub>,
    /// Authentication state.
    pub auth: AuthState,
    /// Media storage backend.
    pub storage: Arc<dyn Storage>,
    /// Directory served at /media (for the static file layer).
    pub media_dir: PathBuf,
}

impl AppState {
    /// Create new application state over a shared database.
    pub fn new(
        db: &Database,
        auth: AuthState,
        storage: Arc<dyn Storage>,
        media_dir: PathBuf,
    ) -> Self {
        let users = UserService::new(UserRepository::new(db.pool().clone()));
        let listings = ListingService::new(ListingRepository::new(db.pool().clone()));
        let messages = MessageRepository::new(db.pool().clone());

        Self {
            users: Arc::new(users),
            listings: Arc::new(listings),
            messages,
            hub: Arc::new(ChatHub::new()),
            auth,
            storage,
            media_dir,
        }
    }
}
