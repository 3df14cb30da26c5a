//! Durable chat message storage.

mod models;
mod repository;

pub use models::{ChatMessage, NewChatMessage};
pub use repository::MessageRepository;
