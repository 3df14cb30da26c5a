//! Real-time chat hub.
//!
//! One global room. Clients connect over WebSocket with a pre-issued JWT,
//! receive recent history privately, then take part in best-effort fan-out
//! of chat messages and presence notices.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     Clients (browser)                     │
//! │  - One WebSocket per tab; token via access_token param    │
//! └──────────────────────────────┬────────────────────────────┘
//!                                │ WebSocket
//! ┌──────────────────────────────▼────────────────────────────┐
//! │  handler: upgrade, reader loop, per-connection writer     │
//! │  session: connect / message / disconnect state machine    │
//! │  hub:     connection registry + broadcast router          │
//! └──────────────────────────────┬────────────────────────────┘
//!                                │
//!                   ┌────────────▼────────────┐
//!                   │  MessageRepository      │
//!                   │  (append, recent 50)    │
//!                   └─────────────────────────┘
//! ```

mod handler;
mod hub;
mod session;
mod types;

pub use handler::chat_handler;
pub use hub::{ChatHub, ConnectionId};
pub use session::{ChatSession, HISTORY_LIMIT};
pub use types::{ChatCommand, ChatEvent, SYSTEM_SENDER};
