//! WebSocket push for live timer status.
//!
//! Provides connection management, heartbeat monitoring, the HTTP upgrade
//! handler, and the `status_changed` fan-out.

mod handler;
mod heartbeat;
pub mod manager;
pub mod push;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
pub use push::{publish_status, ServerMessage};
