use std::sync::Arc;

use crate::config::ServerConfig;
use crate::tracker::TrackerSupervisor;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: slate_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket connections, keyed by connection id.
    pub ws_manager: Arc<WsManager>,
    /// The companion focus-tracker process, if one is running.
    pub tracker: Arc<TrackerSupervisor>,
}
