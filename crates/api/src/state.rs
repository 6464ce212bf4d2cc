use std::sync::Arc;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or is already a handle.
#[derive(Clone)]
pub struct AppState {
    pub pool: habitforge_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connections, keyed by connection id.
    pub ws_manager: Arc<WsManager>,
    /// Bus that handlers publish domain events on.
    pub event_bus: Arc<habitforge_events::EventBus>,
}
