//! WebSocket push channel.
//!
//! Clients connect to `/api/v1/ws?token=<access token>` and receive new
//! notifications as JSON text frames.

mod handler;
mod heartbeat;
pub mod manager;

pub use handler::ws_handler;
pub use heartbeat::start_heartbeat;
pub use manager::WsManager;
