//! Application state shared across all handlers.

use std::sync::Arc;

use staylink_core::config::AppConfig;
use staylink_database::DatabasePool;
use staylink_realtime::connection::SocketAuthenticator;
use staylink_realtime::{ConnectionRegistry, RealtimeEngine};

/// Shared dependencies, passed to every handler via `State<AppState>`.
///
/// All fields are `Arc`-wrapped (or pool handles) for cheap cloning across
/// tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// PostgreSQL connection pool.
    pub db: DatabasePool,
    /// Handshake token authentication.
    pub authenticator: SocketAuthenticator,
    /// The realtime engine behind the WebSocket endpoint.
    pub engine: Arc<RealtimeEngine>,
    /// Live session registry, read here for health reporting.
    pub registry: Arc<ConnectionRegistry>,
}
