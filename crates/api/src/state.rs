use std::sync::Arc;

use crate::config::ServerConfig;
use crate::context::DataContext;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// Cached view of the five collections over the active storage backend.
    pub context: Arc<DataContext>,
    /// Server configuration (JWT secret, timeouts).
    pub config: Arc<ServerConfig>,
}
