use std::sync::Arc;

use gymdesk_core::check_in::CheckInProcessor;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: gymdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Check-in engine over the configured member store.
    pub check_in: CheckInProcessor,
}
