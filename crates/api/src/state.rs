use std::sync::Arc;

use crate::config::ServerConfig;
use crate::setup::MigrationCoordinator;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: parc_db::DbPool,
    /// Server configuration (JWT settings, setup token, timeouts).
    pub config: Arc<ServerConfig>,
    /// Migration coordinator guarding operator-triggered schema runs.
    pub migrations: Arc<MigrationCoordinator>,
}
