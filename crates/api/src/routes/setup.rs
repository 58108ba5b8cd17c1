//! Route definitions for operator setup endpoints.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::setup;
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the `X-Setup-Token` header matching `SETUP_TOKEN`
/// (enforced by the `SetupAccess` extractor); they are disabled when the
/// variable is unset.
///
/// ```text
/// POST /migrate          -> start_migration
/// GET  /migrate/status   -> migration_status
/// POST /bootstrap        -> bootstrap_admin
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/migrate", post(setup::start_migration))
        .route("/migrate/status", get(setup::migration_status))
        .route("/bootstrap", post(setup::bootstrap_admin))
}
