//! Shared query parameter types for API handlers.

use parc_core::types::DbId;
use serde::Deserialize;

/// Default page size when `limit` is absent.
const DEFAULT_LIMIT: i64 = 50;

/// Hard cap on page size.
const MAX_LIMIT: i64 = 200;

/// Normalize raw `page`/`limit` query values into a bounded window.
///
/// Returns `(page, limit, offset)` with `page >= 1` and
/// `1 <= limit <= MAX_LIMIT`.
pub fn page_window(page: Option<i64>, limit: Option<i64>) -> (i64, i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    (page, limit, (page - 1) * limit)
}

/// Query parameters for `GET /api/users`.
#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Query parameters for `GET /api/work-orders`.
#[derive(Debug, Deserialize)]
pub struct WorkOrderListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub statut: Option<String>,
    pub assigned_to: Option<DbId>,
    pub tdl_id: Option<String>,
}
