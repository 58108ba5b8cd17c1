pub mod auth;
pub mod entities;
pub mod health;
pub mod setup;
pub mod users;
pub mod work_orders;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::{Json, Router};
use parc_core::catalog;
use serde_json::json;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/refresh                  refresh (public)
/// /auth/logout                   logout (requires auth)
/// /auth/profile                  profile (requires auth)
///
/// /users                         list, create (admin only)
/// /users/{id}                    get, update, deactivate (admin only)
///
/// /work-orders                   list (auth), create (staff)
/// /work-orders/{id}              get (auth), update (staff), delete (admin)
///
/// /admin/migrate                 start migration run (setup token)
/// /admin/migrate/status          migration state (setup token)
/// /admin/bootstrap               create initial admin (setup token)
///
/// /{entity}                      list (public), create (staff)
/// /{entity}/{id}                 get (public), update, delete (staff)
///   for every catalog entity: tdl, tsf, ac, dc, hvac, gen-tsw,
///   autre, besoin, fournisseurs, fabricant
/// ```
pub fn api_routes() -> Router<AppState> {
    let mut router = Router::new()
        // Authentication (register, login, refresh, logout, profile).
        .nest("/auth", auth::router())
        // User management (admin only).
        .nest("/users", users::router())
        // Work orders.
        .nest("/work-orders", work_orders::router())
        // Operator setup: migrations and admin bootstrap (setup token).
        .nest("/admin", setup::router());

    // Schema-driven entities: one generic router per catalog entry.
    for schema in catalog::ALL {
        router = router.nest(&format!("/{}", schema.path), entities::entity_router(schema));
    }

    router
}

/// Catch-all 404 handler bounding the route table.
pub async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Resource not found",
            "code": "NOT_FOUND",
        })),
    )
}
