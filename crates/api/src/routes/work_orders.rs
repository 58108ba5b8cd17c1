//! Route definitions for the `/work-orders` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::work_orders;
use crate::state::AppState;

/// Routes mounted at `/work-orders`.
///
/// ```text
/// GET    /          -> list_work_orders (auth; paginated, filterable)
/// POST   /          -> create_work_order (staff)
/// GET    /{id}      -> get_work_order (auth)
/// PUT    /{id}      -> update_work_order (staff)
/// DELETE /{id}      -> delete_work_order (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(work_orders::list_work_orders).post(work_orders::create_work_order),
        )
        .route(
            "/{id}",
            get(work_orders::get_work_order)
                .put(work_orders::update_work_order)
                .delete(work_orders::delete_work_order),
        )
}
