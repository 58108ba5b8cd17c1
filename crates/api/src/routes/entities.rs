//! Generic route factory for schema-driven entities.
//!
//! One call per catalog entry produces the full CRUD surface; the schema
//! travels to the shared handlers via an `Extension` layer. Adding an
//! entity to the API means adding a declaration to
//! `parc_core::catalog`, nothing here changes.

use axum::routing::get;
use axum::{Extension, Router};
use parc_core::schema::EntitySchema;

use crate::handlers::entity;
use crate::state::AppState;

/// Routes mounted at `/{schema.path}`.
///
/// ```text
/// GET    /          -> list (public)
/// POST   /          -> create (staff)
/// GET    /{id}      -> get_by_id (public)
/// PUT    /{id}      -> update (staff)
/// DELETE /{id}      -> remove (staff)
/// ```
pub fn entity_router(schema: &'static EntitySchema) -> Router<AppState> {
    Router::new()
        .route("/", get(entity::list).post(entity::create))
        .route(
            "/{id}",
            get(entity::get_by_id)
                .put(entity::update)
                .delete(entity::remove),
        )
        .layer(Extension(schema))
}
