//! Generic handlers for schema-driven entities.
//!
//! One set of five handlers serves every catalog entity; the concrete
//! schema arrives via an `Extension` installed by the route factory in
//! [`routes::entities`](crate::routes::entities). Reads are public;
//! mutations require a staff role.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use parc_core::error::CoreError;
use parc_core::schema::{self, EntitySchema};
use parc_db::repositories::{EntityRepo, IdValue, JsonRecord};
use serde_json::Value;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireStaff;
use crate::state::AppState;

fn not_found(schema: &'static EntitySchema) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: schema.name,
    })
}

/// Parse a path segment into a typed id, mapping unparseable ids for
/// auto-keyed entities to not-found (such a record cannot exist).
fn parse_id(schema: &'static EntitySchema, raw: &str) -> Result<IdValue, AppError> {
    IdValue::parse(schema, raw).ok_or_else(|| not_found(schema))
}

fn object_payload(body: Value) -> Result<serde_json::Map<String, Value>, AppError> {
    body.as_object()
        .cloned()
        .ok_or_else(|| AppError::BadRequest("Request body must be a JSON object".to_string()))
}

/// GET /api/{entity}
pub async fn list(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static EntitySchema>,
) -> AppResult<Json<Vec<JsonRecord>>> {
    let records = EntityRepo::list(&state.pool, schema).await?;
    Ok(Json(records))
}

/// GET /api/{entity}/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static EntitySchema>,
    Path(raw_id): Path<String>,
) -> AppResult<Json<JsonRecord>> {
    let id = parse_id(schema, &raw_id)?;
    let record = EntityRepo::find_by_id(&state.pool, schema, &id)
        .await?
        .ok_or_else(|| not_found(schema))?;
    Ok(Json(record))
}

/// POST /api/{entity}
pub async fn create(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static EntitySchema>,
    RequireStaff(_user): RequireStaff,
    AppJson(body): AppJson<Value>,
) -> AppResult<(StatusCode, Json<JsonRecord>)> {
    let payload = object_payload(body)?;
    let record = schema::validate_create(schema, &payload)
        .map_err(|errors| AppError::Core(CoreError::FieldValidation(errors)))?;

    let id = EntityRepo::insert(&state.pool, schema, &record).await?;
    let created = EntityRepo::find_by_id(&state.pool, schema, &id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Created {} record {id} could not be re-read",
                schema.name
            ))
        })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/{entity}/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static EntitySchema>,
    RequireStaff(_user): RequireStaff,
    Path(raw_id): Path<String>,
    AppJson(body): AppJson<Value>,
) -> AppResult<Json<JsonRecord>> {
    let id = parse_id(schema, &raw_id)?;
    let payload = object_payload(body)?;
    let fields = schema::validate_update(schema, &payload)
        .map_err(|errors| AppError::Core(CoreError::FieldValidation(errors)))?;

    let updated = EntityRepo::update(&state.pool, schema, &id, &fields).await?;
    if !updated {
        return Err(not_found(schema));
    }

    let record = EntityRepo::find_by_id(&state.pool, schema, &id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!(
                "Updated {} record {id} could not be re-read",
                schema.name
            ))
        })?;
    Ok(Json(record))
}

/// DELETE /api/{entity}/{id}
pub async fn remove(
    State(state): State<AppState>,
    Extension(schema): Extension<&'static EntitySchema>,
    RequireStaff(_user): RequireStaff,
    Path(raw_id): Path<String>,
) -> AppResult<StatusCode> {
    let id = parse_id(schema, &raw_id)?;
    if EntityRepo::delete(&state.pool, schema, &id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(schema))
    }
}
