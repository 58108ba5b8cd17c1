//! Handlers for the `/work-orders` resource.
//!
//! Reads require authentication; create/update require a staff role;
//! deletion is admin-only and is a hard delete (the Users-only soft
//! delete asymmetry is intentional).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use parc_core::error::CoreError;
use parc_core::schema::FieldError;
use parc_core::types::DbId;
use parc_db::models::work_order::{
    CreateWorkOrder, UpdateWorkOrder, WorkOrder, WorkOrderFilter, PRIORITES, STATUTS,
};
use parc_db::repositories::WorkOrderRepo;
use serde::Deserialize;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::{RequireAdmin, RequireAuth, RequireStaff};
use crate::query::{page_window, WorkOrderListParams};
use crate::response::{PageMeta, Paginated};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /work-orders`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWorkOrderRequest {
    #[validate(length(min = 1, max = 200, message = "must be 1-200 characters"))]
    pub titre: String,
    pub description: Option<String>,
    pub statut: Option<String>,
    pub priorite: Option<String>,
    pub tdl_id: Option<String>,
    pub assigned_to: Option<DbId>,
    pub date_echeance: Option<NaiveDate>,
}

/// Request body for `PUT /work-orders/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkOrderRequest {
    pub titre: Option<String>,
    pub description: Option<String>,
    pub statut: Option<String>,
    pub priorite: Option<String>,
    pub tdl_id: Option<String>,
    pub assigned_to: Option<DbId>,
    pub date_echeance: Option<NaiveDate>,
}

/// Validate an enum-like field against its allowed values.
fn check_choice(field: &str, value: &Option<String>, allowed: &[&str]) -> Result<(), AppError> {
    match value {
        Some(v) if !allowed.contains(&v.as_str()) => {
            Err(AppError::Core(CoreError::FieldValidation(vec![FieldError {
                field: field.to_string(),
                message: format!("must be one of: {}", allowed.join(", ")),
            }])))
        }
        _ => Ok(()),
    }
}

fn not_found() -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Work order",
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/work-orders
///
/// Paginated list with optional `statut` / `assigned_to` / `tdl_id`
/// filters, joined with site and assignee display labels.
pub async fn list_work_orders(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Query(params): Query<WorkOrderListParams>,
) -> AppResult<Json<Paginated<WorkOrder>>> {
    check_choice("statut", &params.statut, STATUTS)?;
    let filter = WorkOrderFilter {
        statut: params.statut.clone(),
        assigned_to: params.assigned_to,
        tdl_id: params.tdl_id.clone(),
    };

    let (page, limit, offset) = page_window(params.page, params.limit);
    let items = WorkOrderRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = WorkOrderRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated {
        items,
        pagination: PageMeta::new(page, limit, total),
    }))
}

/// GET /api/work-orders/{id}
pub async fn get_work_order(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    Path(id): Path<DbId>,
) -> AppResult<Json<WorkOrder>> {
    let work_order = WorkOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(work_order))
}

/// POST /api/work-orders
///
/// Create a work order. `created_by` is always the authenticated caller.
pub async fn create_work_order(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    AppJson(input): AppJson<CreateWorkOrderRequest>,
) -> AppResult<(StatusCode, Json<WorkOrder>)> {
    input.validate()?;
    check_choice("statut", &input.statut, STATUTS)?;
    check_choice("priorite", &input.priorite, PRIORITES)?;

    let create_dto = CreateWorkOrder {
        titre: input.titre,
        description: input.description,
        statut: input.statut,
        priorite: input.priorite,
        tdl_id: input.tdl_id,
        assigned_to: input.assigned_to,
        created_by: user.id,
        date_echeance: input.date_echeance,
    };

    let id = WorkOrderRepo::create(&state.pool, &create_dto).await?;
    let created = WorkOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Created work order {id} could not be re-read"))
        })?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/work-orders/{id}
pub async fn update_work_order(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateWorkOrderRequest>,
) -> AppResult<Json<WorkOrder>> {
    check_choice("statut", &input.statut, STATUTS)?;
    check_choice("priorite", &input.priorite, PRIORITES)?;

    let update_dto = UpdateWorkOrder {
        titre: input.titre,
        description: input.description,
        statut: input.statut,
        priorite: input.priorite,
        tdl_id: input.tdl_id,
        assigned_to: input.assigned_to,
        date_echeance: input.date_echeance,
    };

    let updated = WorkOrderRepo::update(&state.pool, id, &update_dto).await?;
    if !updated {
        return Err(not_found());
    }

    let work_order = WorkOrderRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Internal(format!("Updated work order {id} could not be re-read"))
        })?;
    Ok(Json(work_order))
}

/// DELETE /api/work-orders/{id}
pub async fn delete_work_order(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if WorkOrderRepo::delete(&state.pool, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found())
    }
}
