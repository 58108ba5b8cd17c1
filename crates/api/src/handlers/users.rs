//! Handlers for the `/users` resource (admin-gated user management).
//!
//! Deleting a user never removes the row: it flips `is_active` to false
//! and the record stays retrievable by id with the flag set.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use parc_core::error::CoreError;
use parc_core::roles::Role;
use parc_core::schema::FieldError;
use parc_core::types::DbId;
use parc_db::models::user::{CreateUser, UpdateUser, UserFilter, UserResponse};
use parc_db::repositories::UserRepo;
use serde::Deserialize;
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{page_window, UserListParams};
use crate::response::{PageMeta, Paginated};
use crate::state::AppState;

/// Minimum password length enforced on user creation.
const MIN_PASSWORD_LENGTH: usize = 12;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
    /// Defaults to `viewer` when absent.
    pub role: Option<String>,
}

/// Request body for `PUT /users/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
}

/// Parse and validate a role name against the typed enumeration.
fn parse_role(raw: &str) -> Result<Role, AppError> {
    raw.parse::<Role>().map_err(|_| {
        let allowed = Role::ALL.map(Role::as_str).join(", ");
        AppError::Core(CoreError::FieldValidation(vec![FieldError {
            field: "role".to_string(),
            message: format!("must be one of: {allowed}"),
        }]))
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/users
///
/// Paginated list with optional `role` / `is_active` filters.
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Paginated<UserResponse>>> {
    if let Some(role) = &params.role {
        parse_role(role)?;
    }
    let filter = UserFilter {
        role: params.role.clone(),
        is_active: params.is_active,
    };

    let (page, limit, offset) = page_window(params.page, params.limit);
    let users = UserRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = UserRepo::count(&state.pool, &filter).await?;

    Ok(Json(Paginated {
        items: users.iter().map(|u| u.to_response()).collect(),
        pagination: PageMeta::new(page, limit, total),
    }))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<UserResponse>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;
    Ok(Json(user.to_response()))
}

/// POST /api/users
///
/// Create a user. Validates password strength, hashes it, and returns a
/// safe [`UserResponse`] with 201 Created. Duplicate emails are 409.
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    AppJson(input): AppJson<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let role = match &input.role {
        Some(raw) => parse_role(raw)?,
        None => Role::Viewer,
    };

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        email: input.email,
        password_hash: hashed,
        first_name: input.first_name,
        last_name: input.last_name,
        role: role.as_str().to_string(),
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    Ok((StatusCode::CREATED, Json(user.to_response())))
}

/// PUT /api/users/{id}
///
/// Update profile fields, role, or the active flag (not the password).
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
    AppJson(input): AppJson<UpdateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    let role = match &input.role {
        Some(raw) => Some(parse_role(raw)?.as_str().to_string()),
        None => None,
    };

    let update_dto = UpdateUser {
        email: input.email,
        first_name: input.first_name,
        last_name: input.last_name,
        role,
        is_active: input.is_active,
    };

    let user = UserRepo::update(&state.pool, id, &update_dto)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;
    Ok(Json(user.to_response()))
}

/// DELETE /api/users/{id}
///
/// Soft-deactivate a user (sets `is_active = false`). Returns 204 No
/// Content; only a missing row is 404.
pub async fn deactivate_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deactivated = UserRepo::deactivate(&state.pool, id).await?;
    if deactivated {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "User" }))
    }
}
