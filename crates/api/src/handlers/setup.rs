//! Handlers for operator setup endpoints (`/admin`).
//!
//! All three are gated by [`SetupAccess`]; they are never open HTTP
//! surface. Migration runs go through the coordinator so concurrent
//! triggers cannot start two runs.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use parc_core::error::CoreError;
use parc_core::roles::Role;
use parc_db::models::user::{CreateUser, UserResponse};
use parc_db::repositories::UserRepo;
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::auth::password::{hash_password, validate_password_strength};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::setup::{MigrationState, SetupAccess};
use crate::state::AppState;

/// Minimum password length for the bootstrap admin account.
const MIN_PASSWORD_LENGTH: usize = 12;

/// Request body for `POST /admin/bootstrap`.
#[derive(Debug, Deserialize, Validate)]
pub struct BootstrapRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
}

/// POST /api/admin/migrate
///
/// Start a migration run in the background. Returns 202 Accepted, or 409
/// `MIGRATION_RUNNING` when a run is already in flight.
pub async fn start_migration(
    State(state): State<AppState>,
    _access: SetupAccess,
) -> AppResult<(StatusCode, Json<Value>)> {
    state.migrations.try_begin()?;

    let pool = state.pool.clone();
    let coordinator = Arc::clone(&state.migrations);
    tokio::spawn(async move {
        match parc_db::run_migrations(&pool).await {
            Ok(()) => {
                tracing::info!("Migration run completed");
                coordinator.complete();
            }
            Err(e) => {
                tracing::error!(error = %e, "Migration run failed");
                coordinator.fail(e.to_string());
            }
        }
    });

    Ok((StatusCode::ACCEPTED, Json(json!({ "status": "running" }))))
}

/// GET /api/admin/migrate/status
pub async fn migration_status(
    State(state): State<AppState>,
    _access: SetupAccess,
) -> AppResult<Json<MigrationState>> {
    Ok(Json(state.migrations.snapshot()))
}

/// POST /api/admin/bootstrap
///
/// Create the initial admin account. Refuses with 409 `ADMIN_EXISTS`
/// once any admin exists, so it cannot be replayed.
pub async fn bootstrap_admin(
    State(state): State<AppState>,
    _access: SetupAccess,
    AppJson(input): AppJson<BootstrapRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    if UserRepo::has_admin(&state.pool).await? {
        return Err(AppError::Core(CoreError::Conflict {
            code: "ADMIN_EXISTS",
            message: "An admin account already exists".to_string(),
        }));
    }

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        email: input.email,
        password_hash: hashed,
        first_name: input.first_name,
        last_name: input.last_name,
        role: Role::Admin.as_str().to_string(),
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    Ok((StatusCode::CREATED, Json(user.to_response())))
}
