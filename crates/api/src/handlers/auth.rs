//! Handlers for the `/auth` resource (register, login, refresh, logout,
//! profile).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use parc_core::error::CoreError;
use parc_core::roles::Role;
use parc_core::types::DbId;
use parc_db::models::session::CreateSession;
use parc_db::models::user::{CreateUser, UserResponse};
use parc_db::repositories::{SessionRepo, UserRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::auth::jwt::{generate_access_token, generate_refresh_token, hash_refresh_token};
use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::error::{AppError, AppResult};
use crate::extract::AppJson;
use crate::middleware::auth::CurrentUser;
use crate::state::AppState;

/// Minimum password length enforced on registration.
const MIN_PASSWORD_LENGTH: usize = 12;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub last_name: String,
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Request body for `POST /auth/refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

fn invalid_credentials() -> AppError {
    AppError::Core(CoreError::Unauthorized {
        code: "INVALID_CREDENTIALS",
        message: "Invalid email or password".to_string(),
    })
}

fn account_deactivated() -> AppError {
    AppError::Core(CoreError::Unauthorized {
        code: "ACCOUNT_DEACTIVATED",
        message: "Account is deactivated".to_string(),
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
///
/// Open registration always creates a `viewer` account; privileged roles
/// are granted by an admin afterwards. Duplicate emails surface as 409
/// via the unique-constraint classifier.
pub async fn register(
    State(state): State<AppState>,
    AppJson(input): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    input.validate()?;
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let hashed = hash_password(&input.password)
        .map_err(|e| AppError::Internal(format!("Password hashing error: {e}")))?;

    let create_dto = CreateUser {
        email: input.email,
        password_hash: hashed,
        first_name: input.first_name,
        last_name: input.last_name,
        role: Role::Viewer.as_str().to_string(),
    };

    let user = UserRepo::create(&state.pool, &create_dto).await?;
    Ok((StatusCode::CREATED, Json(user.to_response())))
}

/// POST /api/auth/login
///
/// Authenticate with email + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    AppJson(input): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = UserRepo::find_by_email(&state.pool, &input.email)
        .await?
        .ok_or_else(invalid_credentials)?;

    if !user.is_active {
        return Err(account_deactivated());
    }

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid_credentials());
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let response = create_auth_response(&state, user.id).await?;
    Ok(Json(response))
}

/// POST /api/auth/refresh
///
/// Exchange a valid refresh token for new access + refresh tokens.
/// The presented token's session is revoked (rotation).
pub async fn refresh(
    State(state): State<AppState>,
    AppJson(input): AppJson<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let token_hash = hash_refresh_token(&input.refresh_token);

    let session = SessionRepo::find_valid_by_token_hash(&state.pool, &token_hash)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized {
                code: "UNAUTHORIZED",
                message: "Invalid or expired refresh token".to_string(),
            })
        })?;

    SessionRepo::revoke(&state.pool, session.id).await?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized {
                code: "UNAUTHORIZED",
                message: "User no longer exists".to_string(),
            })
        })?;

    if !user.is_active {
        return Err(account_deactivated());
    }

    let response = create_auth_response(&state, user.id).await?;
    Ok(Json(response))
}

/// POST /api/auth/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> AppResult<StatusCode> {
    SessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/profile
///
/// Return the authenticated user's own record.
pub async fn profile(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<UserResponse>> {
    let row = UserRepo::find_by_id(&state.pool, user.id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;
    Ok(Json(row.to_response()))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate access + refresh tokens, persist a session row, and build the
/// response from the user's current record.
async fn create_auth_response(state: &AppState, user_id: DbId) -> AppResult<AuthResponse> {
    let user = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "User" }))?;

    let access_token = generate_access_token(user.id, &user.role, &state.config.jwt)
        .map_err(|e| AppError::Internal(format!("Token generation error: {e}")))?;

    let (refresh_plaintext, refresh_hash) = generate_refresh_token();

    let expires_at = Utc::now() + chrono::Duration::days(state.config.jwt.refresh_token_expiry_days);
    let session_input = CreateSession {
        user_id: user.id,
        refresh_token_hash: refresh_hash,
        expires_at,
    };
    SessionRepo::create(&state.pool, &session_input).await?;

    let expires_in = state.config.jwt.access_token_expiry_mins * 60;

    Ok(AuthResponse {
        access_token,
        refresh_token: refresh_plaintext,
        expires_in,
        user: user.to_response(),
    })
}
