//! JWT-based authentication extractor for Axum handlers.
//!
//! The extractor walks the bearer-token state machine and resolves the
//! subject against the database, so downstream handlers always see a
//! live, active identity:
//!
//! - header absent               -> 401 `NO_TOKEN`
//! - malformed / bad signature   -> 401 `TOKEN_INVALID`
//! - expired                     -> 401 `TOKEN_EXPIRED`
//! - subject missing             -> 401 `UNAUTHORIZED`
//! - subject inactive            -> 401 `ACCOUNT_DEACTIVATED`

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parc_core::error::CoreError;
use parc_core::roles::Role;
use parc_core::types::DbId;
use parc_db::repositories::UserRepo;

use crate::auth::jwt::{validate_token, TokenError};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated identity resolved from a JWT Bearer token.
///
/// Use this as an extractor parameter in any handler that requires
/// authentication; prefer the role-gate wrappers in
/// [`rbac`](crate::middleware::rbac) when a minimum role is required.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// The user's internal database id (from `claims.sub`).
    pub id: DbId,
    pub email: String,
    pub role: Role,
}

fn unauthorized(code: &'static str, message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized {
        code,
        message: message.to_string(),
    })
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("NO_TOKEN", "Missing Authorization header"))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            unauthorized(
                "TOKEN_INVALID",
                "Invalid Authorization format. Expected: Bearer <token>",
            )
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|e| match e {
            TokenError::Expired => unauthorized("TOKEN_EXPIRED", "Token has expired"),
            TokenError::Invalid => unauthorized("TOKEN_INVALID", "Invalid token"),
        })?;

        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| unauthorized("UNAUTHORIZED", "User no longer exists"))?;

        if !user.is_active {
            return Err(unauthorized("ACCOUNT_DEACTIVATED", "Account is deactivated"));
        }

        let role = user.role.parse::<Role>().map_err(|_| {
            AppError::Internal(format!("Unknown role '{}' on user {}", user.role, user.id))
        })?;

        Ok(CurrentUser {
            id: user.id,
            email: user.email,
            role,
        })
    }
}
