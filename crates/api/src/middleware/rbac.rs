//! Role-gate extractors.
//!
//! Each wraps [`CurrentUser`] and rejects requests whose role is outside
//! the allow-list. Use these in handlers to enforce authorization at the
//! type level.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parc_core::error::CoreError;
use parc_core::roles::Role;

use super::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires any authenticated, active user.
///
/// Functionally equivalent to [`CurrentUser`] but named explicitly so
/// route handlers read as "this endpoint requires authentication".
pub struct RequireAuth(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Requires a staff role (admin, engineering, or maintenance).
/// Rejects with 403 Forbidden otherwise.
pub struct RequireStaff(pub CurrentUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.role.is_staff() {
            return Err(AppError::Core(CoreError::forbidden(
                "Staff role required",
            )));
        }
        Ok(RequireStaff(user))
    }
}

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if user.role != Role::Admin {
            return Err(AppError::Core(CoreError::forbidden(
                "Admin role required",
            )));
        }
        Ok(RequireAdmin(user))
    }
}
