//! Operator setup: migration coordinator and setup-token gate.
//!
//! Schema changes are applied from versioned migration files by the sqlx
//! migrator; the coordinator here only sequences operator-triggered runs.
//! Its state machine is `Idle -> Running -> Completed | Failed`, and the
//! start transition is a compare-and-set under one lock, so two
//! concurrent triggers can never both start a run.

use std::sync::Mutex;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use parc_core::error::CoreError;
use parc_core::types::Timestamp;
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Lifecycle of an operator-triggered migration run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MigrationState {
    Idle,
    Running {
        started_at: Timestamp,
    },
    Completed {
        started_at: Timestamp,
        finished_at: Timestamp,
    },
    Failed {
        started_at: Timestamp,
        finished_at: Timestamp,
        error: String,
    },
}

/// Sequences migration runs. Owned by [`AppState`] for the process lifetime.
#[derive(Debug)]
pub struct MigrationCoordinator {
    state: Mutex<MigrationState>,
}

impl Default for MigrationCoordinator {
    fn default() -> Self {
        MigrationCoordinator {
            state: Mutex::new(MigrationState::Idle),
        }
    }
}

impl MigrationCoordinator {
    /// Transition `Idle | Completed | Failed -> Running`.
    ///
    /// Returns a `MIGRATION_RUNNING` conflict if a run is already in
    /// flight; the check and the transition happen under the same lock.
    pub fn try_begin(&self) -> Result<(), CoreError> {
        let mut state = self.lock();
        if matches!(*state, MigrationState::Running { .. }) {
            return Err(CoreError::Conflict {
                code: "MIGRATION_RUNNING",
                message: "A migration is already running".to_string(),
            });
        }
        *state = MigrationState::Running {
            started_at: chrono::Utc::now(),
        };
        Ok(())
    }

    /// Transition `Running -> Completed`. No-op outside `Running`.
    pub fn complete(&self) {
        let mut state = self.lock();
        if let MigrationState::Running { started_at } = *state {
            *state = MigrationState::Completed {
                started_at,
                finished_at: chrono::Utc::now(),
            };
        }
    }

    /// Transition `Running -> Failed`. No-op outside `Running`.
    pub fn fail(&self, error: String) {
        let mut state = self.lock();
        if let MigrationState::Running { started_at } = *state {
            *state = MigrationState::Failed {
                started_at,
                finished_at: chrono::Utc::now(),
                error,
            };
        }
    }

    /// Current state, for the status endpoint.
    pub fn snapshot(&self) -> MigrationState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MigrationState> {
        // Transitions cannot panic while holding the lock; recover from
        // poisoning rather than propagating it.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

// ---------------------------------------------------------------------------
// Setup-token gate
// ---------------------------------------------------------------------------

/// Extractor gating operator endpoints behind the `SETUP_TOKEN` secret.
///
/// When no token is configured the endpoints are disabled outright; a
/// missing or mismatched `X-Setup-Token` header is rejected. These routes
/// must never be open HTTP surface.
pub struct SetupAccess;

impl FromRequestParts<AppState> for SetupAccess {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.setup_token.as_deref() else {
            return Err(AppError::Core(CoreError::Forbidden {
                code: "SETUP_DISABLED",
                message: "Setup endpoints are disabled; set SETUP_TOKEN to enable them"
                    .to_string(),
            }));
        };

        let provided = parts
            .headers
            .get("x-setup-token")
            .and_then(|v| v.to_str().ok());

        if provided != Some(expected) {
            return Err(AppError::Core(CoreError::Forbidden {
                code: "SETUP_TOKEN_INVALID",
                message: "Missing or invalid setup token".to_string(),
            }));
        }

        Ok(SetupAccess)
    }
}
