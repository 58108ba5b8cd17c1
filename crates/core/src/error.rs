use crate::schema::FieldError;

/// Domain-level error type.
///
/// Variants that need a machine-readable subtype (auth failures,
/// conflict flavours) carry a stable `code` string that the HTTP layer
/// forwards verbatim in the response envelope.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} record not found")]
    NotFound { entity: &'static str },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Validation failed on {} field(s)", .0.len())]
    FieldValidation(Vec<FieldError>),

    #[error("{message}")]
    Conflict { code: &'static str, message: String },

    #[error("{message}")]
    Unauthorized { code: &'static str, message: String },

    #[error("Forbidden: {message}")]
    Forbidden { code: &'static str, message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a plain `CONFLICT` with no specialized code.
    pub fn conflict(message: impl Into<String>) -> Self {
        CoreError::Conflict {
            code: "CONFLICT",
            message: message.into(),
        }
    }

    /// Shorthand for a plain `FORBIDDEN` with no specialized code.
    pub fn forbidden(message: impl Into<String>) -> Self {
        CoreError::Forbidden {
            code: "FORBIDDEN",
            message: message.into(),
        }
    }
}
