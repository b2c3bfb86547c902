// Error taxonomy for the ticketing service
// Domain conditions travel as typed variants, everything else is Internal

use serde::Serialize;
use thiserror::Error;

/// Result type using SupportError.
pub type Result<T> = std::result::Result<T, SupportError>;

/// A single field that failed API-level validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Errors produced by the workflow and the registries.
#[derive(Debug, Error)]
pub enum SupportError {
    /// Caller supplied structurally insufficient data.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// One or more fields of an incoming body are invalid.
    #[error("validation failed: {}", join_fields(.0))]
    Validation(Vec<FieldError>),

    /// A referenced or targeted entity does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The write would break a uniqueness or reference constraint.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Anything not classified above. `message` is safe to show callers,
    /// `cause` is kept for diagnostics.
    #[error("{message}: {cause}")]
    Internal {
        message: String,
        cause: anyhow::Error,
    },
}

impl SupportError {
    pub fn internal(message: impl Into<String>, cause: anyhow::Error) -> Self {
        SupportError::Internal {
            message: message.into(),
            cause,
        }
    }
}

/// Builds a `map_err` adapter that wraps a store failure as `Internal`.
pub fn internal(message: &'static str) -> impl FnOnce(anyhow::Error) -> SupportError {
    move |cause| SupportError::internal(message, cause)
}

fn join_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_not_found_display_is_bare_message() {
        let err = SupportError::NotFound("client not found for id 7".to_string());
        assert_eq!(err.to_string(), "client not found for id 7");
    }

    #[test]
    fn test_internal_keeps_cause() {
        let err = internal("failed to create request")(anyhow!("disk I/O error"));
        let display = err.to_string();
        assert!(display.contains("failed to create request"));
        assert!(display.contains("disk I/O error"));
    }

    #[test]
    fn test_validation_display_lists_fields() {
        let err = SupportError::Validation(vec![
            FieldError::new("nombre", "must not be blank"),
            FieldError::new("correo", "is not a valid email address"),
        ]);
        let display = err.to_string();
        assert!(display.contains("nombre: must not be blank"));
        assert!(display.contains("correo: is not a valid email address"));
    }
}
