//! Cross-cutting error types for Folio.
//!
//! Field-level validation failures live in [`crate::validation::FieldError`]
//! and authorization failures in [`crate::permission::PermissionError`].
//! Persistence errors are defined in `folio-db`, which also holds the
//! `ServiceError` that all of them converge into.

use std::fmt;

use thiserror::Error;

/// Stable category of any failure a Folio operation can report.
///
/// Callers branch on the kind rather than on error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingRequired,
    TypeMismatch,
    ConstraintViolation,
    DuplicateValue,
    UnknownField,
    NoPermission,
    InvalidTransition,
    NotFound,
    Conflict,
    Infrastructure,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingRequired => "missing_required",
            Self::TypeMismatch => "type_mismatch",
            Self::ConstraintViolation => "constraint_violation",
            Self::DuplicateValue => "duplicate_value",
            Self::UnknownField => "unknown_field",
            Self::NoPermission => "no_permission",
            Self::InvalidTransition => "invalid_transition",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Infrastructure => "infrastructure",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be raised by any Folio crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A workflow transition was attempted that the transition table does not
    /// permit for the caller's role.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to} (role {role})")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
        role: String,
    },

    /// The operation clashes with existing state (published entry, type still
    /// holding entries, duplicate name).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Data failed validation (definition constraints, malformed input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub fn not_found(entity_type: &str, id: &str) -> Self {
        Self::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::Validation(_) => ErrorKind::ConstraintViolation,
            Self::Other(_) => ErrorKind::Infrastructure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_from_variants() {
        assert_eq!(
            CoreError::not_found("entry", "ent-1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            CoreError::Conflict("x".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            CoreError::Other(anyhow::anyhow!("io")).kind(),
            ErrorKind::Infrastructure
        );
    }

    #[test]
    fn transition_message_names_role() {
        let err = CoreError::InvalidTransition {
            entity_type: "entry".into(),
            id: "ent-1".into(),
            from: "draft".into(),
            to: "published".into(),
            role: "viewer".into(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid state transition: entry ent-1 from draft to published (role viewer)"
        );
    }
}
