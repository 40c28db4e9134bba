//! Error types for folio-db.
//!
//! `DatabaseError` covers storage failures. `ServiceError` is what service
//! operations return: it joins validation, permission, domain and storage
//! errors so callers can branch on [`ServiceError::kind`].

use folio_core::errors::{CoreError, ErrorKind};
use folio_core::permission::PermissionError;
use folio_core::validation::FieldError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from service operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Permission(#[from] PermissionError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

impl From<libsql::Error> for ServiceError {
    fn from(e: libsql::Error) -> Self {
        Self::Database(DatabaseError::LibSql(e))
    }
}

impl ServiceError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Field(e) => e.kind(),
            Self::Permission(e) => e.kind(),
            Self::Core(e) => e.kind(),
            Self::Database(_) => ErrorKind::Infrastructure,
        }
    }

    pub(crate) fn not_found(entity_type: &str, id: &str) -> Self {
        Self::Core(CoreError::not_found(entity_type, id))
    }

    pub(crate) fn conflict(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Conflict(message.into()))
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Core(CoreError::Validation(message.into()))
    }
}

/// Turn a missing row into `NotFound` for the named entity; other storage
/// errors pass through.
pub(crate) fn or_not_found(entity_type: &'static str, id: &str) -> impl FnOnce(DatabaseError) -> ServiceError {
    let id = id.to_string();
    move |e| match e {
        DatabaseError::NoResult => ServiceError::not_found(entity_type, &id),
        other => ServiceError::Database(other),
    }
}
