//! # Database Error Types
//!
//! ```text
//! sqlx::Error ──From──► DbError ─────────────┐
//!                                            ├──► LedgerError ──► caller
//! ValidationError ──► CoreError ─────────────┘
//!                     (rule refused)     Store(DbError) | Rejected(CoreError)
//! ```
//!
//! A caller that only needs to know "was my input wrong, or is the store
//! broken?" asks [`LedgerError::is_rejection`].

use sqlx::error::ErrorKind;
use tally_core::{CoreError, ValidationError};
use thiserror::Error;

/// Store failures.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A row still references the one being removed, or points at a
    /// missing one. The ledger and repositories check these first, so
    /// seeing one here means a write bypassed them.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// A CHECK constraint fired, e.g. stock driven below zero.
    #[error("Constraint violation: {0}")]
    CheckViolation(String),

    #[error("Duplicate value: {0}")]
    UniqueViolation(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Timed out waiting for a database connection")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation(message),
                    ErrorKind::CheckViolation => DbError::CheckViolation(message),
                    ErrorKind::UniqueViolation => DbError::UniqueViolation(message),
                    _ => DbError::QueryFailed(message),
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool is closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),

            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

// =============================================================================
// Ledger Error
// =============================================================================

/// Failure of a ledger operation or a guarded catalog write.
///
/// Either way, nothing the operation wrote is left behind: the
/// transaction is rolled back before the error reaches the caller.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// A business rule refused the operation.
    #[error(transparent)]
    Rejected(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] DbError),
}

impl LedgerError {
    /// True when the caller's input was at fault rather than the store.
    pub fn is_rejection(&self) -> bool {
        matches!(self, LedgerError::Rejected(_))
    }
}

impl From<sqlx::Error> for LedgerError {
    fn from(err: sqlx::Error) -> Self {
        LedgerError::Store(err.into())
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::Rejected(err.into())
    }
}

pub type LedgerResult<T> = Result<T, LedgerError>;
