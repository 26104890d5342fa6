//! The module contains the errors the engine can return.
//!
//! Business rule errors ([`Validation`], [`NotFound`], [`Forbidden`],
//! [`TypeMismatch`]) are always raised before anything is written. Only
//! [`Database`] can happen while a unit of work is open, and the unit of work
//! is rolled back when it does.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`TypeMismatch`]: EngineError::TypeMismatch
//!  [`Database`]: EngineError::Database
use sea_orm::DbErr;
use thiserror::Error;

use crate::TransactionKind;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("transaction type ({transaction}) does not match category type ({category})")]
    TypeMismatch {
        transaction: TransactionKind,
        category: TransactionKind,
    },
    /// A concurrent writer changed the row between read and write. Retried
    /// internally, never returned by the public API.
    #[error("Concurrent update on {0}")]
    ConflictRetryable(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Stable, machine readable code for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Forbidden(_) => "forbidden",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ConflictRetryable(_) | Self::Conflict(_) | Self::ExistingKey(_) => "conflict",
            Self::Database(_) => "storage_failure",
        }
    }

    pub(crate) fn not_found(entity: &str) -> Self {
        Self::NotFound(entity.to_string())
    }

    /// Whether the failed unit of work can be attempted again as-is.
    pub(crate) fn is_retryable(&self) -> bool {
        match self {
            Self::ConflictRetryable(_) => true,
            Self::Database(err) => is_busy(err),
            _ => false,
        }
    }
}

/// SQLite reports lock contention as `SQLITE_BUSY` / `SQLITE_LOCKED`.
fn is_busy(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("database is locked")
        || msg.contains("database table is locked")
        || msg.contains("SQLITE_BUSY")
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (
                Self::TypeMismatch {
                    transaction: ta,
                    category: ca,
                },
                Self::TypeMismatch {
                    transaction: tb,
                    category: cb,
                },
            ) => ta == tb && ca == cb,
            (Self::ConflictRetryable(a), Self::ConflictRetryable(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
