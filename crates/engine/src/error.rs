//! The module contains the errors the engine can throw.
//!
//! Every variant except [`Database`] is a local, recoverable condition:
//! a failed call leaves the ledger exactly as it was before the call.
//! [`ConcurrencyConflict`] is retryable; [`Database`] means the durable
//! store itself failed and the call must be treated as fatal.
//!
//! [`Database`]: EngineError::Database
//! [`ConcurrencyConflict`]: EngineError::ConcurrencyConflict
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Cross-class mismatch: {0}")]
    CrossClassMismatch(String),
    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),
    #[error("Insufficient points: {0}")]
    InsufficientPoints(String),
    #[error("Invalid shipping status transition: {0}")]
    InvalidShippingStatusTransition(String),
    #[error("Concurrency conflict, retry the call: {0}")]
    ConcurrencyConflict(String),
    #[error(transparent)]
    Database(DbErr),
}

impl From<DbErr> for EngineError {
    fn from(err: DbErr) -> Self {
        if is_lock_contention(&err) {
            return Self::ConcurrencyConflict(err.to_string());
        }
        Self::Database(err)
    }
}

/// SQLite reports an exceeded busy timeout as a "database is locked"
/// execution error. That failure mode is retryable and must not be
/// classified as a fatal storage error.
fn is_lock_contention(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (Self::CrossClassMismatch(a), Self::CrossClassMismatch(b)) => a == b,
            (Self::InsufficientStock(a), Self::InsufficientStock(b)) => a == b,
            (Self::InsufficientPoints(a), Self::InsufficientPoints(b)) => a == b,
            (Self::InvalidShippingStatusTransition(a), Self::InvalidShippingStatusTransition(b)) => {
                a == b
            }
            (Self::ConcurrencyConflict(a), Self::ConcurrencyConflict(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lock_contention_maps_to_conflict() {
        let err = EngineError::from(DbErr::Custom("database is locked".to_string()));
        assert!(matches!(err, EngineError::ConcurrencyConflict(_)));
    }

    #[test]
    fn other_db_errors_stay_fatal() {
        let err = EngineError::from(DbErr::Custom("disk I/O error".to_string()));
        assert!(matches!(err, EngineError::Database(_)));
    }
}
