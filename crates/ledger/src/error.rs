//! The module contains the errors the ledger can throw.
//!
//! Validation errors ([`InvalidAmount`], [`InvalidStatus`], [`InvalidPeriod`])
//! are caller mistakes; [`ConflictRetryExhausted`] means a concurrent update
//! won the race twice in a row and the caller should retry the request.
//!
//! [`InvalidAmount`]: LedgerError::InvalidAmount
//! [`InvalidStatus`]: LedgerError::InvalidStatus
//! [`InvalidPeriod`]: LedgerError::InvalidPeriod
//! [`ConflictRetryExhausted`]: LedgerError::ConflictRetryExhausted
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid status: {0}")]
    InvalidStatus(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Duplicate transaction: {0}")]
    DuplicateTransaction(String),
    #[error("Concurrent update conflict: {0}")]
    ConflictRetryExhausted(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidStatus(a), Self::InvalidStatus(b)) => a == b,
            (Self::InvalidPeriod(a), Self::InvalidPeriod(b)) => a == b,
            (Self::DuplicateTransaction(a), Self::DuplicateTransaction(b)) => a == b,
            (Self::ConflictRetryExhausted(a), Self::ConflictRetryExhausted(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
