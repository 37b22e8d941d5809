//! Failure taxonomy for ledger mutations.

use thiserror::Error;

/// Result type used across the ledger domain.
pub type LedgerResult<T> = Result<T, LedgerError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Non-positive or malformed amount. Rejected before any lock is taken;
    /// no side effects.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// No account is associated with the given identifier.
    #[error("account not found")]
    AccountNotFound,

    /// The account row lock could not be acquired in time. Transient; safe
    /// to retry.
    #[error("timed out waiting for the account lock")]
    LockTimeout,

    /// Storage-level failure outside the domain's control.
    #[error("storage failure: {0}")]
    Storage(String),
}

impl LedgerError {
    pub fn invalid_amount(msg: impl Into<String>) -> Self {
        Self::InvalidAmount(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}
