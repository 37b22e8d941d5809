use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use kontos_core::{AccountId, Money, UserId};
use kontos_ledger::{Account, LedgerEntry, LedgerError};

/// A balance transition plus the entries that must land with it.
///
/// Applied while the row lock is still held: either the balance update and
/// every entry commit together, or nothing does.
#[derive(Debug, Clone)]
pub struct AccountMutation {
    pub new_balance: Money,
    pub entries: Vec<LedgerEntry>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("account not found")]
    AccountNotFound,

    #[error("an account already exists for this user or id")]
    DuplicateAccount,

    /// Another mutation held the row lock for longer than the caller was
    /// willing to wait.
    #[error("timed out waiting for the account row lock")]
    LockTimeout,
}

impl From<StoreError> for LedgerError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::AccountNotFound => LedgerError::AccountNotFound,
            StoreError::LockTimeout => LedgerError::LockTimeout,
            StoreError::DuplicateAccount => LedgerError::storage("an account already exists"),
        }
    }
}

/// Write-side store contract: lock-and-fetch plus atomic commit.
///
/// The in-memory implementation backs tests and single-process deployments;
/// a database-backed implementation would map `with_account_for_update` to a
/// row lock (select-for-update) inside a transaction.
pub trait LedgerStore: Send + Sync {
    /// Insert a freshly opened account. At most one account per user.
    fn insert_account(&self, account: Account) -> Result<(), StoreError>;

    /// Point read of the current account row.
    fn get_account(&self, id: &AccountId) -> Result<Account, StoreError>;

    /// Resolve the account owned by `user_id`.
    fn find_account_by_user(&self, user_id: &UserId) -> Result<Account, StoreError>;

    /// Exclusive read-for-update on one account row.
    ///
    /// Acquires the row lock (blocking up to `wait`), runs `decide` against
    /// the current row and commits the returned mutation before the lock is
    /// released. Returns the committed row.
    fn with_account_for_update(
        &self,
        id: &AccountId,
        wait: Duration,
        decide: &mut dyn FnMut(&Account) -> AccountMutation,
    ) -> Result<Account, StoreError>;

    /// The most recent `limit` entries for an account, newest first.
    fn recent_entries(&self, id: &AccountId, limit: usize)
    -> Result<Vec<LedgerEntry>, StoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        (**self).insert_account(account)
    }

    fn get_account(&self, id: &AccountId) -> Result<Account, StoreError> {
        (**self).get_account(id)
    }

    fn find_account_by_user(&self, user_id: &UserId) -> Result<Account, StoreError> {
        (**self).find_account_by_user(user_id)
    }

    fn with_account_for_update(
        &self,
        id: &AccountId,
        wait: Duration,
        decide: &mut dyn FnMut(&Account) -> AccountMutation,
    ) -> Result<Account, StoreError> {
        (**self).with_account_for_update(id, wait, decide)
    }

    fn recent_entries(
        &self,
        id: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        (**self).recent_entries(id, limit)
    }
}
