use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use kontos_core::{AccountId, UserId};
use kontos_ledger::{Account, LedgerEntry};

use super::{AccountMutation, LedgerStore, StoreError};

/// Account row plus its append-only entry log.
///
/// Both live under one row mutex so a balance update and its entries commit
/// together.
#[derive(Debug)]
struct AccountRow {
    account: Account,
    entries: Vec<LedgerEntry>,
}

/// In-memory write-side store.
///
/// Intended for tests/dev. Per-account serialization comes from one mutex per
/// row; the outer maps are only locked long enough to resolve the row handle,
/// so mutations on different accounts never contend.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    rows: RwLock<HashMap<AccountId, Arc<Mutex<AccountRow>>>>,
    by_user: RwLock<HashMap<UserId, AccountId>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, id: &AccountId) -> Result<Arc<Mutex<AccountRow>>, StoreError> {
        self.rows
            .read()
            .get(id)
            .cloned()
            .ok_or(StoreError::AccountNotFound)
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn insert_account(&self, account: Account) -> Result<(), StoreError> {
        let mut by_user = self.by_user.write();
        let mut rows = self.rows.write();

        let id = account.id();
        let user_id = account.user_id();
        if rows.contains_key(&id) || by_user.contains_key(&user_id) {
            return Err(StoreError::DuplicateAccount);
        }

        by_user.insert(user_id, id);
        rows.insert(
            id,
            Arc::new(Mutex::new(AccountRow {
                account,
                entries: Vec::new(),
            })),
        );
        Ok(())
    }

    fn get_account(&self, id: &AccountId) -> Result<Account, StoreError> {
        let row = self.row(id)?;
        let guard = row.lock();
        Ok(guard.account.clone())
    }

    fn find_account_by_user(&self, user_id: &UserId) -> Result<Account, StoreError> {
        let id = self
            .by_user
            .read()
            .get(user_id)
            .copied()
            .ok_or(StoreError::AccountNotFound)?;
        self.get_account(&id)
    }

    fn with_account_for_update(
        &self,
        id: &AccountId,
        wait: Duration,
        decide: &mut dyn FnMut(&Account) -> AccountMutation,
    ) -> Result<Account, StoreError> {
        let row = self.row(id)?;
        let mut guard = row.try_lock_for(wait).ok_or(StoreError::LockTimeout)?;

        let mutation = decide(&guard.account);
        guard.account.apply_balance(mutation.new_balance, Utc::now());
        guard.entries.extend(mutation.entries);

        Ok(guard.account.clone())
    }

    fn recent_entries(
        &self,
        id: &AccountId,
        limit: usize,
    ) -> Result<Vec<LedgerEntry>, StoreError> {
        let row = self.row(id)?;
        let guard = row.lock();
        // Append order is occurrence order, so newest-first is a reverse walk.
        Ok(guard.entries.iter().rev().take(limit).cloned().collect())
    }
}
