use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kontos_core::{AccountId, Entity, Money, UserId};

/// Bank account row (write model).
///
/// Holds the numeric balance (which may be negative) and the owning user.
/// Mutated only by the transaction engine while the row lock is held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    id: AccountId,
    user_id: UserId,
    balance: Money,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Account {
    /// Open a fresh account for `user_id` with a zero balance.
    ///
    /// Identifier and defaults are assigned here, before the row is handed
    /// to any store.
    pub fn open(user_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            user_id,
            balance: Money::zero(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Commit hook used by stores: replace the balance and stamp the row.
    pub fn apply_balance(&mut self, new_balance: Money, at: DateTime<Utc>) {
        self.balance = new_balance;
        self.updated_at = at;
    }
}

impl Entity for Account {
    type Id = AccountId;

    fn id(&self) -> &AccountId {
        &self.id
    }
}
