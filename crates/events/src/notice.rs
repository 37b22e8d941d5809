use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use kontos_core::AccountId;

/// Notification that a ledger mutation for one account was durably committed.
///
/// Published strictly after the storage commit returns success. Delivery is
/// at-least-once: consumers must re-derive state from the ledger rather than
/// apply deltas, so duplicates are harmless.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitNotice {
    account_id: AccountId,
    committed_at: DateTime<Utc>,
}

impl CommitNotice {
    pub fn new(account_id: AccountId) -> Self {
        Self {
            account_id,
            committed_at: Utc::now(),
        }
    }

    pub fn account_id(&self) -> AccountId {
        self.account_id
    }

    pub fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }
}
