//! Account summary projection.
//!
//! Rebuilds the complete read model for one account from the write side on
//! every commit notice. The rebuild is a pure function of the account row
//! and its recent entries, so duplicate or delayed notices converge to the
//! same summary. Failures here never reach the write path; the next notice
//! re-derives whatever was missed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use kontos_core::{AccountId, UserId};
use kontos_events::CommitNotice;
use kontos_ledger::{EntryKind, LedgerEntry};

use crate::read_model::ViewStore;
use crate::store::{LedgerStore, StoreError};

/// Timestamp pattern used on history lines (UTC).
const TIMESTAMP_FORMAT: &str = "%d-%m-%Y %H:%M:%S";

/// One UI-ready history line. Values are pre-formatted strings; numeric
/// work stays on the write side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub label: String,
    pub amount: String,
    pub occurred_at: String,
}

/// Read-optimized snapshot of one account.
///
/// Fully derived and replaceable: rebuilt as a whole on every notice, never
/// patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    pub id: AccountId,
    pub user_id: UserId,
    pub balance: String,
    pub history: Vec<HistoryItem>,
    pub updated_at: DateTime<Utc>,
}

fn history_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::Deposit => "deposit",
        EntryKind::Payment => "withdrawal",
    }
}

fn history_item(entry: &LedgerEntry) -> HistoryItem {
    HistoryItem {
        label: history_label(entry.kind).to_string(),
        amount: entry.amount.to_string(),
        occurred_at: entry.occurred_at.format(TIMESTAMP_FORMAT).to_string(),
    }
}

/// Rebuilds summaries from the ledger and upserts them into the view store.
pub struct AccountSummaryProjection<S, V> {
    store: S,
    views: V,
    window: usize,
}

impl<S, V> AccountSummaryProjection<S, V>
where
    S: LedgerStore,
    V: ViewStore,
{
    /// `window` bounds how many recent entries a summary carries.
    pub fn new(store: S, views: V, window: usize) -> Self {
        Self {
            store,
            views,
            window,
        }
    }

    /// Handle one commit notice. Duplicates re-derive the same summary.
    pub fn on_notice(&self, notice: CommitNotice) -> Result<(), StoreError> {
        self.rebuild(notice.account_id())
    }

    /// Recompute and upsert the summary for `account_id`.
    ///
    /// An account that vanished between commit and processing is dropped
    /// rather than retried; the notice is treated as consumed.
    pub fn rebuild(&self, account_id: AccountId) -> Result<(), StoreError> {
        let account = match self.store.get_account(&account_id) {
            Ok(account) => account,
            Err(StoreError::AccountNotFound) => {
                debug!(%account_id, "dropping notice for unknown account");
                return Ok(());
            }
            Err(err) => return Err(err),
        };
        let entries = self.store.recent_entries(&account_id, self.window)?;

        // `updated_at` mirrors the row's commit stamp so that rebuilding an
        // unchanged account yields a byte-identical summary.
        let summary = AccountSummary {
            id: account_id,
            user_id: account.user_id(),
            balance: account.balance().to_string(),
            history: entries.iter().map(history_item).collect(),
            updated_at: account.updated_at(),
        };
        self.views.upsert(account_id, summary);
        Ok(())
    }
}
