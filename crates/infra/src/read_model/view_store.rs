//! Keyed storage for account summaries (replace-on-write).

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use kontos_core::AccountId;

use crate::projections::AccountSummary;

/// Key-value store for summaries: point lookup plus full-overwrite upsert.
/// There is deliberately no partial update.
pub trait ViewStore: Send + Sync {
    fn get(&self, id: &AccountId) -> Option<AccountSummary>;

    fn upsert(&self, id: AccountId, summary: AccountSummary);
}

impl<V> ViewStore for Arc<V>
where
    V: ViewStore + ?Sized,
{
    fn get(&self, id: &AccountId) -> Option<AccountSummary> {
        (**self).get(id)
    }

    fn upsert(&self, id: AccountId, summary: AccountSummary) {
        (**self).upsert(id, summary)
    }
}

/// In-memory view store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryViewStore {
    inner: RwLock<HashMap<AccountId, AccountSummary>>,
}

impl InMemoryViewStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ViewStore for InMemoryViewStore {
    fn get(&self, id: &AccountId) -> Option<AccountSummary> {
        self.inner.read().get(id).cloned()
    }

    fn upsert(&self, id: AccountId, summary: AccountSummary) {
        self.inner.write().insert(id, summary);
    }
}
