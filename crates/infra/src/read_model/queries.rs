//! Query side: reads only the view store.

use serde::Serialize;

use kontos_core::AccountId;

use crate::projections::HistoryItem;

use super::ViewStore;

/// Shape handed to callers. An account whose projection has not been built
/// yet reads as an empty summary rather than an error; that is a valid,
/// permanent answer until the first rebuild lands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryView {
    pub balance: String,
    pub history: Vec<HistoryItem>,
}

impl SummaryView {
    fn empty() -> Self {
        Self {
            balance: "0.00".to_string(),
            history: Vec::new(),
        }
    }
}

/// Read-only summary lookups.
///
/// Never blocks and never participates in write-side locks.
pub struct SummaryQueries<V> {
    views: V,
}

impl<V> SummaryQueries<V>
where
    V: ViewStore,
{
    pub fn new(views: V) -> Self {
        Self { views }
    }

    /// The stored summary verbatim, or the empty default.
    pub fn summary(&self, account_id: &AccountId) -> SummaryView {
        match self.views.get(account_id) {
            Some(view) => SummaryView {
                balance: view.balance,
                history: view.history,
            },
            None => SummaryView::empty(),
        }
    }
}
