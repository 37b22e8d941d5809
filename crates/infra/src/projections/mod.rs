//! Read-model builders.

pub mod account_summary;

pub use account_summary::{AccountSummary, AccountSummaryProjection, HistoryItem};
