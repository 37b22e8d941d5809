//! Write-side storage: account rows with their append-only entry logs.

mod in_memory;
mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use r#trait::{AccountMutation, LedgerStore, StoreError};
