//! `kontos-ledger` — the write-model domain: accounts, immutable ledger
//! entries and the deposit/bill-payment decision rules.
//!
//! Everything here is pure: no IO, no locking, no clocks beyond entry
//! timestamps. Storage and orchestration live in `kontos-infra`.

pub mod account;
pub mod amount;
pub mod entry;
pub mod error;
pub mod settlement;

pub use account::Account;
pub use amount::validate_amount;
pub use entry::{EntryKind, LedgerEntry};
pub use error::{LedgerError, LedgerResult};
pub use settlement::{DepositPlan, plan_bill_payment, plan_deposit};
