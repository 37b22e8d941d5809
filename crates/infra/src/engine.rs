//! The ledger mutation engine.
//!
//! Orchestrates one mutation end to end: validate the amount, lock the
//! account row, decide the entries via the pure planning rules, commit
//! balance + entries atomically, and only then notify the projection
//! pipeline. Same-account mutations serialize on the row lock; different
//! accounts proceed in parallel.

use std::time::Duration;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use kontos_core::{AccountId, Money, UserId};
use kontos_events::{CommitNotice, NoticeBus};
use kontos_ledger::{
    Account, EntryKind, LedgerEntry, LedgerResult, plan_bill_payment, plan_deposit,
    validate_amount,
};

use crate::config::Config;
use crate::store::{AccountMutation, LedgerStore};

/// Write-side entry point: account opening, deposits and bill payments.
pub struct TransactionEngine<S, N> {
    store: S,
    notifier: N,
    lock_wait: Duration,
}

impl<S, N> TransactionEngine<S, N> {
    pub fn new(store: S, notifier: N, config: &Config) -> Self {
        Self {
            store,
            notifier,
            lock_wait: config.lock_wait(),
        }
    }
}

impl<S, N> TransactionEngine<S, N>
where
    S: LedgerStore,
    N: NoticeBus<CommitNotice>,
{
    /// Open a fresh zero-balance account owned by `user_id`.
    pub fn open_account(&self, user_id: UserId) -> LedgerResult<Account> {
        let account = Account::open(user_id);
        self.store.insert_account(account.clone())?;
        info!(account_id = %account.id(), %user_id, "account opened");
        Ok(account)
    }

    /// Credit `amount` to the account.
    ///
    /// On a negative balance the deposit first settles outstanding debt plus
    /// interest (recorded as one payment entry) and only the remainder is
    /// credited; the deposit itself is always recorded in full. Returns the
    /// new balance.
    pub fn deposit(&self, account_id: AccountId, amount: Decimal) -> LedgerResult<Money> {
        let amount = validate_amount(amount)?;

        let account =
            self.store
                .with_account_for_update(&account_id, self.lock_wait, &mut |current| {
                    let plan = plan_deposit(current.balance(), amount);
                    let mut entries = Vec::with_capacity(2);
                    if let Some(settlement) = plan.settlement {
                        debug!(
                            %account_id,
                            %settlement,
                            interest = %plan.interest_charged,
                            "settling outstanding debt"
                        );
                        entries.push(LedgerEntry::record(
                            account_id,
                            EntryKind::Payment,
                            settlement,
                        ));
                    }
                    entries.push(LedgerEntry::record(account_id, EntryKind::Deposit, amount));
                    AccountMutation {
                        new_balance: plan.new_balance,
                        entries,
                    }
                })?;

        self.notify(account_id);
        Ok(account.balance())
    }

    /// Debit `amount` unconditionally; the balance may go negative. Returns
    /// the new balance.
    pub fn pay_bill(&self, account_id: AccountId, amount: Decimal) -> LedgerResult<Money> {
        let amount = validate_amount(amount)?;

        let account =
            self.store
                .with_account_for_update(&account_id, self.lock_wait, &mut |current| {
                    AccountMutation {
                        new_balance: plan_bill_payment(current.balance(), amount),
                        entries: vec![LedgerEntry::record(account_id, EntryKind::Payment, amount)],
                    }
                })?;

        self.notify(account_id);
        Ok(account.balance())
    }

    /// Publish the commit notice strictly after the commit returned.
    ///
    /// A failed publish is logged, not propagated: the commit stands and the
    /// projection stays stale until the account is re-notified.
    fn notify(&self, account_id: AccountId) {
        if let Err(err) = self.notifier.publish(CommitNotice::new(account_id)) {
            warn!(%account_id, error = ?err, "commit notice lost");
        }
    }
}
