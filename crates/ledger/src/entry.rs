use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use kontos_core::{AccountId, Entity, EntryId, Money};

/// Kind of monetary movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Deposit,
    Payment,
}

/// One immutable monetary movement against an account.
///
/// Never updated or deleted once recorded. The amount is strictly positive;
/// the kind carries the sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub account_id: AccountId,
    pub kind: EntryKind,
    pub amount: Money,
    pub occurred_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Record a movement occurring now.
    pub fn record(account_id: AccountId, kind: EntryKind, amount: Money) -> Self {
        Self {
            id: EntryId::new(),
            account_id,
            kind,
            amount,
            occurred_at: Utc::now(),
        }
    }

    /// Deposits count positive, payments negative.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            EntryKind::Deposit => self.amount.as_decimal(),
            EntryKind::Payment => -self.amount.as_decimal(),
        }
    }
}

impl Entity for LedgerEntry {
    type Id = EntryId;

    fn id(&self) -> &EntryId {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_amount_follows_the_kind() {
        let account_id = AccountId::new();
        let amount: Money = "150.00".parse().unwrap();

        let deposit = LedgerEntry::record(account_id, EntryKind::Deposit, amount);
        let payment = LedgerEntry::record(account_id, EntryKind::Payment, amount);

        assert_eq!(deposit.signed_amount(), amount.as_decimal());
        assert_eq!(payment.signed_amount(), -amount.as_decimal());
    }
}
