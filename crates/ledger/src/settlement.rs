//! Deposit and bill-payment decision rules.
//!
//! Pure functions: they look at the current balance and an already-validated
//! amount and produce the balance transition plus the debt-settlement split.
//! No IO, no clocks.

use rust_decimal::Decimal;

use kontos_core::Money;

/// Flat interest charged on the principal portion a deposit repays.
///
/// The basis is deliberately the repaid principal, not the full deposit nor
/// the outstanding debt.
fn interest_rate() -> Decimal {
    Decimal::new(2, 2) // 2%
}

/// Outcome of planning a deposit against the current balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositPlan {
    /// Combined principal + interest, recorded as a single debt-settlement
    /// payment entry. `None` when the balance was non-negative or nothing
    /// could be settled.
    pub settlement: Option<Money>,
    /// Interest actually collected; bounded by what the deposit had left
    /// after repaying principal.
    pub interest_charged: Money,
    /// Balance after the whole movement.
    pub new_balance: Money,
}

/// Plan a deposit of `amount` onto `balance`.
///
/// A deposit onto debt repays principal first, then collects interest out of
/// whatever the deposit has left; any residual is credited to the balance.
/// Every intermediate value is already rounded to two digits by `Money`.
pub fn plan_deposit(balance: Money, amount: Money) -> DepositPlan {
    if !balance.is_negative() {
        return DepositPlan {
            settlement: None,
            interest_charged: Money::zero(),
            new_balance: balance + amount,
        };
    }

    let debt = balance.abs();
    let principal = amount.min(debt);
    let mut remaining = amount - principal;

    let interest = principal.mul_ratio(interest_rate());
    let interest_charged = remaining.min(interest);
    remaining = remaining - interest_charged;

    let settlement = principal + interest_charged;
    DepositPlan {
        settlement: settlement.is_positive().then_some(settlement),
        interest_charged,
        new_balance: balance + principal + remaining,
    }
}

/// Bills always debit in full; the balance may go negative.
pub fn plan_bill_payment(balance: Money, amount: Money) -> Money {
    balance - amount
}
