//! Amount validation shared by every mutating operation.

use rust_decimal::Decimal;

use kontos_core::Money;

use crate::error::{LedgerError, LedgerResult};

/// Normalize a raw amount to two digits (half-to-even) and require it to be
/// strictly positive afterwards.
pub fn validate_amount(raw: Decimal) -> LedgerResult<Money> {
    let amount = Money::from_decimal(raw);
    if !amount.is_positive() {
        return Err(LedgerError::invalid_amount(format!(
            "must be positive, got {amount}"
        )));
    }
    Ok(amount)
}
