//! Fixed-point monetary amounts.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Neg, Sub};
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A monetary amount carrying exactly two fractional digits.
///
/// Every constructor and arithmetic result is rounded half-to-even and
/// rescaled immediately, so rounding drift can never compound across steps
/// and `Display` always shows both fractional digits (`"47.00"`).
///
/// `Money` is signed: balances may legitimately go negative.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(#[serde(with = "rust_decimal::serde::str")] Decimal);

impl Money {
    /// Fractional digits carried by every amount.
    pub const SCALE: u32 = 2;

    pub fn zero() -> Self {
        Self::from_decimal(Decimal::ZERO)
    }

    /// Normalize an arbitrary decimal: round half-to-even to two digits.
    pub fn from_decimal(value: Decimal) -> Self {
        let mut normalized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointNearestEven);
        normalized.rescale(Self::SCALE);
        Self(normalized)
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    pub fn abs(&self) -> Self {
        Self(self.0.abs())
    }

    /// Multiply by a plain ratio (e.g. an interest rate), rounding the
    /// result half-to-even back to two digits.
    pub fn mul_ratio(&self, ratio: Decimal) -> Self {
        Self::from_decimal(self.0 * ratio)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::from_decimal(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::from_decimal(self.0 - rhs.0)
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money::from_decimal(-self.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::zero(), Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Money {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = Decimal::from_str(s)
            .map_err(|e| DomainError::validation(format!("malformed amount '{s}': {e}")))?;
        Ok(Self::from_decimal(value))
    }
}
