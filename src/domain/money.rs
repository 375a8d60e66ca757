use crate::error::CheckoutError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-negative amount of money in whole currency units.
///
/// This is a wrapper around `rust_decimal::Decimal` so prices, discounts and
/// amounts due can never go below zero once constructed. Deserialization goes
/// through [`Amount::new`] and is validated the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    pub fn new(value: Decimal) -> Result<Self, CheckoutError> {
        if value >= Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(CheckoutError::ValidationError(
                "Amount must not be negative".to_string(),
            ))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Subtracts `rhs`, flooring the result at zero.
    pub fn saturating_sub(self, rhs: Self) -> Self {
        if rhs.0 >= self.0 {
            Self::ZERO
        } else {
            Self(self.0 - rhs.0)
        }
    }

    /// `pct` percent of this amount, rounded down to a whole currency unit.
    ///
    /// Negative percentages count as zero. Returns `None` when the product
    /// does not fit in a `Decimal`.
    pub fn percentage(self, pct: Decimal) -> Option<Self> {
        if pct <= Decimal::ZERO {
            return Some(Self::ZERO);
        }
        let raw = self.0.checked_mul(pct)?.checked_div(Decimal::ONE_HUNDRED)?;
        Some(Self(raw.floor()))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = CheckoutError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<u32> for Amount {
    fn from(units: u32) -> Self {
        Self(Decimal::from(units))
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0.normalize()
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}
