//! # Money
//!
//! Prices and totals are whole cents in an `i64`. A sale's stored total is
//! compared exactly against the sum of its lines, which only works without
//! floating point:
//!
//! ```text
//! REAL   3 × 0.10 = 0.30000000000000004   ≠ 0.30
//! cents  3 × 10   = 30                    == 30
//! ```
//!
//! ```rust
//! use tally_core::money::Money;
//!
//! let coffee = Money::from_cents(500);
//! let milk = Money::from_cents(299);
//! let total: Money = [coffee.multiply_quantity(3), milk.multiply_quantity(2)]
//!     .into_iter()
//!     .sum();
//! assert_eq!(total.to_string(), "20.98");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use ts_rs::TS;

/// An amount in cents.
///
/// ```text
/// Product.unit_price_cents ──copy──► SaleLineItem.unit_price_cents
///                                           │ × quantity
///                                           ▼
///                                      line total ──Σ──► Sale.total_cents
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Line total for `quantity` units at this unit price.
    #[inline]
    pub const fn multiply_quantity(&self, quantity: i64) -> Self {
        Money(self.0 * quantity)
    }
}

/// Two decimals, no currency symbol: `15.00`, `0.07`, `-5.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}
