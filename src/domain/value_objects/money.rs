//! # Money
//!
//! Amounts in integer minor currency units (cents).
//!
//! Aggregation over cart lines must never fail, so sums saturate at the
//! `i64` bounds instead of overflowing.
//!
//! # Examples
//!
//! ```
//! use petspot_core::domain::value_objects::Money;
//!
//! let total: Money = [Money::from_minor(1500), Money::from_minor(250)].into_iter().sum();
//! assert_eq!(total.minor_units(), 1750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;

/// An amount in minor currency units.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[inline]
    #[must_use]
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// Returns the amount in minor units.
    #[inline]
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Adds two amounts, clamping at the numeric bounds.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Self::saturating_add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
