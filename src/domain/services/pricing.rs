//! # Weight-Banded Pricing
//!
//! Resolves a service's unit price for a pet of a given weight.
//!
//! A service carries an ordered list of [`PriceRule`]s, each mapping an
//! inclusive weight band to a fixed price. Rule sets are expected to be
//! weight-partitioned (at most one rule per weight). When they are not, the
//! first matching rule in input order wins; the overlap is logged and can be
//! audited with [`overlapping_rules`]. Rules are never re-sorted.
//!
//! # Examples
//!
//! ```
//! use petspot_core::domain::services::pricing::{PriceRule, resolve_price};
//! use petspot_core::domain::value_objects::Money;
//! use rust_decimal::Decimal;
//!
//! let rules = vec![
//!     PriceRule::new(Decimal::new(0, 0), Decimal::new(10, 0), Money::from_minor(2000)),
//!     PriceRule::new(Decimal::new(10, 0), Decimal::new(30, 0), Money::from_minor(3500)),
//! ];
//! let price = resolve_price(Money::from_minor(5000), &rules, Decimal::new(125, 1));
//! assert_eq!(price, Money::from_minor(3500));
//! ```

use crate::domain::value_objects::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A weight band mapped to a fixed price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRule {
    /// Lower bound in kilograms, inclusive.
    min_weight: Decimal,
    /// Upper bound in kilograms, inclusive.
    max_weight: Decimal,
    price: Money,
}

impl PriceRule {
    /// Creates a rule for the inclusive band `[min_weight, max_weight]`.
    ///
    /// A band with `min_weight > max_weight` is accepted and matches nothing.
    #[must_use]
    pub fn new(min_weight: Decimal, max_weight: Decimal, price: Money) -> Self {
        Self {
            min_weight,
            max_weight,
            price,
        }
    }

    /// Returns the lower bound.
    #[inline]
    #[must_use]
    pub fn min_weight(&self) -> Decimal {
        self.min_weight
    }

    /// Returns the upper bound.
    #[inline]
    #[must_use]
    pub fn max_weight(&self) -> Decimal {
        self.max_weight
    }

    /// Returns the price for this band.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns true if `weight` falls inside the band, bounds included.
    #[inline]
    #[must_use]
    pub fn matches(&self, weight: Decimal) -> bool {
        self.min_weight <= weight && weight <= self.max_weight
    }

    /// Returns true if the two bands share at least one weight.
    #[must_use]
    pub fn overlaps(&self, other: &PriceRule) -> bool {
        self.min_weight <= other.max_weight
            && other.min_weight <= self.max_weight
            && self.min_weight <= self.max_weight
            && other.min_weight <= other.max_weight
    }
}

impl fmt::Display for PriceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}kg..={}kg] => {}",
            self.min_weight, self.max_weight, self.price
        )
    }
}

/// Resolves the unit price for `weight`.
///
/// Returns the price of the first rule whose band contains `weight`, or
/// `base_price` when none does.
#[must_use]
pub fn resolve_price(base_price: Money, rules: &[PriceRule], weight: Decimal) -> Money {
    let mut matching = rules
        .iter()
        .enumerate()
        .filter(|(_, rule)| rule.matches(weight));

    let Some((first_index, first)) = matching.next() else {
        return base_price;
    };

    let shadowed: Vec<usize> = matching.map(|(i, _)| i).collect();
    if !shadowed.is_empty() {
        tracing::warn!(
            weight = %weight,
            applied_rule = first_index,
            shadowed_rules = ?shadowed,
            "price rules overlap; first rule in input order applied"
        );
    }

    first.price()
}

/// Returns every pair of rule indices `(i, j)`, `i < j`, whose bands overlap.
///
/// An empty result means the rule set is weight-partitioned.
#[must_use]
pub fn overlapping_rules(rules: &[PriceRule]) -> Vec<(usize, usize)> {
    rules
        .iter()
        .enumerate()
        .flat_map(|(i, a)| {
            rules
                .iter()
                .enumerate()
                .skip(i + 1)
                .filter(move |(_, b)| a.overlaps(b))
                .map(move |(j, _)| (i, j))
        })
        .collect()
}
