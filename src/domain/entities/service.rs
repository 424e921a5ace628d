//! # Service Definitions
//!
//! A bookable service with a base price, weight-banded price rules and
//! optional stock and deposit requirements.

use crate::domain::services::pricing::{PriceRule, resolve_price};
use crate::domain::value_objects::{Money, ServiceId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDefinition {
    id: ServiceId,
    name: String,
    base_price: Money,
    #[serde(default)]
    price_rules: Vec<PriceRule>,
    duration_minutes: u32,
    #[serde(default)]
    stock: Option<i64>,
    #[serde(default)]
    deposit: Option<Money>,
}

impl ServiceDefinition {
    /// Creates a service with no price rules, no stock limit and no deposit.
    #[must_use]
    pub fn new(
        id: impl Into<ServiceId>,
        name: impl Into<String>,
        base_price: Money,
        duration_minutes: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_price,
            price_rules: Vec::new(),
            duration_minutes,
            stock: None,
            deposit: None,
        }
    }

    /// Sets the weight-banded price rules. Input order is kept.
    #[must_use]
    pub fn with_price_rules(mut self, rules: Vec<PriceRule>) -> Self {
        self.price_rules = rules;
        self
    }

    /// Sets a defined stock count.
    #[must_use]
    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    /// Sets the deposit required to book this service.
    #[must_use]
    pub fn with_deposit(mut self, deposit: Money) -> Self {
        self.deposit = Some(deposit);
        self
    }

    /// Returns the service ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ServiceId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the base price used when no rule matches.
    #[inline]
    #[must_use]
    pub fn base_price(&self) -> Money {
        self.base_price
    }

    /// Returns the price rules in input order.
    #[inline]
    #[must_use]
    pub fn price_rules(&self) -> &[PriceRule] {
        &self.price_rules
    }

    /// Returns the duration in minutes.
    #[inline]
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Returns the stock count, if the service tracks one.
    #[inline]
    #[must_use]
    pub fn stock(&self) -> Option<i64> {
        self.stock
    }

    /// Returns the deposit requirement, if any.
    #[inline]
    #[must_use]
    pub fn deposit(&self) -> Option<Money> {
        self.deposit
    }

    /// Returns true if the service has a defined stock count of zero or less.
    ///
    /// Services without a stock count are never out of stock.
    #[must_use]
    pub fn is_out_of_stock(&self) -> bool {
        self.stock.is_some_and(|s| s <= 0)
    }

    /// Resolves the unit price for a pet of the given weight.
    #[must_use]
    pub fn price_for(&self, weight_kg: Decimal) -> Money {
        resolve_price(self.base_price, &self.price_rules, weight_kg)
    }
}
