//! # Cart Aggregator
//!
//! Holds the priced line items of the current booking and the totals
//! derived from them.
//!
//! [`CartState`] is never mutated on its own: every mutation rebuilds it
//! from the item list with [`CartState::from_items`], under the same write
//! lock that changed the items. Readers therefore always see a fully
//! applied mutation. Each new state is also published on a
//! [`tokio::sync::watch`] channel for observers.
//!
//! # Examples
//!
//! ```
//! use petspot_core::application::services::cart::{AddItemOutcome, Cart};
//! use petspot_core::domain::entities::{Pet, ServiceDefinition};
//! use petspot_core::domain::value_objects::Money;
//! use rust_decimal::Decimal;
//!
//! let cart = Cart::new();
//! let pet = Pet::new("pet-1", "Rex");
//! let bath = ServiceDefinition::new("svc-bath", "Bath", Money::from_minor(1800), 45);
//!
//! let outcome = cart.add_item(&pet, &bath, Decimal::new(12, 0));
//! assert!(matches!(outcome, AddItemOutcome::Added(_)));
//! assert_eq!(cart.current_state().total_price(), Money::from_minor(1800));
//! ```

use crate::domain::entities::{CartItem, Pet, ServiceDefinition};
use crate::domain::value_objects::{CartItemId, Money, ServiceId};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Totals derived from the cart's items.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    items: Vec<CartItem>,
    total_duration_minutes: u64,
    total_price: Money,
    min_deposit: Money,
}

impl CartState {
    /// Reduces an item list to its derived totals.
    ///
    /// `min_deposit` is the largest deposit among items that require one,
    /// or zero when none does.
    #[must_use]
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_duration_minutes = items
            .iter()
            .map(|item| u64::from(item.duration_minutes()))
            .sum();
        let total_price = items.iter().map(CartItem::price).sum();
        let min_deposit = items
            .iter()
            .filter_map(CartItem::deposit)
            .max()
            .unwrap_or(Money::ZERO);

        Self {
            items,
            total_duration_minutes,
            total_price,
            min_deposit,
        }
    }

    /// Returns the items in insertion order.
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Returns the summed duration in minutes.
    #[inline]
    #[must_use]
    pub fn total_duration_minutes(&self) -> u64 {
        self.total_duration_minutes
    }

    /// Returns the summed price.
    #[inline]
    #[must_use]
    pub fn total_price(&self) -> Money {
        self.total_price
    }

    /// Returns the deposit that must be paid at checkout.
    #[inline]
    #[must_use]
    pub fn min_deposit(&self) -> Money {
        self.min_deposit
    }

    /// Returns true if the cart has no items.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Result of [`Cart::add_item`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum AddItemOutcome {
    /// The item was appended.
    Added(CartItem),
    /// The service has no stock left; the cart is unchanged.
    OutOfStock(ServiceId),
}

impl AddItemOutcome {
    /// Returns the added item, if any.
    #[must_use]
    pub fn item(&self) -> Option<&CartItem> {
        match self {
            Self::Added(item) => Some(item),
            Self::OutOfStock(_) => None,
        }
    }
}

#[derive(Debug)]
struct CartInner {
    state: RwLock<CartState>,
    updates: watch::Sender<CartState>,
}

/// Thread-safe cart aggregator.
///
/// Cloning a `Cart` yields another handle to the same cart.
#[derive(Debug, Clone)]
pub struct Cart {
    inner: Arc<CartInner>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub fn new() -> Self {
        let (updates, _) = watch::channel(CartState::default());
        Self {
            inner: Arc::new(CartInner {
                state: RwLock::new(CartState::default()),
                updates,
            }),
        }
    }

    /// Adds `service` for `pet`, priced for `weight_kg`.
    ///
    /// Rejected without any state change when the service has a defined
    /// stock count of zero or less.
    pub fn add_item(
        &self,
        pet: &Pet,
        service: &ServiceDefinition,
        weight_kg: Decimal,
    ) -> AddItemOutcome {
        if service.is_out_of_stock() {
            tracing::debug!(service_id = %service.id(), "cart add rejected: out of stock");
            return AddItemOutcome::OutOfStock(service.id().clone());
        }

        let item = CartItem::priced(pet, service, service.price_for(weight_kg));
        let added = item.clone();
        self.mutate(move |items| items.push(item));

        tracing::debug!(
            item_id = %added.id(),
            service_id = %added.service_id(),
            price = %added.price(),
            "cart item added"
        );
        AddItemOutcome::Added(added)
    }

    /// Removes the first item with `id`.
    ///
    /// Returns false, leaving the cart untouched, if no such item exists.
    pub fn remove_item(&self, id: CartItemId) -> bool {
        let mut removed = false;
        self.mutate(|items| {
            if let Some(position) = items.iter().position(|item| item.id() == id) {
                items.remove(position);
                removed = true;
            }
        });
        tracing::debug!(item_id = %id, removed, "cart item removal");
        removed
    }

    /// Removes every item.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
        tracing::debug!("cart cleared");
    }

    /// Returns a snapshot of the items and derived totals.
    #[must_use]
    pub fn current_state(&self) -> CartState {
        self.inner.state.read().clone()
    }

    /// Returns the number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.state.read().items.len()
    }

    /// Returns true if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Subscribes to state changes.
    ///
    /// The receiver starts at the current state and sees every later state
    /// in mutation order (intermediate states may be skipped by a slow
    /// reader, the latest is never lost).
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.inner.updates.subscribe()
    }

    /// Applies `change` to the items and rebuilds the derived state.
    fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut Vec<CartItem>),
    {
        let mut state = self.inner.state.write();
        let mut items = std::mem::take(&mut state.items);
        change(&mut items);
        *state = CartState::from_items(items);
        // Published while still holding the write lock so observers see
        // states in the same order as readers.
        self.inner.updates.send_replace(state.clone());
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::domain::services::pricing::PriceRule;

    fn rex() -> Pet {
        Pet::new("pet-rex", "Rex")
    }

    fn kg(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn grooming() -> ServiceDefinition {
        ServiceDefinition::new("svc-groom", "Grooming", Money::from_minor(5000), 90)
            .with_price_rules(vec![
                PriceRule::new(kg(0), kg(10), Money::from_minor(3000)),
                PriceRule::new(kg(11), kg(30), Money::from_minor(4500)),
            ])
            .with_deposit(Money::from_minor(1000))
    }

    fn vaccine() -> ServiceDefinition {
        ServiceDefinition::new("svc-vax", "Vaccine", Money::from_minor(2500), 15)
            .with_stock(4)
            .with_deposit(Money::from_minor(500))
    }

    #[test]
    fn out_of_stock_leaves_items_unchanged() {
        let cart = Cart::new();
        let _ = cart.add_item(&rex(), &grooming(), kg(8));
        let before = cart.current_state();

        let sold_out = vaccine().with_stock(0);
        let outcome = cart.add_item(&rex(), &sold_out, kg(8));

        assert_eq!(outcome, AddItemOutcome::OutOfStock(ServiceId::new("svc-vax")));
        assert_eq!(cart.current_state(), before);
    }

    #[test]
    fn totals_follow_add_and_remove() {
        let cart = Cart::new();
        let first = cart.add_item(&rex(), &grooming(), kg(20));
        let second = cart.add_item(&rex(), &vaccine(), kg(20));

        let first_price = first.item().unwrap().price();
        let second_price = second.item().unwrap().price();
        assert_eq!(first_price, Money::from_minor(4500));
        assert_eq!(second_price, Money::from_minor(2500));

        let state = cart.current_state();
        assert_eq!(state.total_price(), Money::from_minor(7000));
        assert_eq!(state.total_duration_minutes(), 105);
        assert_eq!(state.min_deposit(), Money::from_minor(1000));

        assert!(cart.remove_item(first.item().unwrap().id()));
        let state = cart.current_state();
        assert_eq!(state.total_price(), second_price);
        assert_eq!(state.items().len(), 1);
        assert_eq!(state.min_deposit(), Money::from_minor(500));
    }

    #[test]
    fn removing_unknown_item_is_noop() {
        let cart = Cart::new();
        let _ = cart.add_item(&rex(), &vaccine(), kg(3));
        let before = cart.current_state();

        assert!(!cart.remove_item(CartItemId::new_v4()));
        assert_eq!(cart.current_state(), before);
    }

    #[test]
    fn clear_resets_totals() {
        let cart = Cart::new();
        let _ = cart.add_item(&rex(), &grooming(), kg(3));
        let _ = cart.add_item(&rex(), &vaccine(), kg(3));
        cart.clear();

        let state = cart.current_state();
        assert!(state.is_empty());
        assert_eq!(state.total_price(), Money::ZERO);
        assert_eq!(state.total_duration_minutes(), 0);
        assert_eq!(state.min_deposit(), Money::ZERO);
        assert!(cart.is_empty());
    }

    #[test]
    fn no_deposit_means_zero() {
        let cart = Cart::new();
        let plain = ServiceDefinition::new("svc-nail", "Nail trim", Money::from_minor(900), 10);
        let _ = cart.add_item(&rex(), &plain, kg(3));
        assert_eq!(cart.current_state().min_deposit(), Money::ZERO);
    }

    #[test]
    fn item_ids_are_unique() {
        let cart = Cart::new();
        let a = cart.add_item(&rex(), &vaccine(), kg(3));
        let b = cart.add_item(&rex(), &vaccine(), kg(3));
        assert_ne!(a.item().unwrap().id(), b.item().unwrap().id());
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn state_is_pure_reduction_of_items() {
        let cart = Cart::new();
        let _ = cart.add_item(&rex(), &grooming(), kg(25));
        let _ = cart.add_item(&rex(), &vaccine(), kg(25));
        let state = cart.current_state();
        assert_eq!(state, CartState::from_items(state.items().to_vec()));
    }

    #[tokio::test]
    async fn subscribers_see_latest_state() {
        let cart = Cart::new();
        let mut updates = cart.subscribe();

        let added = cart.add_item(&rex(), &vaccine(), kg(3));
        updates.changed().await.unwrap();
        assert_eq!(updates.borrow_and_update().items().len(), 1);

        cart.remove_item(added.item().unwrap().id());
        updates.changed().await.unwrap();
        assert!(updates.borrow().is_empty());
    }

    #[test]
    fn concurrent_adds_are_all_applied() {
        let cart = Cart::new();
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cart = cart.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        let _ = cart.add_item(&rex(), &vaccine(), kg(3));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let state = cart.current_state();
        assert_eq!(state.items().len(), 200);
        assert_eq!(state.total_price(), Money::from_minor(200 * 2500));
    }
}
