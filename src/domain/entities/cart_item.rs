//! # Cart Items
//!
//! A priced line in the cart.
//!
//! Items are created only by the cart aggregator, which assigns a fresh
//! [`CartItemId`] and the price resolved for the pet's weight.

use crate::domain::entities::pet::Pet;
use crate::domain::entities::service::ServiceDefinition;
use crate::domain::value_objects::{CartItemId, Money, PetId, ServiceId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A priced line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    id: CartItemId,
    pet_id: PetId,
    pet_name: String,
    service_id: ServiceId,
    service_name: String,
    price: Money,
    duration_minutes: u32,
    deposit: Option<Money>,
    added_at: DateTime<Utc>,
}

impl CartItem {
    /// Builds an item for `pet` booking `service` at an already resolved price.
    #[must_use]
    pub(crate) fn priced(pet: &Pet, service: &ServiceDefinition, price: Money) -> Self {
        Self {
            id: CartItemId::new_v4(),
            pet_id: pet.id().clone(),
            pet_name: pet.name().to_string(),
            service_id: service.id().clone(),
            service_name: service.name().to_string(),
            price,
            duration_minutes: service.duration_minutes(),
            deposit: service.deposit(),
            added_at: Utc::now(),
        }
    }

    /// Returns the item ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> CartItemId {
        self.id
    }

    /// Returns the pet this item is booked for.
    #[inline]
    #[must_use]
    pub fn pet_id(&self) -> &PetId {
        &self.pet_id
    }

    /// Returns the pet's name at the time the item was added.
    #[inline]
    #[must_use]
    pub fn pet_name(&self) -> &str {
        &self.pet_name
    }

    /// Returns the booked service.
    #[inline]
    #[must_use]
    pub fn service_id(&self) -> &ServiceId {
        &self.service_id
    }

    /// Returns the service name at the time the item was added.
    #[inline]
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    /// Returns the resolved price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the duration in minutes.
    #[inline]
    #[must_use]
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    /// Returns the deposit requirement, if any.
    #[inline]
    #[must_use]
    pub fn deposit(&self) -> Option<Money> {
        self.deposit
    }

    /// Returns when the item was added.
    #[inline]
    #[must_use]
    pub fn added_at(&self) -> DateTime<Utc> {
        self.added_at
    }
}

impl fmt::Display for CartItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} for {} ({} min) {}",
            self.service_name, self.pet_name, self.duration_minutes, self.price
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn groom_for_rex() -> CartItem {
        let pet = Pet::new("pet-rex", "Rex");
        let service = ServiceDefinition::new("svc-groom", "Grooming", Money::from_minor(5000), 90)
            .with_deposit(Money::from_minor(1000));
        CartItem::priced(&pet, &service, Money::from_minor(4500))
    }

    #[test]
    fn priced_copies_pet_and_service_details() {
        let item = groom_for_rex();
        assert_eq!(item.pet_id().as_str(), "pet-rex");
        assert_eq!(item.service_id().as_str(), "svc-groom");
        assert_eq!(item.price(), Money::from_minor(4500));
        assert_eq!(item.duration_minutes(), 90);
        assert_eq!(item.deposit(), Some(Money::from_minor(1000)));
    }

    #[test]
    fn display_format() {
        assert_eq!(groom_for_rex().to_string(), "Grooming for Rex (90 min) 45.00");
    }

    #[test]
    fn serde_uses_camel_case_and_keeps_identity() {
        let item = groom_for_rex();
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["serviceName"], "Grooming");
        assert_eq!(json["durationMinutes"], 90);

        let back: CartItem = serde_json::from_value(json).unwrap();
        assert_eq!(back, item);
    }
}
