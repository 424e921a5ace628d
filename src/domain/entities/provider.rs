//! # Providers
//!
//! Provider candidates and their offers, as returned by a nearby search.
//!
//! A [`ProviderCandidate`] is an immutable snapshot of one search response;
//! it has no lifecycle beyond that response.

use crate::domain::value_objects::{Coordinate, Money, OfferId, ProcedureId, ProviderId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A purchasable procedure at a given provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    id: OfferId,
    procedure_id: ProcedureId,
    name: String,
    price: Money,
    has_stock: bool,
}

impl Offer {
    /// Creates a new offer.
    #[must_use]
    pub fn new(
        id: impl Into<OfferId>,
        procedure_id: impl Into<ProcedureId>,
        name: impl Into<String>,
        price: Money,
        has_stock: bool,
    ) -> Self {
        Self {
            id: id.into(),
            procedure_id: procedure_id.into(),
            name: name.into(),
            price,
            has_stock,
        }
    }

    /// Returns the offer ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &OfferId {
        &self.id
    }

    /// Returns the procedure this offer is for.
    #[inline]
    #[must_use]
    pub fn procedure_id(&self) -> &ProcedureId {
        &self.procedure_id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns true if the offer is in stock.
    #[inline]
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.has_stock
    }
}

/// A provider entry in a raw, unranked search response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCandidate {
    id: ProviderId,
    name: String,
    location: Coordinate,
    open_now: bool,
    #[serde(default)]
    offers: Vec<Offer>,
}

impl ProviderCandidate {
    /// Creates a new candidate.
    #[must_use]
    pub fn new(
        id: impl Into<ProviderId>,
        name: impl Into<String>,
        location: Coordinate,
        open_now: bool,
        offers: Vec<Offer>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location,
            open_now,
            offers,
        }
    }

    /// Returns the provider ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ProviderId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the provider location.
    #[inline]
    #[must_use]
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Returns true if the provider is open right now.
    #[inline]
    #[must_use]
    pub fn is_open_now(&self) -> bool {
        self.open_now
    }

    /// Returns the offers in response order.
    #[inline]
    #[must_use]
    pub fn offers(&self) -> &[Offer] {
        &self.offers
    }

    /// Returns true if at least one offer is in stock.
    #[must_use]
    pub fn has_stock(&self) -> bool {
        self.offers.iter().any(Offer::has_stock)
    }

    /// Returns true if at least one offer is for `procedure`.
    #[must_use]
    pub fn offers_procedure(&self, procedure: &ProcedureId) -> bool {
        self.offers.iter().any(|o| o.procedure_id() == procedure)
    }

    /// Returns a copy keeping only the offers for `procedure`, in order.
    #[must_use]
    pub fn restricted_to(&self, procedure: &ProcedureId) -> Self {
        Self {
            offers: self
                .offers
                .iter()
                .filter(|o| o.procedure_id() == procedure)
                .cloned()
                .collect(),
            ..self.clone()
        }
    }
}

impl fmt::Display for ProviderCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Provider({} \"{}\" at {}, {} offers)",
            self.id,
            self.name,
            self.location,
            self.offers.len()
        )
    }
}
