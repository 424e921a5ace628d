//! # Domain Entities
//!
//! - [`ProviderCandidate`] and [`Offer`]: raw nearby search results
//! - [`ServiceDefinition`]: a bookable service with pricing rules
//! - [`Pet`]: the subject a service is booked for
//! - [`CartItem`]: a priced line owned by the cart

pub mod cart_item;
pub mod pet;
pub mod provider;
pub mod service;

pub use cart_item::CartItem;
pub use pet::Pet;
pub use provider::{Offer, ProviderCandidate};
pub use service::ServiceDefinition;
