//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`ProviderId`], [`OfferId`], [`ProcedureId`], [`ServiceId`], [`PetId`]:
//!   string identifiers assigned by the backend
//! - [`CartItemId`]: UUID generated locally for each cart line
//!
//! ## Geography
//!
//! - [`Coordinate`]: validated latitude/longitude pair
//! - [`distance`]: haversine great-circle distance in meters
//!
//! ## Money
//!
//! - [`Money`]: integer minor currency units with saturating sums

pub mod coordinate;
pub mod ids;
pub mod money;

pub use coordinate::{Coordinate, CoordinateError, EARTH_RADIUS_METERS, distance};
pub use ids::{CartItemId, OfferId, PetId, ProcedureId, ProviderId, ServiceId};
pub use money::Money;
