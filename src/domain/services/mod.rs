//! # Domain Services
//!
//! Pure business rules that don't belong to a single entity.
//!
//! ## Services
//!
//! - [`pricing::resolve_price`]: weight-banded price resolution

pub mod pricing;

pub use pricing::{PriceRule, overlapping_rules, resolve_price};
