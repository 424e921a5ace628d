//! # Application Services
//!
//! Stateless and stateful services the UI calls directly.
//!
//! - [`rank_nearby`]: filter, order and paginate provider candidates
//! - [`Cart`]: priced line items with derived totals

pub mod cart;
pub mod nearby_ranking;

pub use cart::{AddItemOutcome, Cart, CartState};
pub use nearby_ranking::{RankedProvider, RankedResult, SearchFilter, rank_nearby};
