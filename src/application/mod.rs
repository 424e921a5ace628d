//! # Application Layer
//!
//! Ranking, cart aggregation, the remote result taxonomy and the use cases
//! that combine them with remote calls.

pub mod result;
pub mod services;
pub mod use_cases;
