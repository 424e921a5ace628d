//! # Domain Layer
//!
//! Plain data and pure functions: coordinates, providers, services and
//! pricing rules. Nothing in this layer performs I/O or holds shared state.

pub mod entities;
pub mod services;
pub mod value_objects;
