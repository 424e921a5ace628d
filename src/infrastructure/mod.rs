//! # Infrastructure Layer
//!
//! Adapters that talk to the outside world: HTTP transport and
//! classification, the API client, and session token handling.

pub mod auth;
pub mod http;
