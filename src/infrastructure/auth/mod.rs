//! # Authentication
//!
//! Session token persistence and the gate that attaches the token to
//! requests.

pub mod gate;
pub mod token_store;

pub use gate::{AuthGate, GateError, SessionListener, SessionState};
pub use token_store::{
    BearerToken, InMemoryTokenStore, TokenStore, TokenStoreError, TokenStoreResult,
};
