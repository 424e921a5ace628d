//! # Use Cases
//!
//! Remote flows the UI triggers: fetching and ranking nearby providers, and
//! signing in and out.

pub mod discovery;
pub mod session;

pub use discovery::DiscoveryService;
pub use session::{LoginRequest, LoginResponse, SessionService};
