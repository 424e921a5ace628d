//! # PetSpot Core
//!
//! Client-side discovery, pricing and result-classification core for the
//! PetSpot pet services app.
//!
//! The crate is organised in three layers:
//!
//! - [`domain`]: coordinates and the haversine distance, provider and
//!   service entities, weight-banded pricing.
//! - [`application`]: the nearby provider ranker, the cart aggregator, the
//!   [`RemoteResult`](application::result::RemoteResult) taxonomy and the
//!   discovery/session use cases.
//! - [`infrastructure`]: the HTTP transport port and its `reqwest`
//!   adapter, the error classifier, the API client and the auth token gate.
//!
//! # Examples
//!
//! ```
//! use petspot_core::application::services::nearby_ranking::{SearchFilter, rank_nearby};
//! use petspot_core::domain::value_objects::Coordinate;
//!
//! let origin = Coordinate::new(40.4168, -3.7038).unwrap();
//! let ranked = rank_nearby(origin, &[], &SearchFilter::default());
//! assert!(ranked.is_empty());
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;

pub use application::result::{ErrorKind, Recovery, RemoteError, RemoteResult};
pub use config::{ClientConfig, ConfigError, LogFormat};
