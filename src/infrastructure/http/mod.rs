//! # HTTP
//!
//! Transport port, error classification and the API client.
//!
//! ```text
//! ApiClient ──decorate──→ AuthGate
//!     │
//!     └──execute──→ HttpTransport ──→ classifier ──→ RemoteResult<T>
//!                                                        │
//!                                   AuthGate::observe ←──┘
//! ```

pub mod classifier;
pub mod client;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{
    classify, classify_empty, classify_response, classify_status, classify_transport,
};
pub use client::ApiClient;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError};
