//! # Token Store
//!
//! Port for persisting the session token across process restarts, and an
//! in-memory implementation for tests and ephemeral sessions.
//!
//! The platform keystore / encrypted preferences adapter lives in the host
//! app; it only has to implement [`TokenStore`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// A bearer token.
///
/// `Debug` never prints the secret.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    /// Wraps a raw token.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the raw token.
    #[inline]
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(***)")
    }
}

impl From<&str> for BearerToken {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BearerToken {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Error type for token store operations.
#[derive(Debug, Clone, Error)]
pub enum TokenStoreError {
    /// The backing storage could not be read or written.
    #[error("token storage unavailable: {0}")]
    Unavailable(String),

    /// The stored value could not be decoded.
    #[error("stored token is corrupt: {0}")]
    Corrupt(String),
}

/// Result type for token store operations.
pub type TokenStoreResult<T> = Result<T, TokenStoreError>;

/// Persists the current session token.
#[async_trait]
pub trait TokenStore: Send + Sync + fmt::Debug {
    /// Loads the persisted token, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenStoreError`] if the storage cannot be read.
    async fn load(&self) -> TokenStoreResult<Option<BearerToken>>;

    /// Persists `token`, or clears the stored token when `None`.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenStoreError`] if the storage cannot be written.
    async fn save(&self, token: Option<&BearerToken>) -> TokenStoreResult<()>;
}

/// In-memory implementation of [`TokenStore`].
///
/// Clones share the same storage, so a test can keep a handle and inspect
/// what the gate persisted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTokenStore {
    storage: Arc<RwLock<Option<BearerToken>>>,
}

impl InMemoryTokenStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token`.
    #[must_use]
    pub fn with_token(token: impl Into<BearerToken>) -> Self {
        Self {
            storage: Arc::new(RwLock::new(Some(token.into()))),
        }
    }

    /// Returns the stored token without going through the trait.
    pub async fn snapshot(&self) -> Option<BearerToken> {
        self.storage.read().await.clone()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn load(&self) -> TokenStoreResult<Option<BearerToken>> {
        let storage = self.storage.read().await;
        Ok(storage.clone())
    }

    async fn save(&self, token: Option<&BearerToken>) -> TokenStoreResult<()> {
        let mut storage = self.storage.write().await;
        *storage = token.cloned();
        Ok(())
    }
}
