//! # Auth Token Gate
//!
//! Owns the session token, decorates outgoing requests with it and ends
//! the session when the server rejects it.
//!
//! # State Machine
//!
//! ```text
//! Anonymous ──login──────────────────→ Authenticated
//!     ↑                                     │
//!     ├──────────logout─────────────────────┤
//!     └──401 for the current token──────────┘  (fires session-invalidated listeners)
//! ```
//!
//! The in-memory token is the source of truth for the process lifetime.
//! Every transition is written to the [`TokenStore`] while the state lock is
//! held, so the store never sees transitions out of order. Store failures
//! are logged and do not affect the in-memory state.
//!
//! # Examples
//!
//! ```
//! # tokio_test::block_on(async {
//! use petspot_core::infrastructure::auth::{AuthGate, InMemoryTokenStore};
//! use std::sync::Arc;
//!
//! let gate = AuthGate::init(Arc::new(InMemoryTokenStore::new())).await;
//! gate.on_session_invalidated(|| println!("please sign in again"));
//! gate.login("abc").await.unwrap();
//! assert!(gate.is_authenticated().await);
//! # });
//! ```

use crate::application::result::RemoteResult;
use crate::infrastructure::auth::token_store::{BearerToken, TokenStore};
use crate::infrastructure::http::transport::HttpRequest;
use reqwest::header::{AUTHORIZATION, HeaderValue, InvalidHeaderValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Error type for gate operations.
#[derive(Debug, Error)]
pub enum GateError {
    /// The token contains bytes that cannot appear in an HTTP header.
    #[error("session token is not a valid header value: {0}")]
    InvalidToken(#[from] InvalidHeaderValue),
}

/// Callback fired when the server invalidates the session.
pub type SessionListener = Arc<dyn Fn() + Send + Sync>;

/// Whether a session token is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    /// No token; requests go out undecorated.
    Anonymous,
    /// A token is present and attached to every request.
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "ANONYMOUS"),
            Self::Authenticated => write!(f, "AUTHENTICATED"),
        }
    }
}

/// Session token holder and request decorator.
pub struct AuthGate {
    token: Mutex<Option<BearerToken>>,
    store: Arc<dyn TokenStore>,
    listeners: parking_lot::RwLock<Vec<SessionListener>>,
}

impl fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthGate")
            .field("store", &self.store)
            .field("listeners", &self.listeners.read().len())
            .finish_non_exhaustive()
    }
}

impl AuthGate {
    /// Creates a gate and restores the persisted token from `store`.
    ///
    /// A store that cannot be read, or a stored token that cannot be sent
    /// as a header, yields an anonymous session.
    pub async fn init(store: Arc<dyn TokenStore>) -> Self {
        let restored = match store.load().await {
            Ok(Some(token)) if bearer_header(&token).is_err() => {
                tracing::warn!(
                    "stored session token is not a valid header value; starting anonymous"
                );
                None
            }
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "could not restore session token; starting anonymous");
                None
            }
        };
        tracing::debug!(restored = restored.is_some(), "auth gate initialised");

        Self {
            token: Mutex::new(restored),
            store,
            listeners: parking_lot::RwLock::new(Vec::new()),
        }
    }

    /// Flushes the current token to the store.
    pub async fn teardown(&self) {
        let token = self.token.lock().await;
        self.persist(token.as_ref()).await;
        tracing::debug!("auth gate flushed");
    }

    /// Starts a session with `token`.
    ///
    /// # Errors
    ///
    /// Returns [`GateError::InvalidToken`] if the token cannot be carried in
    /// an `Authorization` header. The current session is left untouched.
    pub async fn login(&self, token: impl Into<BearerToken>) -> Result<(), GateError> {
        let token = token.into();
        bearer_header(&token)?;

        let mut current = self.token.lock().await;
        self.persist(Some(&token)).await;
        *current = Some(token);
        tracing::info!("session started");
        Ok(())
    }

    /// Ends the session. Listeners are not notified: logout is user-driven.
    pub async fn logout(&self) {
        let mut current = self.token.lock().await;
        if current.take().is_some() {
            self.persist(None).await;
            tracing::info!("session ended by logout");
        }
    }

    /// Returns the current token.
    pub async fn token(&self) -> Option<BearerToken> {
        self.token.lock().await.clone()
    }

    /// Returns the current session state.
    pub async fn state(&self) -> SessionState {
        if self.token.lock().await.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Anonymous
        }
    }

    /// Returns true if a token is present.
    pub async fn is_authenticated(&self) -> bool {
        self.state().await == SessionState::Authenticated
    }

    /// Registers a listener fired once per 401-driven session invalidation.
    pub fn on_session_invalidated<F>(&self, listener: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Adds `Authorization: Bearer <token>` to `request` while a session is
    /// active.
    ///
    /// Returns the token that was attached, to be handed back to
    /// [`observe`](Self::observe) with the call's result.
    pub async fn decorate(&self, request: &mut HttpRequest) -> Option<BearerToken> {
        let token = self.token().await?;
        match bearer_header(&token) {
            Ok(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
                Some(token)
            }
            Err(e) => {
                tracing::warn!(error = %e, "session token rejected as header; sending undecorated");
                None
            }
        }
    }

    /// Inspects the result of a call made with `sent_with`.
    ///
    /// A 401 client error ends the session if `sent_with` is still the
    /// current token, then fires every listener once. Returns true when this
    /// call caused the transition. A 401 for an older token, or for a
    /// request sent anonymously, leaves the current session alone.
    pub async fn observe<T>(
        &self,
        result: &RemoteResult<T>,
        sent_with: Option<&BearerToken>,
    ) -> bool {
        let RemoteResult::Error(error) = result else {
            return false;
        };
        if !error.is_unauthorized() {
            return false;
        }
        let Some(sent_with) = sent_with else {
            return false;
        };

        {
            let mut current = self.token.lock().await;
            if current.as_ref() != Some(sent_with) {
                return false;
            }
            *current = None;
            self.persist(None).await;
        }

        tracing::info!("session invalidated by server (HTTP 401)");
        self.notify_invalidated();
        true
    }

    fn notify_invalidated(&self) {
        let listeners: Vec<SessionListener> = self.listeners.read().clone();
        for listener in listeners {
            listener();
        }
    }

    async fn persist(&self, token: Option<&BearerToken>) {
        if let Err(e) = self.store.save(token).await {
            tracing::warn!(error = %e, "failed to persist session token");
        }
    }
}

/// Builds the sensitive `Bearer <token>` header value.
fn bearer_header(token: &BearerToken) -> Result<HeaderValue, GateError> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose()))?;
    value.set_sensitive(true);
    Ok(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::result::RemoteError;
    use crate::infrastructure::auth::token_store::{
        InMemoryTokenStore, TokenStoreError, TokenStoreResult,
    };
    use async_trait::async_trait;
    use reqwest::Url;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn request() -> HttpRequest {
        HttpRequest::get(Url::parse("https://api.example.com/providers").unwrap())
    }

    fn unauthorized() -> RemoteResult<()> {
        RemoteResult::Error(RemoteError::client(401, "token expired"))
    }

    async fn gate_with(store: &InMemoryTokenStore) -> AuthGate {
        AuthGate::init(Arc::new(store.clone())).await
    }

    fn counting_listener(gate: &AuthGate) -> Arc<AtomicUsize> {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&fired);
        gate.on_session_invalidated(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        fired
    }

    #[derive(Debug)]
    struct BrokenStore;

    #[async_trait]
    impl TokenStore for BrokenStore {
        async fn load(&self) -> TokenStoreResult<Option<BearerToken>> {
            Err(TokenStoreError::Unavailable("keystore locked".into()))
        }

        async fn save(&self, _token: Option<&BearerToken>) -> TokenStoreResult<()> {
            Err(TokenStoreError::Unavailable("keystore locked".into()))
        }
    }

    #[tokio::test]
    async fn anonymous_requests_are_undecorated() {
        let gate = gate_with(&InMemoryTokenStore::new()).await;
        let mut req = request();
        assert!(gate.decorate(&mut req).await.is_none());
        assert!(req.headers().get(AUTHORIZATION).is_none());
        assert_eq!(gate.state().await, SessionState::Anonymous);
    }

    #[tokio::test]
    async fn login_decorates_with_bearer() {
        let gate = gate_with(&InMemoryTokenStore::new()).await;
        gate.login("abc").await.unwrap();

        let mut req = request();
        let sent_with = gate.decorate(&mut req).await;
        assert_eq!(sent_with, Some(BearerToken::new("abc")));
        assert_eq!(req.headers().get(AUTHORIZATION).unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn unauthorized_clears_token_and_fires_once() {
        let store = InMemoryTokenStore::new();
        let gate = gate_with(&store).await;
        let fired = counting_listener(&gate);
        gate.login("abc").await.unwrap();

        let mut req = request();
        let sent_with = gate.decorate(&mut req).await;

        assert!(gate.observe(&unauthorized(), sent_with.as_ref()).await);
        assert!(!gate.observe(&unauthorized(), sent_with.as_ref()).await);

        assert_eq!(gate.token().await, None);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(store.snapshot().await, None);
    }

    #[tokio::test]
    async fn concurrent_unauthorized_results_fire_once() {
        let gate = Arc::new(gate_with(&InMemoryTokenStore::new()).await);
        let fired = counting_listener(&gate);
        gate.login("abc").await.unwrap();
        let sent_with = BearerToken::new("abc");

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let gate = Arc::clone(&gate);
                let sent_with = sent_with.clone();
                tokio::spawn(async move { gate.observe(&unauthorized(), Some(&sent_with)).await })
            })
            .collect();

        let mut transitions = 0;
        for handle in handles {
            if handle.await.unwrap() {
                transitions += 1;
            }
        }
        assert_eq!(transitions, 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_unauthorized_keeps_newer_session() {
        let gate = gate_with(&InMemoryTokenStore::new()).await;
        let fired = counting_listener(&gate);
        gate.login("old").await.unwrap();
        gate.login("new").await.unwrap();

        let stale = BearerToken::new("old");
        assert!(!gate.observe(&unauthorized(), Some(&stale)).await);
        assert_eq!(gate.token().await, Some(BearerToken::new("new")));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn other_errors_do_not_end_session() {
        let gate = gate_with(&InMemoryTokenStore::new()).await;
        gate.login("abc").await.unwrap();
        let sent_with = BearerToken::new("abc");

        let forbidden: RemoteResult<()> = RemoteResult::Error(RemoteError::client(403, "nope"));
        let server: RemoteResult<()> = RemoteResult::Error(RemoteError::server(401, "odd"));
        assert!(!gate.observe(&forbidden, Some(&sent_with)).await);
        assert!(!gate.observe(&server, Some(&sent_with)).await);
        assert!(!gate.observe(&RemoteResult::Success(()), Some(&sent_with)).await);
        assert!(gate.is_authenticated().await);
    }

    #[tokio::test]
    async fn logout_clears_without_notifying() {
        let store = InMemoryTokenStore::new();
        let gate = gate_with(&store).await;
        let fired = counting_listener(&gate);
        gate.login("abc").await.unwrap();
        assert_eq!(store.snapshot().await, Some(BearerToken::new("abc")));

        gate.logout().await;
        assert_eq!(gate.state().await, SessionState::Anonymous);
        assert_eq!(store.snapshot().await, None);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn init_restores_persisted_token() {
        let store = InMemoryTokenStore::with_token("persisted");
        let gate = gate_with(&store).await;
        assert_eq!(gate.token().await, Some(BearerToken::new("persisted")));
    }

    #[tokio::test]
    async fn broken_store_does_not_affect_session() {
        let gate = AuthGate::init(Arc::new(BrokenStore)).await;
        assert!(!gate.is_authenticated().await);

        gate.login("abc").await.unwrap();
        assert!(gate.is_authenticated().await);
        gate.teardown().await;
        gate.logout().await;
        assert!(!gate.is_authenticated().await);
    }

    #[tokio::test]
    async fn teardown_flushes_current_token() {
        let store = InMemoryTokenStore::new();
        let gate = gate_with(&store).await;
        gate.login("abc").await.unwrap();
        store.save(None).await.unwrap();

        gate.teardown().await;
        assert_eq!(store.snapshot().await, Some(BearerToken::new("abc")));
    }

    #[tokio::test]
    async fn login_rejects_token_unfit_for_header() {
        let store = InMemoryTokenStore::new();
        let gate = gate_with(&store).await;
        gate.login("abc").await.unwrap();

        let err = gate.login("abc\n").await.unwrap_err();
        assert!(matches!(err, GateError::InvalidToken(_)));
        assert_eq!(gate.token().await, Some(BearerToken::new("abc")));
        assert_eq!(store.snapshot().await, Some(BearerToken::new("abc")));
    }

    #[tokio::test]
    async fn unfit_stored_token_starts_anonymous() {
        let gate = gate_with(&InMemoryTokenStore::with_token("abc\r\n")).await;
        assert_eq!(gate.state().await, SessionState::Anonymous);

        let mut req = request();
        assert!(gate.decorate(&mut req).await.is_none());
    }
}
