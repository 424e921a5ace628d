//! # API Client
//!
//! Resolves endpoint paths against a base URL, attaches the session token,
//! runs the request on an [`HttpTransport`] and classifies the outcome.
//!
//! Every call returns a [`RemoteResult`]. Nothing here panics on a bad
//! response or a failed connection.
//!
//! # Cancellation
//!
//! [`send_cancellable`](ApiClient::send_cancellable) races the request
//! against a caller-supplied future. When that future completes first the
//! in-flight request is aborted and the call yields a `Transport` error
//! with the message `"cancelled"`. Dropping the returned future also
//! aborts the request.
//!
//! # Examples
//!
//! ```no_run
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! use petspot_core::ClientConfig;
//! use petspot_core::infrastructure::auth::{AuthGate, InMemoryTokenStore};
//! use petspot_core::infrastructure::http::ApiClient;
//! use std::sync::Arc;
//!
//! let config = ClientConfig::load(None)?;
//! let gate = Arc::new(AuthGate::init(Arc::new(InMemoryTokenStore::new())).await);
//! let client = ApiClient::from_config(&config, gate)?;
//!
//! let pets: Vec<serde_json::Value> = client.get("pets").await.into_result()?;
//! println!("{} pets", pets.len());
//! # Ok(())
//! # }
//! ```

use crate::application::result::{RemoteError, RemoteResult};
use crate::config::ClientConfig;
use crate::infrastructure::auth::AuthGate;
use crate::infrastructure::http::classifier;
use crate::infrastructure::http::transport::{
    HttpRequest, HttpResponse, HttpTransport, ReqwestTransport, TransportError,
};
use bytes::Bytes;
use reqwest::Url;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::{self, Future};
use std::sync::Arc;
use tokio::task::JoinHandle;

type Classify<T> = fn(Result<HttpResponse, TransportError>) -> RemoteResult<T>;

/// Aborts the wrapped task when dropped.
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Client for the PetSpot REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn HttpTransport>,
    gate: Arc<AuthGate>,
}

impl ApiClient {
    /// Creates a client over an explicit transport.
    ///
    /// A trailing `/` is added to `base_url` if missing so that relative
    /// paths extend it instead of replacing its last segment.
    #[must_use]
    pub fn new(mut base_url: Url, transport: Arc<dyn HttpTransport>, gate: Arc<AuthGate>) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            transport,
            gate,
        }
    }

    /// Creates a client backed by [`ReqwestTransport`].
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig, gate: Arc<AuthGate>) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new(config.request_timeout_ms)?;
        Ok(Self::new(config.base_url.clone(), Arc::new(transport), gate))
    }

    /// Returns the auth gate requests go through.
    #[inline]
    #[must_use]
    pub fn gate(&self) -> &Arc<AuthGate> {
        &self.gate
    }

    /// Returns the normalized base URL.
    #[inline]
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a GET to `path` and decodes the JSON response.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> RemoteResult<T> {
        self.get_with_params(path, &[]).await
    }

    /// Sends a GET to `path` with query parameters and decodes the JSON
    /// response.
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> RemoteResult<T> {
        let mut url = match self.endpoint(path) {
            Ok(url) => url,
            Err(e) => return RemoteResult::Error(e),
        };
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        self.send(HttpRequest::get(url)).await
    }

    /// Sends `body` as JSON to `path` and decodes the JSON response.
    pub async fn post<T, B>(&self, path: &str, body: &B) -> RemoteResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        match self.json_post(path, body) {
            Ok(request) => self.send(request).await,
            Err(e) => RemoteResult::Error(e),
        }
    }

    /// Sends `body` as JSON to `path`; any 2xx response is a success and
    /// its body is ignored.
    pub async fn post_without_response<B>(&self, path: &str, body: &B) -> RemoteResult<()>
    where
        B: Serialize + ?Sized,
    {
        match self.json_post(path, body) {
            Ok(request) => {
                self.dispatch(request, future::pending(), classifier::classify_empty)
                    .await
            }
            Err(e) => RemoteResult::Error(e),
        }
    }

    /// Sends a prepared request and decodes the JSON response.
    pub async fn send<T: DeserializeOwned>(&self, request: HttpRequest) -> RemoteResult<T> {
        self.dispatch(request, future::pending(), classifier::classify::<T>)
            .await
    }

    /// Sends a prepared request, giving up when `cancel` completes first.
    pub async fn send_cancellable<T, C>(&self, request: HttpRequest, cancel: C) -> RemoteResult<T>
    where
        T: DeserializeOwned,
        C: Future<Output = ()> + Send,
    {
        self.dispatch(request, cancel, classifier::classify::<T>)
            .await
    }

    fn endpoint(&self, path: &str) -> Result<Url, RemoteError> {
        let url = self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            RemoteError::unknown(format!("invalid endpoint {path:?}: {e}")).with_cause(e)
        })?;
        self.ensure_within_base(&url)?;
        Ok(url)
    }

    /// Rejects URLs outside the API base, which must never see the token.
    fn ensure_within_base(&self, url: &Url) -> Result<(), RemoteError> {
        if url.origin() != self.base_url.origin() || !url.path().starts_with(self.base_url.path())
        {
            return Err(RemoteError::unknown(format!(
                "endpoint {} is outside the API base {}",
                url.as_str(),
                self.base_url.as_str()
            )));
        }
        Ok(())
    }

    fn json_post<B>(&self, path: &str, body: &B) -> Result<HttpRequest, RemoteError>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let body = serde_json::to_vec(body).map_err(|e| {
            RemoteError::unknown(format!("failed to encode request body: {e}")).with_cause(e)
        })?;
        Ok(HttpRequest::post(url).with_json_body(Bytes::from(body)))
    }

    async fn dispatch<T, C>(
        &self,
        mut request: HttpRequest,
        cancel: C,
        classify: Classify<T>,
    ) -> RemoteResult<T>
    where
        C: Future<Output = ()> + Send,
    {
        if let Err(e) = self.ensure_within_base(request.url()) {
            tracing::warn!(error = %e, "request refused");
            return RemoteResult::Error(e);
        }
        let sent_with = self.gate.decorate(&mut request).await;
        let method = request.method().clone();
        let path = request.url().path().to_owned();

        let transport = Arc::clone(&self.transport);
        let mut task = AbortOnDrop(tokio::spawn(
            async move { transport.execute(request).await },
        ));

        let result = tokio::select! {
            joined = &mut task.0 => match joined {
                Ok(outcome) => classify(outcome),
                Err(e) if e.is_cancelled() => RemoteResult::Error(RemoteError::cancelled()),
                Err(e) => RemoteResult::Error(RemoteError::unknown(format!(
                    "transport task panicked: {e}"
                ))),
            },
            () = cancel => {
                task.0.abort();
                RemoteResult::Error(RemoteError::cancelled())
            }
        };

        self.gate.observe(&result, sent_with.as_ref()).await;

        match &result {
            RemoteResult::Success(_) => {
                tracing::debug!(%method, %path, "request succeeded");
            }
            RemoteResult::Error(e) => {
                tracing::warn!(
                    %method,
                    %path,
                    kind = %e.kind(),
                    status = ?e.http_status(),
                    error = %e,
                    "request failed"
                );
            }
        }
        result
    }
}
