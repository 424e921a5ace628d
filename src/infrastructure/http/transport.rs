//! # HTTP Transport
//!
//! Port for the component that actually moves bytes, plus the default
//! `reqwest` adapter.
//!
//! A transport either yields a status and body or a [`TransportError`]; it
//! never interprets status codes. Classification happens in
//! [`classifier`](super::classifier).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, Method, Url};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// An outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Bytes>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    #[must_use]
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: Url) -> Self {
        Self::new(Method::GET, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: Url) -> Self {
        Self::new(Method::POST, url)
    }

    /// Sets a JSON body and the matching content type.
    #[must_use]
    pub fn with_json_body(mut self, body: Bytes) -> Self {
        self.headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        self.body = Some(body);
        self
    }

    /// Returns the method.
    #[inline]
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL.
    #[inline]
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the headers.
    #[inline]
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the headers for modification.
    #[inline]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Returns the body, if any.
    #[inline]
    #[must_use]
    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }
}

/// A response as received, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    status: u16,
    body: Bytes,
}

impl HttpResponse {
    /// Creates a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns the status code.
    #[inline]
    #[must_use]
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the raw body.
    #[inline]
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }
}

/// Failure to obtain a response.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection refused, reset, or host unreachable.
    #[error("connection failed: {0}")]
    Connect(String),

    /// Name resolution failed.
    #[error("dns resolution failed: {0}")]
    Dns(String),

    /// The transport gave up waiting.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// I/O failure while sending the request or reading the response.
    #[error("i/o error: {0}")]
    Io(String),

    /// The request could not be built (bad header, unsupported scheme).
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl TransportError {
    /// Returns true if the failure happened before any bytes left the
    /// client because the request itself was malformed.
    #[must_use]
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }
}

/// Performs HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Sends `request` and returns the raw response.
    ///
    /// Non-2xx statuses are returned as `Ok`; only failures to obtain a
    /// response are errors.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no response could be obtained.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_ms: u64,
}

impl ReqwestTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns `TransportError::InvalidRequest` if the client cannot be
    /// built (e.g. no TLS backend available).
    pub fn new(timeout_ms: u64) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| {
                TransportError::InvalidRequest(format!("failed to create HTTP client: {e}"))
            })?;

        Ok(Self { client, timeout_ms })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn from_client(client: Client, timeout_ms: u64) -> Self {
        Self { client, timeout_ms }
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    fn map_reqwest_error(error: &reqwest::Error) -> TransportError {
        let message = error.to_string();
        if error.is_timeout() {
            TransportError::Timeout(message)
        } else if error.is_builder() {
            TransportError::InvalidRequest(message)
        } else if error.is_connect() {
            if Self::is_dns_failure(error) {
                TransportError::Dns(message)
            } else {
                TransportError::Connect(message)
            }
        } else {
            TransportError::Io(message)
        }
    }

    /// reqwest reports resolver failures as connect errors; the resolver
    /// message is the only signal that tells them apart.
    fn is_dns_failure(error: &reqwest::Error) -> bool {
        let mut source = std::error::Error::source(error);
        while let Some(cause) = source {
            let text = cause.to_string().to_lowercase();
            if text.contains("dns") || text.contains("resolve") || text.contains("lookup") {
                return true;
            }
            source = cause.source();
        }
        false
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
        } = request;

        let mut builder = self.client.request(method, url).headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_reqwest_error(&e))?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_reqwest_error(&e))?;

        Ok(HttpResponse::new(status, body))
    }
}
