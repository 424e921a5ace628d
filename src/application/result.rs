//! # Remote Results
//!
//! The outcome type returned by every remote operation.
//!
//! [`RemoteResult`] is a two-variant sum type: either the decoded value or
//! a [`RemoteError`] whose [`ErrorKind`] tells the caller what went wrong
//! without exposing transport details.
//!
//! ```text
//! RemoteResult<T>
//! ├── Success(T)
//! └── Error(RemoteError)
//!     ├── Transport    - no response obtained (connect, timeout, DNS, I/O, cancelled)
//!     ├── ClientError  - 4xx, caller-correctable
//!     ├── ServerError  - 5xx, safe to retry later
//!     └── Unknown      - anything else, including malformed success bodies
//! ```
//!
//! # Examples
//!
//! ```
//! use petspot_core::application::result::{ErrorKind, RemoteError, RemoteResult};
//!
//! let result: RemoteResult<u32> = RemoteResult::Error(RemoteError::client(404, "missing"));
//! match result {
//!     RemoteResult::Success(value) => println!("got {value}"),
//!     RemoteResult::Error(err) => assert_eq!(err.kind(), ErrorKind::ClientError),
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased underlying cause of a [`RemoteError`].
pub type ErrorCause = Arc<dyn StdError + Send + Sync + 'static>;

/// HTTP status signalling an authorization failure.
pub const HTTP_UNAUTHORIZED: u16 = 401;

/// Classification of a failed remote operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// No response was obtained.
    Transport,
    /// The server answered 4xx.
    ClientError,
    /// The server answered 5xx.
    ServerError,
    /// Anything not classifiable.
    Unknown,
}

impl ErrorKind {
    /// Returns true if retrying the same request may succeed.
    #[inline]
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Transport | Self::ServerError)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "TRANSPORT"),
            Self::ClientError => write!(f, "CLIENT_ERROR"),
            Self::ServerError => write!(f, "SERVER_ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// What the UI should offer the user after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recovery {
    /// Ask the user to check their connection.
    CheckConnection,
    /// The session is gone; ask the user to sign in again.
    Reauthenticate,
    /// The request was rejected; the user should fix their input.
    CorrectRequest,
    /// The server failed; suggest trying again later.
    RetryLater,
    /// Nothing actionable; surface a generic error.
    ContactSupport,
}

/// A classified remote failure.
#[derive(Debug, Clone)]
pub struct RemoteError {
    kind: ErrorKind,
    message: Option<String>,
    http_status: Option<u16>,
    cause: Option<ErrorCause>,
}

impl RemoteError {
    /// Creates an error of the given kind with no details.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: None,
            http_status: None,
            cause: None,
        }
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transport).with_message(message)
    }

    /// Creates the transport error used for cancelled calls.
    #[must_use]
    pub fn cancelled() -> Self {
        Self::transport("cancelled")
    }

    /// Creates a 4xx error carrying the response body.
    #[must_use]
    pub fn client(status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::ClientError)
            .with_message(body)
            .with_http_status(status)
    }

    /// Creates a 5xx error carrying the response body.
    #[must_use]
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::new(ErrorKind::ServerError)
            .with_message(body)
            .with_http_status(status)
    }

    /// Creates an unclassifiable error.
    #[must_use]
    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown).with_message(message)
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Sets the HTTP status.
    #[must_use]
    pub fn with_http_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    /// Sets the underlying cause.
    #[must_use]
    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Returns the error kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the message, if any.
    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Returns the HTTP status, if a response was obtained.
    #[inline]
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    /// Returns the underlying cause, if any.
    #[inline]
    #[must_use]
    pub fn cause(&self) -> Option<&ErrorCause> {
        self.cause.as_ref()
    }

    /// Returns true for a 401 client error.
    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::ClientError && self.http_status == Some(HTTP_UNAUTHORIZED)
    }

    /// Returns true if retrying the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Returns the recovery the UI should offer for this error.
    #[must_use]
    pub fn recovery(&self) -> Recovery {
        match self.kind {
            ErrorKind::Transport => Recovery::CheckConnection,
            ErrorKind::ClientError if self.is_unauthorized() => Recovery::Reauthenticate,
            ErrorKind::ClientError => Recovery::CorrectRequest,
            ErrorKind::ServerError => Recovery::RetryLater,
            ErrorKind::Unknown => Recovery::ContactSupport,
        }
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} error", self.kind)?;
        if let Some(status) = self.http_status {
            write!(f, " (HTTP {status})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}

impl StdError for RemoteError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}

/// Outcome of a remote operation.
///
/// Every remote call in this crate ends in exactly one of these variants;
/// transport faults never escape as panics or raw errors.
#[must_use]
#[derive(Debug, Clone)]
pub enum RemoteResult<T> {
    /// The call succeeded with a decoded value.
    Success(T),
    /// The call failed; see [`RemoteError::kind`].
    Error(RemoteError),
}

impl<T> RemoteResult<T> {
    /// Returns true for [`RemoteResult::Success`].
    #[inline]
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Returns true for [`RemoteResult::Error`].
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }

    /// Returns the value, if successful.
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(value) => Some(value),
            Self::Error(_) => None,
        }
    }

    /// Returns the error, if failed.
    #[must_use]
    pub fn error(&self) -> Option<&RemoteError> {
        match self {
            Self::Success(_) => None,
            Self::Error(err) => Some(err),
        }
    }

    /// Maps the success value.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> RemoteResult<U> {
        match self {
            Self::Success(value) => RemoteResult::Success(f(value)),
            Self::Error(err) => RemoteResult::Error(err),
        }
    }

    /// Chains another remote step on success.
    pub fn and_then<U, F: FnOnce(T) -> RemoteResult<U>>(self, f: F) -> RemoteResult<U> {
        match self {
            Self::Success(value) => f(value),
            Self::Error(err) => RemoteResult::Error(err),
        }
    }

    /// Converts into a standard `Result` so callers can use `?`.
    ///
    /// # Errors
    ///
    /// Returns the [`RemoteError`] of a failed call.
    pub fn into_result(self) -> Result<T, RemoteError> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Error(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, RemoteError>> for RemoteResult<T> {
    fn from(result: Result<T, RemoteError>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(err) => Self::Error(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("socket closed")]
    struct SocketClosed;

    #[test]
    fn unauthorized_detection() {
        assert!(RemoteError::client(401, "expired").is_unauthorized());
        assert!(!RemoteError::client(403, "forbidden").is_unauthorized());
        assert!(!RemoteError::server(401, "odd").is_unauthorized());
    }

    #[test]
    fn recovery_per_kind() {
        assert_eq!(RemoteError::cancelled().recovery(), Recovery::CheckConnection);
        assert_eq!(RemoteError::client(401, "").recovery(), Recovery::Reauthenticate);
        assert_eq!(RemoteError::client(422, "").recovery(), Recovery::CorrectRequest);
        assert_eq!(RemoteError::server(503, "").recovery(), Recovery::RetryLater);
        assert_eq!(RemoteError::unknown("?").recovery(), Recovery::ContactSupport);
    }

    #[test]
    fn retryable_kinds() {
        assert!(ErrorKind::Transport.is_retryable());
        assert!(ErrorKind::ServerError.is_retryable());
        assert!(!ErrorKind::ClientError.is_retryable());
        assert!(!ErrorKind::Unknown.is_retryable());
    }

    #[test]
    fn display_includes_status_and_message() {
        let err = RemoteError::server(502, "bad gateway");
        assert_eq!(err.to_string(), "SERVER_ERROR error (HTTP 502): bad gateway");
        assert_eq!(RemoteError::new(ErrorKind::Unknown).to_string(), "UNKNOWN error");
    }

    #[test]
    fn source_exposes_cause() {
        let err = RemoteError::transport("connection reset").with_cause(SocketClosed);
        let source = err.source().map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("socket closed"));
    }

    #[test]
    fn map_and_into_result() {
        let ok: RemoteResult<u8> = RemoteResult::Success(2);
        assert_eq!(ok.map(|v| v * 2).into_result().ok(), Some(4));

        let failed: RemoteResult<u8> = RemoteResult::Error(RemoteError::unknown("x"));
        assert!(failed.clone().map(|v| v * 2).is_error());
        assert_eq!(
            failed.into_result().err().map(|e| e.kind()),
            Some(ErrorKind::Unknown)
        );
    }

    #[test]
    fn and_then_short_circuits() {
        let failed: RemoteResult<u8> = RemoteResult::Error(RemoteError::cancelled());
        let chained = failed.and_then(|v| RemoteResult::Success(v + 1));
        assert_eq!(chained.error().map(RemoteError::kind), Some(ErrorKind::Transport));
    }
}
