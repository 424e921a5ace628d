//! # Error Classifier
//!
//! Maps raw transport outcomes into [`RemoteResult`] values.
//!
//! | Outcome                         | Result                                    |
//! |---------------------------------|-------------------------------------------|
//! | 2xx, decodable non-empty body   | `Success(value)`                          |
//! | 2xx, empty body                 | `Error(Unknown, "empty body")`            |
//! | 2xx, undecodable body           | `Error(Unknown, "empty body")` with cause |
//! | 400..=499                       | `Error(ClientError, body, status)`        |
//! | 500..=599                       | `Error(ServerError, body, status)`        |
//! | any other status                | `Error(Unknown, body, status)`            |
//! | connect/DNS/timeout/I/O failure | `Error(Transport, message, cause)`        |
//! | malformed request               | `Error(Unknown, message, cause)`          |
//!
//! Every function here is total: there is no input for which it panics or
//! fails to return a variant.

use crate::application::result::{ErrorKind, RemoteError, RemoteResult};
use crate::infrastructure::http::transport::{HttpResponse, TransportError};
use serde::de::DeserializeOwned;

/// Message used for successful responses without a usable body. For an
/// undecodable body the decoder error is attached as the cause.
pub const EMPTY_BODY: &str = "empty body";

/// Returns true for statuses in `200..=299`.
#[inline]
#[must_use]
pub fn is_success_status(status: u16) -> bool {
    (200..=299).contains(&status)
}

/// Classifies a transport outcome for an endpoint that returns JSON.
pub fn classify<T: DeserializeOwned>(
    outcome: Result<HttpResponse, TransportError>,
) -> RemoteResult<T> {
    match outcome {
        Ok(response) => classify_response(&response),
        Err(error) => RemoteResult::Error(classify_transport(error)),
    }
}

/// Classifies a transport outcome for an endpoint whose body is ignored.
///
/// Any 2xx status is a success, with or without a body.
pub fn classify_empty(outcome: Result<HttpResponse, TransportError>) -> RemoteResult<()> {
    match outcome {
        Ok(response) if is_success_status(response.status()) => RemoteResult::Success(()),
        Ok(response) => RemoteResult::Error(classify_status(
            response.status(),
            &String::from_utf8_lossy(response.body()),
        )),
        Err(error) => RemoteResult::Error(classify_transport(error)),
    }
}

/// Classifies a received response, decoding a successful body as JSON.
pub fn classify_response<T: DeserializeOwned>(response: &HttpResponse) -> RemoteResult<T> {
    let status = response.status();
    if !is_success_status(status) {
        let body = String::from_utf8_lossy(response.body());
        return RemoteResult::Error(classify_status(status, &body));
    }

    let body = response.body();
    if body.iter().all(u8::is_ascii_whitespace) {
        return RemoteResult::Error(RemoteError::unknown(EMPTY_BODY).with_http_status(status));
    }

    match serde_json::from_slice::<T>(body) {
        Ok(value) => RemoteResult::Success(value),
        Err(e) => RemoteResult::Error(
            RemoteError::unknown(EMPTY_BODY)
                .with_http_status(status)
                .with_cause(e),
        ),
    }
}

/// Classifies a non-2xx status.
#[must_use]
pub fn classify_status(status: u16, body: &str) -> RemoteError {
    let kind = match status {
        400..=499 => ErrorKind::ClientError,
        500..=599 => ErrorKind::ServerError,
        _ => ErrorKind::Unknown,
    };
    RemoteError::new(kind)
        .with_message(body)
        .with_http_status(status)
}

/// Classifies a failure to obtain a response.
///
/// A malformed request is not a transport problem: it is reported as
/// `Unknown`, everything else as `Transport`.
#[must_use]
pub fn classify_transport(error: TransportError) -> RemoteError {
    let kind = if error.is_invalid_request() {
        ErrorKind::Unknown
    } else {
        ErrorKind::Transport
    };
    RemoteError::new(kind)
        .with_message(error.to_string())
        .with_cause(error)
}
