//! # Session
//!
//! Sign-in and sign-out on top of the [`AuthGate`].

use crate::application::result::{RemoteError, RemoteResult};
use crate::infrastructure::auth::{AuthGate, BearerToken, SessionState};
use crate::infrastructure::http::ApiClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Endpoint exchanging credentials for a token.
const LOGIN_PATH: &str = "auth/login";

/// Credentials sent to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginRequest<'a> {
    /// Account email.
    pub email: &'a str,
    /// Account password.
    pub password: &'a str,
}

impl fmt::Debug for LoginRequest<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Login endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    /// Session token to attach to subsequent requests.
    pub token: BearerToken,
}

/// Sign-in and sign-out.
#[derive(Debug, Clone)]
pub struct SessionService {
    client: ApiClient,
}

impl SessionService {
    /// Creates a session service over `client` and its gate.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn gate(&self) -> &Arc<AuthGate> {
        self.client.gate()
    }

    /// Exchanges credentials for a token and starts a session with it.
    ///
    /// On any failure the gate is left untouched. A token that cannot be
    /// sent back as a header is reported as `Unknown`.
    pub async fn login(&self, email: &str, password: &str) -> RemoteResult<()> {
        let request = LoginRequest { email, password };
        let response: RemoteResult<LoginResponse> = self.client.post(LOGIN_PATH, &request).await;
        match response {
            RemoteResult::Success(LoginResponse { token }) => {
                match self.gate().login(token).await {
                    Ok(()) => RemoteResult::Success(()),
                    Err(e) => RemoteResult::Error(
                        RemoteError::unknown(e.to_string()).with_cause(e),
                    ),
                }
            }
            RemoteResult::Error(e) => RemoteResult::Error(e),
        }
    }

    /// Ends the current session locally.
    pub async fn logout(&self) {
        self.gate().logout().await;
    }

    /// Returns the current session state.
    pub async fn state(&self) -> SessionState {
        self.gate().state().await
    }
}
