//! Bearer-token session with single-refresh replay.
//!
//! # Responsibility
//! - Hold the current token pair and wrap authenticated calls so that an
//!   unauthorized outcome triggers exactly one refresh-and-replay.
//!
//! # Invariants
//! - At most one refresh per wrapped call; there is no other retry.
//! - A failed refresh clears the stored credentials; subsequent calls
//!   fail until new tokens are installed.
//! - The backend is reached only through the [`TokenRefresher`] seam and
//!   the caller-supplied request closure.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Token pair issued by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    /// Scheme label, normally `bearer`.
    pub token_type: String,
}

/// Failure reported by a [`TokenRefresher`].
#[derive(Debug)]
pub struct RefreshError {
    pub reason: String,
}

impl RefreshError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl Display for RefreshError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "token refresh failed: {}", self.reason)
    }
}

impl Error for RefreshError {}

/// Exchange of a refresh token for a fresh pair.
pub trait TokenRefresher {
    fn refresh(&self, refresh_token: &str) -> Result<AuthTokens, RefreshError>;
}

/// Outcome of one wrapped request attempt, as reported by the caller's
/// closure.
#[derive(Debug)]
pub enum CallOutcome<E> {
    /// The backend rejected the access token.
    Unauthorized,
    /// Any other failure; passed through untouched.
    Failed(E),
}

/// Errors from an authenticated call.
#[derive(Debug)]
pub enum AuthError<E> {
    /// No credentials are installed.
    NotAuthenticated,
    /// Refresh was attempted and rejected; credentials were cleared.
    SessionExpired,
    /// The request itself failed for a non-auth reason.
    Request(E),
}

impl<E: Display> Display for AuthError<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotAuthenticated => write!(f, "no credentials installed"),
            Self::SessionExpired => write!(f, "session expired; sign in again"),
            Self::Request(err) => write!(f, "{err}"),
        }
    }
}

impl<E: Error + 'static> Error for AuthError<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Request(err) => Some(err),
            _ => None,
        }
    }
}

/// Explicitly constructed session state; never a global.
pub struct AuthSession<R: TokenRefresher> {
    refresher: R,
    tokens: Option<AuthTokens>,
}

impl<R: TokenRefresher> AuthSession<R> {
    pub fn new(refresher: R) -> Self {
        Self {
            refresher,
            tokens: None,
        }
    }

    /// Installs a token pair, e.g. after an interactive sign-in.
    pub fn install(&mut self, tokens: AuthTokens) {
        self.tokens = Some(tokens);
    }

    /// Drops the stored credentials.
    pub fn sign_out(&mut self) {
        self.tokens = None;
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.is_some()
    }

    /// Runs one authenticated request.
    ///
    /// The closure receives the current access token. On an unauthorized
    /// outcome the session refreshes once and replays the closure with the
    /// new token. A second unauthorized outcome, or a refresh failure,
    /// clears credentials and ends the session.
    pub fn call<T, E, F>(&mut self, mut request: F) -> Result<T, AuthError<E>>
    where
        F: FnMut(&str) -> Result<T, CallOutcome<E>>,
    {
        let access_token = match &self.tokens {
            Some(tokens) => tokens.access_token.clone(),
            None => return Err(AuthError::NotAuthenticated),
        };

        match request(&access_token) {
            Ok(value) => Ok(value),
            Err(CallOutcome::Failed(err)) => Err(AuthError::Request(err)),
            Err(CallOutcome::Unauthorized) => {
                self.refresh()?;
                let fresh = match &self.tokens {
                    Some(tokens) => tokens.access_token.clone(),
                    None => return Err(AuthError::SessionExpired),
                };
                match request(&fresh) {
                    Ok(value) => Ok(value),
                    Err(CallOutcome::Failed(err)) => Err(AuthError::Request(err)),
                    Err(CallOutcome::Unauthorized) => {
                        // Fresh token rejected; nothing further to try.
                        self.tokens = None;
                        Err(AuthError::SessionExpired)
                    }
                }
            }
        }
    }

    fn refresh<E>(&mut self) -> Result<(), AuthError<E>> {
        let refresh_token = match &self.tokens {
            Some(tokens) => tokens.refresh_token.clone(),
            None => return Err(AuthError::NotAuthenticated),
        };

        match self.refresher.refresh(&refresh_token) {
            Ok(tokens) => {
                info!("event=token_refresh module=auth status=ok");
                self.tokens = Some(tokens);
                Ok(())
            }
            Err(err) => {
                warn!("event=token_refresh module=auth status=error reason={}", err.reason);
                self.tokens = None;
                Err(AuthError::SessionExpired)
            }
        }
    }
}
