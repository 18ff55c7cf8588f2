//! Driven port for signing staff in and out.
//!
//! The backend owns the session cookie. The portal relays the `Set-Cookie`
//! headers the backend returns so the browser talks to the backend with the
//! same session on the next request.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{BackendCredentials, LoginCredentials, Session};

/// Outcome of a successful sign-in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignedIn {
    /// Session the backend opened.
    pub session: Session,
    /// `Set-Cookie` header values to relay to the browser.
    pub set_cookies: Vec<String>,
}

/// Port for session lifecycle commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionCommand: Send + Sync {
    /// Exchange credentials for a backend session.
    async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn, BackendError>;

    /// End the session the forwarded cookies belong to.
    ///
    /// Returns the `Set-Cookie` headers that clear it.
    async fn logout(&self, credentials: &BackendCredentials) -> Result<Vec<String>, BackendError>;
}

/// Development authenticator.
///
/// `admin@store.test` / `password` signs in as an admin; anything else is
/// refused with the backend's 401 wording.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureSessionCommand;

const FIXTURE_COOKIE: &str = "session=fixture; Path=/; HttpOnly";
const FIXTURE_CLEAR_COOKIE: &str = "session=; Path=/; Max-Age=0";

#[async_trait]
impl SessionCommand for FixtureSessionCommand {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn, BackendError> {
        if credentials.email() != "admin@store.test" || credentials.password() != "password" {
            return Err(BackendError::status(401_u16, "invalid credentials"));
        }
        let user = serde_json::from_value(serde_json::json!({
            "id": 1,
            "email": credentials.email(),
            "role": "admin",
        }))
        .map_err(|err| BackendError::decode(err.to_string()))?;
        Ok(SignedIn {
            session: Session::for_user(user),
            set_cookies: vec![FIXTURE_COOKIE.to_owned()],
        })
    }

    async fn logout(&self, _credentials: &BackendCredentials) -> Result<Vec<String>, BackendError> {
        Ok(vec![FIXTURE_CLEAR_COOKIE.to_owned()])
    }
}
