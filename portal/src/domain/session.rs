//! Session bootstrap types.
//!
//! The backend is the only authority on who is signed in. The portal never
//! interprets the session cookie: it forwards the visitor's cookies as
//! [`BackendCredentials`] and reads the answer as a [`Session`].

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

use super::records::RecordId;
use super::role::Role;

/// Staff member returned by the backend "who am I" endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Backend user id.
    pub id: RecordId,
    /// Login email.
    #[serde(default)]
    pub email: Option<String>,
    /// Role string exactly as the backend sent it.
    #[serde(default)]
    pub role: Option<String>,
    /// Store location the user works at.
    #[serde(default)]
    pub location_id: Option<RecordId>,
}

impl CurrentUser {
    /// Role string when present and non-blank.
    pub fn role_name(&self) -> Option<&str> {
        self.role
            .as_deref()
            .map(str::trim)
            .filter(|role| !role.is_empty())
    }

    /// Parsed role, `None` for missing or unknown roles.
    pub fn known_role(&self) -> Option<Role> {
        self.role_name().and_then(Role::parse)
    }
}

/// Result of the session bootstrap call.
///
/// Decodes both `{ "user": {...} }` and a bare user object; `{ "user": null }`
/// and `{}` both mean "nobody is signed in".
///
/// # Examples
/// ```
/// use portal::domain::Session;
///
/// let session: Session =
///     serde_json::from_str(r#"{"user":{"id":1,"role":"cashier"}}"#).expect("session");
/// assert_eq!(session.role_name(), Some("cashier"));
///
/// let anonymous: Session = serde_json::from_str(r#"{"user":null}"#).expect("session");
/// assert!(!anonymous.is_authenticated());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Signed-in user, if any.
    pub user: Option<CurrentUser>,
}

impl Session {
    /// Session for a signed-in user.
    pub fn for_user(user: CurrentUser) -> Self {
        Self { user: Some(user) }
    }

    /// Session with nobody signed in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Role string of the signed-in user, if present and non-blank.
    pub fn role_name(&self) -> Option<&str> {
        self.user.as_ref().and_then(CurrentUser::role_name)
    }

    /// A session counts as authenticated only when it carries a role.
    pub fn is_authenticated(&self) -> bool {
        self.role_name().is_some()
    }
}

impl<'de> Deserialize<'de> for Session {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            // Tried first: a wrapper without `user` would otherwise swallow a
            // bare user object as an anonymous session.
            Bare(CurrentUser),
            Wrapped { user: Option<CurrentUser> },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Bare(user) => Self { user: Some(user) },
            Raw::Wrapped { user } => Self { user },
        })
    }
}

/// Cookies the visitor's browser sent, forwarded verbatim to the backend.
///
/// The value is treated as opaque and never logged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct BackendCredentials(Option<String>);

impl BackendCredentials {
    /// Credentials from a raw `Cookie` header value.
    pub fn from_cookie_header(header: Option<&str>) -> Self {
        Self(
            header
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_owned),
        )
    }

    /// No cookies at all.
    pub fn anonymous() -> Self {
        Self(None)
    }

    /// `Cookie` header value to forward, if any.
    pub fn cookie_header(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

impl fmt::Debug for BackendCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.0.is_some() { "present" } else { "absent" };
        f.debug_tuple("BackendCredentials").field(&state).finish()
    }
}
