//! Role gate: decide whether a visitor may see a route.
//!
//! The gate is evaluated once per request by the guard middleware. Every
//! session failure (transport error, backend refusal, missing role) sends
//! the visitor to [`LOGIN_ROUTE`]; a signed-in visitor whose role the route
//! does not admit goes to their own landing route instead.

use std::collections::BTreeSet;

use serde::Serialize;
use tracing::debug;

use super::ports::SessionQuery;
use super::{BackendCredentials, CurrentUser, Error, Role, RoleRouteMap, Session};

/// Where unauthenticated visitors are sent.
pub const LOGIN_ROUTE: &str = "/login";

/// Which roles a route scope admits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessPolicy {
    /// Any signed-in staff member, including roles the portal does not know.
    AnyAuthenticated,
    /// Only the listed roles.
    Roles(BTreeSet<Role>),
}

impl AccessPolicy {
    /// Admit exactly one role.
    pub fn only(role: Role) -> Self {
        Self::Roles(BTreeSet::from([role]))
    }

    /// Admit any of `roles`.
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::Roles(roles.into_iter().collect())
    }

    /// Admit every signed-in visitor.
    pub fn any_authenticated() -> Self {
        Self::AnyAuthenticated
    }

    /// Whether a visitor with `role` (`None` when unknown) is admitted.
    pub fn admits(&self, role: Option<Role>) -> bool {
        match self {
            Self::AnyAuthenticated => true,
            Self::Roles(roles) => role.is_some_and(|role| roles.contains(&role)),
        }
    }
}

/// A visitor the gate let through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizedUser {
    /// User as the backend described them.
    pub user: CurrentUser,
    /// Parsed role; `None` for roles the portal does not know.
    pub role: Option<Role>,
}

impl AuthorizedUser {
    /// Login email, or an empty string when the backend omitted it.
    pub fn email(&self) -> &str {
        self.user.email.as_deref().unwrap_or_default()
    }
}

/// Why a visitor was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// No usable session.
    Unauthenticated,
    /// Signed in, but the route does not admit the role.
    RoleNotAdmitted,
}

/// Outcome of the gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// Run the handler for this user.
    Authorized(AuthorizedUser),
    /// Send the visitor elsewhere; the handler never runs.
    Redirect {
        /// Target route.
        location: String,
        /// Why.
        reason: RedirectReason,
    },
}

impl GateDecision {
    fn to_login() -> Self {
        Self::Redirect {
            location: LOGIN_ROUTE.to_owned(),
            reason: RedirectReason::Unauthenticated,
        }
    }
}

/// Role gate parameterised by the role-to-route table.
#[derive(Debug, Clone, Default)]
pub struct RoleGate {
    routes: RoleRouteMap,
}

impl RoleGate {
    /// Gate redirecting through `routes`.
    pub fn new(routes: RoleRouteMap) -> Self {
        Self { routes }
    }

    /// The role-to-route table.
    pub fn routes(&self) -> &RoleRouteMap {
        &self.routes
    }

    /// Decide for an already-resolved session.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::{AccessPolicy, GateDecision, Role, RoleGate, Session};
    ///
    /// let gate = RoleGate::default();
    /// let session: Session =
    ///     serde_json::from_str(r#"{"user":{"id":1,"role":"seller"}}"#).expect("session");
    /// let decision = gate.evaluate(&AccessPolicy::only(Role::Cashier), Ok(session));
    /// assert!(matches!(decision, GateDecision::Redirect { ref location, .. } if location == "/seller"));
    /// ```
    pub fn evaluate(&self, policy: &AccessPolicy, session: Result<Session, Error>) -> GateDecision {
        let Ok(Session { user: Some(user) }) = session else {
            return GateDecision::to_login();
        };
        let Some(role_name) = user.role_name() else {
            return GateDecision::to_login();
        };
        let role = Role::parse(role_name);
        if policy.admits(role) {
            return GateDecision::Authorized(AuthorizedUser { user, role });
        }
        GateDecision::Redirect {
            location: self.routes.landing_for(role_name).to_owned(),
            reason: RedirectReason::RoleNotAdmitted,
        }
    }

    /// Resolve the session through `port` and decide.
    pub async fn resolve(
        &self,
        port: &dyn SessionQuery,
        credentials: &BackendCredentials,
        policy: &AccessPolicy,
    ) -> GateDecision {
        let session = port.current_session(credentials).await.map_err(Error::from);
        if let Err(err) = &session {
            debug!(code = ?err.code(), error = %err, "session bootstrap failed");
        }
        let decision = self.evaluate(policy, session);
        if let GateDecision::Redirect { location, reason } = &decision {
            debug!(location = location.as_str(), ?reason, "role gate redirect");
        }
        decision
    }

    /// Landing route for a session: the role route when signed in,
    /// otherwise [`LOGIN_ROUTE`].
    pub fn landing_for(&self, session: &Session) -> &str {
        session
            .role_name()
            .map_or(LOGIN_ROUTE, |role| self.routes.landing_for(role))
    }
}
