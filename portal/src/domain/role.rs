//! Staff roles and the role-to-landing-route table.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Route used when a role has no landing page of its own.
pub const FALLBACK_ROUTE: &str = "/";

/// Staff role as reported by the backend session endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full administrative access.
    Admin,
    /// Business owner; served by a separate owner portal.
    Owner,
    /// Store manager.
    Manager,
    /// Inventory and stock handling.
    StoreKeeper,
    /// Sales floor.
    Seller,
    /// Till and cash sessions.
    Cashier,
}

impl Role {
    /// Every role the backend is known to return.
    pub const ALL: [Self; 6] = [
        Self::Admin,
        Self::Owner,
        Self::Manager,
        Self::StoreKeeper,
        Self::Seller,
        Self::Cashier,
    ];

    /// Wire name used by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::Manager => "manager",
            Self::StoreKeeper => "store_keeper",
            Self::Seller => "seller",
            Self::Cashier => "cashier",
        }
    }

    /// Landing route for this role.
    pub fn landing_route(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Owner => "/owner",
            Self::Manager => "/manager",
            Self::StoreKeeper => "/store-keeper",
            Self::Seller => "/seller",
            Self::Cashier => "/cashier",
        }
    }

    /// Parse a backend role string.
    ///
    /// Matching ignores case and surrounding whitespace, and accepts `-` or a
    /// space in place of `_`.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::Role;
    ///
    /// assert_eq!(Role::parse("STORE-KEEPER"), Some(Role::StoreKeeper));
    /// assert_eq!(Role::parse(" cashier "), Some(Role::Cashier));
    /// assert_eq!(Role::parse("auditor"), None);
    /// ```
    pub fn parse(raw: &str) -> Option<Self> {
        let normalised: String = raw
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        Self::ALL
            .into_iter()
            .find(|role| role.as_str() == normalised)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static table from role string to landing route.
///
/// Lookups for roles missing from the table fall back to
/// [`FALLBACK_ROUTE`].
///
/// # Examples
/// ```
/// use portal::domain::RoleRouteMap;
///
/// let routes = RoleRouteMap::standard();
/// assert_eq!(routes.landing_for("store_keeper"), "/store-keeper");
/// assert_eq!(routes.landing_for("auditor"), "/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleRouteMap {
    routes: BTreeMap<Role, String>,
    fallback: String,
}

impl RoleRouteMap {
    /// The table covering every known role.
    pub fn standard() -> Self {
        Self {
            routes: Role::ALL
                .into_iter()
                .map(|role| (role, role.landing_route().to_owned()))
                .collect(),
            fallback: FALLBACK_ROUTE.to_owned(),
        }
    }

    /// Override the landing route for one role.
    pub fn with_route(mut self, role: Role, route: impl Into<String>) -> Self {
        self.routes.insert(role, route.into());
        self
    }

    /// Landing route for a parsed role.
    pub fn route_for(&self, role: Role) -> &str {
        self.routes
            .get(&role)
            .map_or(self.fallback.as_str(), String::as_str)
    }

    /// Landing route for a raw role string, falling back for unknown roles.
    pub fn landing_for(&self, raw_role: &str) -> &str {
        match Role::parse(raw_role) {
            Some(role) => self.route_for(role),
            None => self.fallback.as_str(),
        }
    }

    /// Route used for unknown roles.
    pub fn fallback(&self) -> &str {
        self.fallback.as_str()
    }
}

impl Default for RoleRouteMap {
    fn default() -> Self {
        Self::standard()
    }
}
