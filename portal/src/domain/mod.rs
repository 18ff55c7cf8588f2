//! Domain primitives, view logic and ports.
//!
//! Purpose: hold everything the portal decides on its own, independent of
//! actix and reqwest. The backend is reached only through the traits in
//! [`ports`]; the HTTP adapter turns the types here into responses.
//!
//! Public surface:
//! - Error / ErrorCode: the portal's error payload and stable category.
//! - Role / RoleRouteMap: role parsing and landing routes.
//! - RoleGate / AccessPolicy: the per-route authorisation decision.
//! - ListView: load, filter, paginate and mutate a backend collection.
//! - Money / Amount: exact monetary amounts.
//! - forms: validated write payloads for every screen that submits.

pub mod auth;
pub mod banner;
pub mod busy;
pub mod dashboard;
pub mod envelope;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod gate;
pub mod list_view;
pub mod money;
pub mod owner_portal;
pub mod ports;
pub mod records;
pub mod reports;
pub mod resources;
pub mod role;
pub mod search;
pub mod session;
pub mod trace_id;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::banner::{Banner, BannerKind};
pub use self::busy::{BusyGuard, BusyRows};
pub use self::dashboard::{CashierDashboard, Kpi};
pub use self::error::{Error, ErrorCode};
pub use self::fetch::FetchScope;
pub use self::gate::{
    AccessPolicy, AuthorizedUser, GateDecision, LOGIN_ROUTE, RedirectReason, RoleGate,
};
pub use self::list_view::{
    BackendList, ListSource, ListView, MAX_PRELOAD_PAGES, MutationOutcome, ViewState,
};
pub use self::money::{Amount, Money, MoneyParseError};
pub use self::owner_portal::OwnerPortal;
pub use self::role::{FALLBACK_ROUTE, Role, RoleRouteMap};
pub use self::search::{SearchQuery, Searchable, filter_rows};
pub use self::session::{BackendCredentials, CurrentUser, Session};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

