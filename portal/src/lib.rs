//! Staff portal for the point-of-sale backend.
//!
//! The portal is a backend-for-frontend: it holds no data of its own, gates
//! each role's screens, and relays list reads and mutations to the backend
//! REST API through the ports in [`domain::ports`].

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use middleware::Trace;
