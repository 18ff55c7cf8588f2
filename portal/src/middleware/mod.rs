//! Request middleware.
//!
//! Role gating lives with the HTTP adapter; this module only carries
//! cross-cutting concerns that apply to every route.

pub mod trace;

pub use trace::Trace;
