//! Backend REST adapter.
//!
//! A thin reqwest implementation of every backend port. Resource paths are
//! resolved against one configured base URL; the visitor's cookies and the
//! request trace id travel with each call.

mod client;
mod response;

pub use client::{BackendHttpClient, LOGIN_PATH, LOGOUT_PATH, SESSION_PATH};
