//! HTTP inbound adapter: the portal's pages as JSON endpoints.

pub mod admin;
pub mod cashier;
pub mod credentials;
pub mod error;
pub mod guard;
pub mod health;
pub mod manager;
pub mod messages;
pub mod owner;
pub mod routes;
pub mod seller;
pub mod session;
pub mod state;
pub mod store_keeper;
pub mod views;

pub use error::ApiResult;
