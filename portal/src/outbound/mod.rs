//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! The portal has a single collaborator, the backend REST API. Adapters are
//! thin translators between domain types and HTTP; they contain no business
//! logic.

pub mod backend;
