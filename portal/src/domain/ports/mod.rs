//! Driven ports for the backend REST API.
//!
//! The portal owns no data. Every read and write goes through one of these
//! traits; the reqwest adapter in `outbound::backend` implements all of them
//! and the fixtures here keep handler tests offline.

mod macros;
pub(crate) use macros::define_port_error;

mod backend_error;
mod file_upload;
mod resource_command;
mod resource_query;
mod session_command;
mod session_query;

pub use backend_error::BackendError;
#[cfg(test)]
pub use file_upload::MockFileUpload;
pub use file_upload::{FileUpload, FixtureFileUpload, UploadFile};
#[cfg(test)]
pub use resource_command::MockResourceCommand;
pub use resource_command::{
    BackendCommand, CommandMethod, FixtureResourceCommand, ResourceCommand,
};
#[cfg(test)]
pub use resource_query::MockResourceQuery;
pub use resource_query::{FixtureResourceQuery, ResourceQuery};
#[cfg(test)]
pub use session_command::MockSessionCommand;
pub use session_command::{FixtureSessionCommand, SessionCommand, SignedIn};
#[cfg(test)]
pub use session_query::MockSessionQuery;
pub use session_query::{FixtureSessionQuery, SessionQuery};
