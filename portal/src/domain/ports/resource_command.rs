//! Driven port for pass-through mutations.
//!
//! Every mutation the portal performs is a single POST, PATCH or DELETE with
//! a hand-built JSON body. The backend decides whether it is allowed.

use async_trait::async_trait;
use serde_json::Value;

use super::BackendError;
use crate::domain::BackendCredentials;

/// HTTP verb of a backend mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandMethod {
    /// Create, or trigger an action.
    Post,
    /// Partial update.
    Patch,
    /// Removal.
    Delete,
}

impl CommandMethod {
    /// Verb as written on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

/// One mutation request.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendCommand {
    /// HTTP verb.
    pub method: CommandMethod,
    /// Path relative to the backend base URL.
    pub path: String,
    /// JSON body; `Value::Null` sends no body.
    pub body: Value,
}

impl BackendCommand {
    /// POST `body` to `path`.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: CommandMethod::Post,
            path: path.into(),
            body,
        }
    }

    /// PATCH `path` with `body`.
    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: CommandMethod::Patch,
            path: path.into(),
            body,
        }
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: CommandMethod::Delete,
            path: path.into(),
            body: Value::Null,
        }
    }
}

/// Port submitting mutations to the backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceCommand: Send + Sync {
    /// Send `command` and return the backend's JSON answer.
    async fn submit(
        &self,
        credentials: &BackendCredentials,
        command: &BackendCommand,
    ) -> Result<Value, BackendError>;
}

/// Fixture acknowledging every command.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResourceCommand;

#[async_trait]
impl ResourceCommand for FixtureResourceCommand {
    async fn submit(
        &self,
        _credentials: &BackendCredentials,
        _command: &BackendCommand,
    ) -> Result<Value, BackendError> {
        Ok(serde_json::json!({ "ok": true }))
    }
}
