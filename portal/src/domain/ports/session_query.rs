//! Driven port for the session bootstrap ("who am I") call.
//!
//! The role gate calls this on every protected request. Keeping it behind a
//! trait lets guard and handler tests script sessions without a backend.

use async_trait::async_trait;

use super::BackendError;
use crate::domain::{BackendCredentials, Session};

/// Port resolving the visitor's current session.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionQuery: Send + Sync {
    /// Ask the backend who the forwarded cookies belong to.
    async fn current_session(
        &self,
        credentials: &BackendCredentials,
    ) -> Result<Session, BackendError>;
}

/// Fixture returning the same session for every visitor.
#[derive(Debug, Clone, Default)]
pub struct FixtureSessionQuery {
    session: Session,
}

impl FixtureSessionQuery {
    /// Fixture answering with `session`.
    pub fn new(session: Session) -> Self {
        Self { session }
    }
}

#[async_trait]
impl SessionQuery for FixtureSessionQuery {
    async fn current_session(
        &self,
        _credentials: &BackendCredentials,
    ) -> Result<Session, BackendError> {
        Ok(self.session.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn default_fixture_is_anonymous() {
        let session = FixtureSessionQuery::default()
            .current_session(&BackendCredentials::anonymous())
            .await
            .expect("fixture session");
        assert!(!session.is_authenticated());
    }
}
