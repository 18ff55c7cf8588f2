//! Driven port for reading backend collections.
//!
//! The port returns raw JSON: envelope shapes vary per endpoint, so decoding
//! into records happens in the domain (see [`crate::domain::envelope`]).

use async_trait::async_trait;
use pagination::ListQuery;
use serde_json::Value;

use super::BackendError;
use crate::domain::BackendCredentials;

/// Port issuing GET requests against backend resources.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceQuery: Send + Sync {
    /// GET `path` with the query's limit, cursor and filters.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use pagination::ListQuery;
    /// use portal::domain::BackendCredentials;
    /// use portal::domain::ports::{FixtureResourceQuery, ResourceQuery};
    ///
    /// let body = FixtureResourceQuery
    ///     .fetch(&BackendCredentials::anonymous(), "sales", &ListQuery::default())
    ///     .await?;
    /// assert!(body["rows"].as_array().is_some());
    /// # Ok::<(), portal::domain::ports::BackendError>(())
    /// ```
    async fn fetch(
        &self,
        credentials: &BackendCredentials,
        path: &str,
        query: &ListQuery,
    ) -> Result<Value, BackendError>;
}

/// Fixture answering every collection with an empty, unpaginated list.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureResourceQuery;

#[async_trait]
impl ResourceQuery for FixtureResourceQuery {
    async fn fetch(
        &self,
        _credentials: &BackendCredentials,
        _path: &str,
        _query: &ListQuery,
    ) -> Result<Value, BackendError> {
        Ok(serde_json::json!({ "rows": [], "nextCursor": null }))
    }
}
