//! List query parameters passed through to the backend.

use std::collections::BTreeMap;

use url::form_urlencoded;

use crate::{Cursor, PageLimit};

/// Filters, cursor and page size for one list request.
///
/// Filters are kept in a sorted map so the serialised query string is stable,
/// which keeps request logs and test expectations deterministic.
///
/// # Examples
/// ```
/// use pagination::{ListQuery, PageLimit};
///
/// let query = ListQuery::new(PageLimit::new(20))
///     .with_filter("status", "AWAITING_PAYMENT_RECORD")
///     .with_filter("q", "  ");
/// assert_eq!(
///     query.to_query_string(),
///     "limit=20&status=AWAITING_PAYMENT_RECORD"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    filters: BTreeMap<String, String>,
    cursor: Option<Cursor>,
    limit: PageLimit,
}

impl ListQuery {
    /// Start an unfiltered query for the first page.
    #[must_use]
    pub fn new(limit: PageLimit) -> Self {
        Self {
            filters: BTreeMap::new(),
            cursor: None,
            limit,
        }
    }

    /// Add or replace a filter. Blank values remove the filter instead.
    #[must_use]
    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_filter(key, value);
        self
    }

    /// Add an optional filter, skipping `None`.
    #[must_use]
    pub fn with_optional_filter(self, key: impl Into<String>, value: Option<String>) -> Self {
        match value {
            Some(value) => self.with_filter(key, value),
            None => self,
        }
    }

    /// In-place variant of [`ListQuery::with_filter`].
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, trimmed.to_owned());
        }
    }

    /// The same query positioned at `cursor`.
    #[must_use]
    pub fn at_cursor(&self, cursor: Cursor) -> Self {
        Self {
            filters: self.filters.clone(),
            cursor: Some(cursor),
            limit: self.limit,
        }
    }

    /// The same query reset to the first page.
    #[must_use]
    pub fn first_page(&self) -> Self {
        Self {
            filters: self.filters.clone(),
            cursor: None,
            limit: self.limit,
        }
    }

    /// Active filters.
    #[must_use]
    pub const fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    /// Look up a single filter value.
    #[must_use]
    pub fn filter(&self, key: &str) -> Option<&str> {
        self.filters.get(key).map(String::as_str)
    }

    /// Cursor for the requested page, if any.
    #[must_use]
    pub const fn cursor(&self) -> Option<&Cursor> {
        self.cursor.as_ref()
    }

    /// Requested page size.
    #[must_use]
    pub const fn limit(&self) -> PageLimit {
        self.limit
    }

    /// Query-string pairs: `limit`, then `cursor` when present, then filters
    /// in key order.
    #[must_use]
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 2);
        pairs.push(("limit".to_owned(), self.limit.get().to_string()));
        if let Some(cursor) = &self.cursor {
            pairs.push(("cursor".to_owned(), cursor.as_str().to_owned()));
        }
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }

    /// URL-encoded query string without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.to_query_pairs() {
            serializer.append_pair(&key, &value);
        }
        serializer.finish()
    }
}
