//! Client-side substring filtering for list screens.
//!
//! Result sets on staff screens are small (a few hundred rows at most), so
//! the filter is a straight scan: every row contributes a fixed set of
//! stringified fields and a row is kept when the normalised query occurs in
//! any of them.

/// Rows that expose text fields to the list filter.
pub trait Searchable {
    /// Field values the filter matches against, in display form.
    fn search_fields(&self) -> Vec<String>;
}

/// Normalised search text: trimmed and lower-cased.
///
/// # Examples
/// ```
/// use portal::domain::SearchQuery;
///
/// let query = SearchQuery::new("  ANA ");
/// assert_eq!(query.as_str(), "ana");
/// assert!(SearchQuery::new("   ").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery(String);

impl SearchQuery {
    /// Normalise raw input from a search box.
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    /// Build from an optional query parameter.
    pub fn from_optional(raw: Option<&str>) -> Self {
        raw.map(Self::new).unwrap_or_default()
    }

    /// Whether the query matches everything.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalised text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Whether `row` has a field containing the query.
    pub fn matches<T: Searchable + ?Sized>(&self, row: &T) -> bool {
        self.is_empty()
            || row
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(self.0.as_str()))
    }
}

/// Rows matching `query`, in their original order.
///
/// An empty query returns every row.
pub fn filter_rows<'a, T: Searchable>(rows: &'a [T], query: &SearchQuery) -> Vec<&'a T> {
    rows.iter().filter(|row| query.matches(*row)).collect()
}
