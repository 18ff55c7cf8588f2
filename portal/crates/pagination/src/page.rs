//! Decoded page envelope and de-duplicating merge.

use std::collections::HashSet;
use std::hash::Hash;

use crate::Cursor;

/// Rows that carry a stable primary key.
pub trait Keyed {
    /// Key type used for de-duplication.
    type Key: Eq + Hash + Clone;

    /// Primary key of this row.
    fn key(&self) -> Self::Key;
}

/// One page of rows plus the cursor for the next page.
///
/// `next_cursor` is `None` both when the list is exhausted and when the
/// endpoint does not paginate at all; either way there is nothing more to
/// fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows in server order.
    pub rows: Vec<T>,
    /// Token for the following page.
    pub next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Build a page from rows and an optional continuation.
    #[must_use]
    pub const fn new(rows: Vec<T>, next_cursor: Option<Cursor>) -> Self {
        Self { rows, next_cursor }
    }

    /// A single, complete page with no continuation.
    #[must_use]
    pub const fn complete(rows: Vec<T>) -> Self {
        Self {
            rows,
            next_cursor: None,
        }
    }

    /// Whether another page can be requested.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::complete(Vec::new())
    }
}

/// Append `incoming` to `existing`, skipping rows whose key is already
/// present (in `existing` or earlier in `incoming`).
///
/// Existing rows are never removed or reordered. Returns the number of rows
/// appended.
///
/// # Examples
/// ```
/// use pagination::{Keyed, merge_unique};
///
/// #[derive(Debug, PartialEq)]
/// struct Row(u32);
///
/// impl Keyed for Row {
///     type Key = u32;
///     fn key(&self) -> u32 { self.0 }
/// }
///
/// let mut rows = vec![Row(1), Row(2)];
/// let added = merge_unique(&mut rows, vec![Row(2), Row(3)]);
/// assert_eq!(added, 1);
/// assert_eq!(rows, vec![Row(1), Row(2), Row(3)]);
/// ```
pub fn merge_unique<T: Keyed>(existing: &mut Vec<T>, incoming: Vec<T>) -> usize {
    let mut seen: HashSet<T::Key> = existing.iter().map(Keyed::key).collect();
    let before = existing.len();
    for row in incoming {
        if seen.insert(row.key()) {
            existing.push(row);
        }
    }
    existing.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        id: &'static str,
        label: &'static str,
    }

    impl Keyed for Row {
        type Key = &'static str;

        fn key(&self) -> Self::Key {
            self.id
        }
    }

    fn row(id: &'static str, label: &'static str) -> Row {
        Row { id, label }
    }

    #[rstest]
    fn overlapping_rows_keep_the_original_copy() {
        let mut rows = vec![row("a", "first"), row("b", "first")];
        let added = merge_unique(&mut rows, vec![row("b", "second"), row("c", "second")]);
        assert_eq!(added, 1);
        assert_eq!(
            rows,
            vec![row("a", "first"), row("b", "first"), row("c", "second")]
        );
    }

    #[rstest]
    fn duplicates_within_incoming_page_are_collapsed() {
        let mut rows = Vec::new();
        let added = merge_unique(&mut rows, vec![row("x", "1"), row("x", "2")]);
        assert_eq!(added, 1);
        assert_eq!(rows.first().map(|r| r.label), Some("1"));
    }

    #[rstest]
    fn empty_page_has_no_continuation() {
        let page: Page<Row> = Page::default();
        assert!(!page.has_more());
        assert!(page.rows.is_empty());
    }
}
