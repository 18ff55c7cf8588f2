//! Pagination primitives shared by portal list screens.
//!
//! The backend owns pagination: it hands out opaque cursors and the portal
//! passes them back untouched. This crate keeps the client half honest:
//!
//! - [`Cursor`] wraps a server-issued token and refuses blank values.
//! - [`PageLimit`] clamps page sizes into the range the backend accepts.
//! - [`ListQuery`] bundles filters, cursor and limit and serialises them as
//!   query-string pairs.
//! - [`Page`] is the decoded envelope, and [`merge_unique`] appends a page
//!   to rows already on screen without duplicating primary keys.

mod cursor;
mod limit;
mod page;
mod query;

pub use cursor::{Cursor, CursorError};
pub use limit::PageLimit;
pub use page::{Keyed, Page, merge_unique};
pub use query::ListQuery;
