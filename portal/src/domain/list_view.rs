//! Generic list-filter-paginate view.
//!
//! Every data screen follows the same shape: load a collection, narrow it
//! with the client-side filter, fetch further pages through the backend
//! cursor, and run row actions through the mutation protocol. [`ListView`]
//! implements that once; screens only choose the record type, the resource
//! and the filters.
//!
//! ## Mutation protocol
//! 1. The row is marked busy; a second action on a busy row is refused
//!    before any request is made.
//! 2. The action runs (a single POST/PATCH/DELETE).
//! 3. On success the list is reloaded exactly once and a success banner is
//!    set. On failure an error banner with the server's message is set and
//!    the rows are left untouched.
//! 4. The busy flag is cleared whatever happened.

use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use async_trait::async_trait;
use pagination::{Cursor, Keyed, ListQuery, Page, merge_unique};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::envelope::decode_page;
use super::ports::ResourceQuery;
use super::resources::Resource;
use super::{Banner, BackendCredentials, BusyRows, Error, SearchQuery, Searchable};

/// Most pages a single request may preload through load-more.
pub const MAX_PRELOAD_PAGES: u8 = 10;

const BUSY_MESSAGE: &str = "another action on this row is still in progress";

/// Anything that can serve one page of `T`.
#[async_trait]
pub trait ListSource<T>: Send + Sync {
    /// Fetch the page described by `query`.
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<T>, Error>;
}

/// [`ListSource`] backed by a backend resource.
pub struct BackendList<'a, T> {
    port: &'a dyn ResourceQuery,
    credentials: &'a BackendCredentials,
    resource: Resource,
    rows: PhantomData<fn() -> T>,
}

impl<'a, T> BackendList<'a, T> {
    /// Read `resource` through `port` on behalf of `credentials`.
    pub fn new(
        port: &'a dyn ResourceQuery,
        credentials: &'a BackendCredentials,
        resource: Resource,
    ) -> Self {
        Self {
            port,
            credentials,
            resource,
            rows: PhantomData,
        }
    }
}

#[async_trait]
impl<T> ListSource<T> for BackendList<'_, T>
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<T>, Error> {
        let body = self
            .port
            .fetch(self.credentials, self.resource.path(), query)
            .await
            .map_err(|err| {
                warn!(path = self.resource.path(), error = %err, "list load failed");
                Error::from(err)
            })?;
        Ok(decode_page(&body, self.resource.collection_key()))
    }
}

/// Which placeholder a list shows. Exactly one applies at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    /// A load is in flight, or nothing has been loaded yet.
    Loading,
    /// Loaded, and there are no rows.
    Empty,
    /// Loaded, with rows.
    Ready,
}

/// Result of a row action.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    /// The row was busy; nothing was sent.
    Refused,
    /// The backend accepted the action and the list was reloaded.
    Applied,
    /// The backend refused the action; rows are unchanged.
    Failed(Error),
}

impl MutationOutcome {
    /// Whether the action reached the backend and succeeded.
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// In-memory state of one list screen.
#[derive(Debug, Clone)]
pub struct ListView<T: Keyed> {
    query: ListQuery,
    rows: Vec<T>,
    next_cursor: Option<Cursor>,
    loading: bool,
    banner: Option<Banner>,
    busy: BusyRows,
}

impl<T> ListView<T>
where
    T: Keyed,
    T::Key: fmt::Display,
{
    /// Fresh view for `query`; nothing is loaded yet.
    pub fn new(query: ListQuery) -> Self {
        Self {
            query: query.first_page(),
            rows: Vec::new(),
            next_cursor: None,
            loading: true,
            banner: None,
            busy: BusyRows::new(),
        }
    }

    /// Use a shared busy registry, so concurrent requests see each other's
    /// in-flight actions.
    pub fn with_busy_rows(mut self, busy: BusyRows) -> Self {
        self.busy = busy;
        self
    }

    /// Load the first page, replacing the rows.
    ///
    /// On failure an error banner is set and the previous rows are kept.
    pub async fn load<S>(&mut self, source: &S)
    where
        S: ListSource<T> + ?Sized,
    {
        self.loading = true;
        let first = self.query.first_page();
        match source.fetch_page(&first).await {
            Ok(page) => {
                let mut rows = Vec::with_capacity(page.rows.len());
                merge_unique(&mut rows, page.rows);
                self.rows = rows;
                self.next_cursor = page.next_cursor;
                if self.banner.as_ref().is_some_and(Banner::is_error) {
                    self.banner = None;
                }
            }
            Err(err) => self.banner = Some(Banner::error(&err)),
        }
        self.loading = false;
    }

    /// Fetch the next page and append its unseen rows.
    ///
    /// Does nothing, and sends nothing, when there is no cursor. Returns the
    /// number of rows appended.
    pub async fn load_more<S>(&mut self, source: &S) -> usize
    where
        S: ListSource<T> + ?Sized,
    {
        let Some(cursor) = self.next_cursor.clone() else {
            return 0;
        };
        self.loading = true;
        let query = self.query.at_cursor(cursor);
        let appended = match source.fetch_page(&query).await {
            Ok(page) => {
                self.next_cursor = page.next_cursor;
                merge_unique(&mut self.rows, page.rows)
            }
            Err(err) => {
                self.banner = Some(Banner::error(&err));
                0
            }
        };
        self.loading = false;
        appended
    }

    /// Load the first page, then follow the cursor for up to `pages` pages
    /// in total (clamped to `1..=MAX_PRELOAD_PAGES`).
    pub async fn load_pages<S>(&mut self, source: &S, pages: u8)
    where
        S: ListSource<T> + ?Sized,
    {
        self.load(source).await;
        let extra = pages.clamp(1, MAX_PRELOAD_PAGES) - 1;
        for _ in 0..extra {
            if !self.can_load_more() || self.banner.as_ref().is_some_and(Banner::is_error) {
                break;
            }
            self.load_more(source).await;
        }
    }

    /// Run a row action through the mutation protocol.
    ///
    /// `action` is only polled when the row is not already busy.
    pub async fn mutate<S, A>(
        &mut self,
        key: &T::Key,
        action: A,
        success: impl Into<String>,
        source: &S,
    ) -> MutationOutcome
    where
        S: ListSource<T> + ?Sized,
        A: Future<Output = Result<(), Error>>,
    {
        let row = key.to_string();
        let Some(_busy) = self.busy.try_acquire(&row) else {
            debug!(row = %row, "refusing action on busy row");
            self.banner = Some(Banner::error(&Error::conflict(BUSY_MESSAGE)));
            return MutationOutcome::Refused;
        };

        match action.await {
            Ok(()) => {
                self.load(source).await;
                if let Some(banner) = self.banner.as_ref().filter(|b| b.is_error()) {
                    warn!(row = %row, reload_error = banner.message(), "reload after action failed");
                }
                self.banner = Some(Banner::success(success));
                MutationOutcome::Applied
            }
            Err(err) => {
                self.banner = Some(Banner::error(&err));
                MutationOutcome::Failed(err)
            }
        }
    }

    /// Drop loaded rows that fail `keep`, e.g. when the backend ignored a
    /// filter. The placeholder state follows the rows that remain.
    pub fn retain(&mut self, keep: impl FnMut(&T) -> bool) {
        self.rows.retain(keep);
    }

    /// Rows matching `query`, in load order.
    pub fn visible(&self, query: &SearchQuery) -> Vec<&T>
    where
        T: Searchable,
    {
        self.rows.iter().filter(|row| query.matches(*row)).collect()
    }

    /// All loaded rows.
    pub fn rows(&self) -> &[T] {
        &self.rows
    }

    /// Current placeholder state.
    pub fn state(&self) -> ViewState {
        if self.loading {
            ViewState::Loading
        } else if self.rows.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Ready
        }
    }

    /// Whether a "load more" control should be offered.
    pub fn can_load_more(&self) -> bool {
        !self.loading && self.next_cursor.is_some()
    }

    /// Cursor of the next page, if any.
    pub fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref()
    }

    /// Current banner.
    pub fn banner(&self) -> Option<&Banner> {
        self.banner.as_ref()
    }

    /// Replace the banner, e.g. with a form validation message.
    pub fn set_banner(&mut self, banner: Banner) {
        self.banner = Some(banner);
    }

    /// Query the view loads with.
    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Consume the view, returning its rows.
    pub fn into_rows(self) -> Vec<T> {
        self.rows
    }
}
