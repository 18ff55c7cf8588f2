//! JSON view models and the shared list and mutation flows.
//!
//! Every list screen answers with a [`ListPageView`]: the visible rows, the
//! banner, the placeholder state and whether more pages exist. Row actions
//! answer with the same view after the mutation protocol has run.

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, LOCATION};
use pagination::{Keyed, ListQuery};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::status_for;
use super::state::HttpState;
use crate::domain::ports::BackendCommand;
use crate::domain::records::{RecordId, Sale, SaleAction};
use crate::domain::resources::Resource;
use crate::domain::{
    AuthorizedUser, BackendCredentials, BackendList, Banner, Error, ListSource, ListView,
    MAX_PRELOAD_PAGES, MutationOutcome, SearchQuery, Searchable, ViewState,
};

/// Query parameters shared by every list route.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Client-side substring filter.
    #[serde(default)]
    pub q: Option<String>,
    /// Pages to preload through load-more; clamped to `1..=10`.
    #[serde(default)]
    pub pages: Option<u32>,
}

impl ListParams {
    /// Normalised filter text.
    pub fn search(&self) -> SearchQuery {
        SearchQuery::from_optional(self.q.as_deref())
    }

    /// Requested page count, clamped to `1..=MAX_PRELOAD_PAGES`.
    pub fn pages(&self) -> u8 {
        self.pages.map_or(1, |pages| {
            u8::try_from(pages.clamp(1, u32::from(MAX_PRELOAD_PAGES))).unwrap_or(MAX_PRELOAD_PAGES)
        })
    }
}

/// Optional `status` filter forwarded to the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusFilter {
    /// Backend status value, e.g. `PENDING`.
    #[serde(default)]
    pub status: Option<String>,
}

impl StatusFilter {
    /// Apply the filter to `query` when present and non-blank.
    pub fn apply(&self, query: ListQuery) -> ListQuery {
        let status = self
            .status
            .as_deref()
            .map(str::trim)
            .filter(|status| !status.is_empty())
            .map(str::to_owned);
        query.with_optional_filter("status", status)
    }
}

/// One list screen as the browser renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPageView<R> {
    /// Rows matching the filter, in load order.
    pub rows: Vec<R>,
    /// Rows loaded before filtering.
    pub loaded: usize,
    /// Placeholder state.
    pub state: ViewState,
    /// Success or error banner.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub banner: Option<Banner>,
    /// Whether a further page exists.
    pub can_load_more: bool,
    /// Opaque token of the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<R> ListPageView<R> {
    /// Project `view` through the filter, mapping each visible row.
    pub fn project<T>(view: &ListView<T>, search: &SearchQuery, row: impl Fn(&T) -> R) -> Self
    where
        T: Keyed + Searchable,
        T::Key: std::fmt::Display,
    {
        Self {
            rows: view.visible(search).into_iter().map(row).collect(),
            loaded: view.rows().len(),
            state: view.state(),
            banner: view.banner().cloned(),
            can_load_more: view.can_load_more(),
            next_cursor: view.next_cursor().map(|cursor| cursor.as_str().to_owned()),
        }
    }
}

impl<T> ListPageView<T>
where
    T: Keyed + Searchable + Clone,
    T::Key: std::fmt::Display,
{
    /// Project `view` through the filter, keeping rows as they are.
    pub fn of(view: &ListView<T>, search: &SearchQuery) -> Self {
        Self::project(view, search, T::clone)
    }
}

/// A sale with the actions its status offers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleRow {
    /// The sale as the backend sent it.
    #[serde(flatten)]
    pub sale: Sale,
    /// Buttons to show; the backend still decides.
    pub allowed_actions: &'static [SaleAction],
}

impl From<&Sale> for SaleRow {
    fn from(sale: &Sale) -> Self {
        Self {
            sale: sale.clone(),
            allowed_actions: sale.allowed_actions(),
        }
    }
}

/// Landing view of a role scope.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandingView {
    /// Signed-in user.
    pub user: AuthorizedUser,
    /// Screens reachable from here, as route paths.
    pub screens: &'static [&'static str],
}

/// `303 See Other` to `location`, never cached.
pub(crate) fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((LOCATION, location))
        .insert_header((CACHE_CONTROL, "no-store"))
        .finish()
}

/// Parse a row id from the path.
pub(crate) fn record_id(raw: &str) -> Result<RecordId, Error> {
    RecordId::new(raw).ok_or_else(|| Error::invalid_request("id must not be blank"))
}

/// Load `resource` with `query`, following the cursor for `pages` pages.
pub(crate) async fn load_list<T>(
    state: &HttpState,
    credentials: &BackendCredentials,
    resource: Resource,
    query: ListQuery,
    pages: u8,
) -> ListView<T>
where
    T: Keyed + DeserializeOwned + Send + 'static,
    T::Key: std::fmt::Display,
{
    let source = BackendList::<T>::new(state.resources.as_ref(), credentials, resource);
    let mut view = ListView::new(query);
    view.load_pages(&source, pages).await;
    view
}

/// One row action: what to send and where the list lives.
pub(crate) struct RowAction<'a> {
    /// Busy-registry scope, usually the collection path.
    pub scope: &'a str,
    /// Row the action targets.
    pub key: &'a RecordId,
    /// The single backend write.
    pub command: BackendCommand,
    /// Banner text on success.
    pub success: String,
}

/// Run `action` through the mutation protocol against `source` and return
/// the list as it stands afterwards.
///
/// Success reloads once and carries a success banner. Failure and busy
/// refusal load the current rows and keep the error banner.
pub(crate) async fn mutate_list<T, S>(
    state: &HttpState,
    credentials: &BackendCredentials,
    source: &S,
    query: ListQuery,
    action: RowAction<'_>,
) -> (ListView<T>, MutationOutcome)
where
    T: Keyed<Key = RecordId>,
    S: ListSource<T> + ?Sized,
{
    let RowAction {
        scope,
        key,
        command,
        success,
    } = action;
    let mut view = ListView::new(query).with_busy_rows(state.busy.scoped(scope));
    let commands = state.commands.as_ref();
    let write = async {
        commands
            .submit(credentials, &command)
            .await
            .map(drop)
            .map_err(Error::from)
    };
    let outcome = view.mutate(key, write, success, source).await;
    if !outcome.is_applied() {
        let banner = view.banner().cloned();
        view.load(source).await;
        if let Some(banner) = banner {
            view.set_banner(banner);
        }
    }
    debug!(path = command.path.as_str(), ?outcome, "row action finished");
    (view, outcome)
}

/// [`mutate_list`] against a backend collection.
pub(crate) async fn run_mutation<T>(
    state: &HttpState,
    credentials: &BackendCredentials,
    resource: Resource,
    query: ListQuery,
    key: &RecordId,
    command: BackendCommand,
    success: String,
) -> (ListView<T>, MutationOutcome)
where
    T: Keyed<Key = RecordId> + DeserializeOwned + Send + 'static,
{
    let source = BackendList::<T>::new(state.resources.as_ref(), credentials, resource);
    let action = RowAction {
        scope: resource.path(),
        key,
        command,
        success,
    };
    mutate_list(state, credentials, &source, query, action).await
}

/// HTTP status for a finished mutation.
pub(crate) fn mutation_status(outcome: &MutationOutcome) -> StatusCode {
    match outcome {
        MutationOutcome::Applied => StatusCode::OK,
        MutationOutcome::Refused => StatusCode::CONFLICT,
        MutationOutcome::Failed(err) => status_for(err.code()),
    }
}

/// Respond to a mutation with the list it affected.
pub(crate) fn mutation_response<R: Serialize>(
    outcome: &MutationOutcome,
    page: &ListPageView<R>,
) -> HttpResponse {
    HttpResponse::build(mutation_status(outcome)).json(page)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(MutationOutcome::Applied, StatusCode::OK)]
    #[case(MutationOutcome::Refused, StatusCode::CONFLICT)]
    #[case(MutationOutcome::Failed(Error::from_status(422, "bad")), StatusCode::BAD_REQUEST)]
    #[case(MutationOutcome::Failed(Error::conflict("paid")), StatusCode::CONFLICT)]
    #[case(
        MutationOutcome::Failed(Error::service_unavailable("down")),
        StatusCode::SERVICE_UNAVAILABLE
    )]
    fn mutation_status_follows_the_outcome(
        #[case] outcome: MutationOutcome,
        #[case] expected: StatusCode,
    ) {
        assert_eq!(mutation_status(&outcome), expected);
    }

    #[rstest]
    #[case(None, 1)]
    #[case(Some(0), 1)]
    #[case(Some(4), 4)]
    #[case(Some(300), 10)]
    fn pages_are_clamped_to_the_preload_range(#[case] pages: Option<u32>, #[case] expected: u8) {
        let params = ListParams { q: None, pages };
        assert_eq!(params.pages(), expected);
    }

    #[rstest]
    fn sale_rows_flatten_the_sale_and_list_actions() {
        let sale: Sale =
            serde_json::from_value(json!({"id": 5, "status": "COMPLETED"})).expect("sale");
        let row = serde_json::to_value(SaleRow::from(&sale)).expect("serialise");
        assert_eq!(row["id"], json!("5"));
        assert_eq!(row["allowedActions"], json!(["refund"]));
    }

    #[rstest]
    #[case("7", Some("7"))]
    #[case("  ", None)]
    fn record_ids_from_the_path(#[case] raw: &str, #[case] expected: Option<&str>) {
        let parsed = record_id(raw).ok();
        assert_eq!(parsed.as_ref().map(RecordId::as_str), expected);
    }

    #[rstest]
    fn see_other_is_not_cached() {
        let res = see_other("/login");
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(CACHE_CONTROL).and_then(|v| v.to_str().ok()),
            Some("no-store")
        );
    }
}
