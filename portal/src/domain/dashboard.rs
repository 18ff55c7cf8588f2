//! Cashier dashboard: KPI tiles loaded concurrently.
//!
//! Each tile is loaded independently and only ever writes its own slot. All
//! loads are registered with the caller's [`FetchScope`]; a cancelled scope
//! leaves the affected tiles as [`Kpi::Cancelled`]. Optional tiles hide
//! themselves when the backend answers `forbidden` or `not_found`.
//!
//! Counting tiles follow the backend cursor for up to [`MAX_PRELOAD_PAGES`]
//! pages, so a paged collection is counted in full.

use chrono::NaiveDate;
use pagination::{Keyed, ListQuery, PageLimit, merge_unique};
use serde::Serialize;

use super::list_view::{BackendList, ListSource, MAX_PRELOAD_PAGES};
use super::ports::ResourceQuery;
use super::records::{CashSession, Credit, Payment, Sale, SaleStatus};
use super::resources::{CASH_SESSIONS, CREDITS, PAYMENTS, SALES};
use super::{BackendCredentials, Error, FetchScope};

/// State of one dashboard tile.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum Kpi<V> {
    /// Loaded value.
    Ready(V),
    /// Optional tile the visitor may not see.
    Hidden,
    /// Load failed; the message is shown on the tile.
    Failed(String),
    /// The owning scope was cancelled before the load finished.
    Cancelled,
}

impl<V> Kpi<V> {
    fn settle(outcome: Option<Result<V, Error>>, optional: bool) -> Self {
        match outcome {
            None => Self::Cancelled,
            Some(Ok(value)) => Self::Ready(value),
            Some(Err(err)) if optional && err.code().degrades_silently() => Self::Hidden,
            Some(Err(err)) => Self::Failed(err.message().to_owned()),
        }
    }

    /// Loaded value, if any.
    pub fn value(&self) -> Option<&V> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// The cashier's landing screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CashierDashboard {
    /// Sales waiting for a payment to be recorded.
    pub awaiting_payment: Kpi<usize>,
    /// The cashier's open till session, if any.
    pub open_session: Kpi<Option<CashSession>>,
    /// Payments recorded today.
    pub payments_today: Kpi<usize>,
    /// Customer credits still open. Hidden when not permitted.
    pub open_credits: Kpi<usize>,
}

/// Backend query for sales awaiting payment.
///
/// The status filter narrows the request; rows are still checked locally
/// with [`awaiting_only`] because not every endpoint honours it.
pub fn awaiting_payment_query(limit: PageLimit) -> ListQuery {
    ListQuery::new(limit).with_filter("status", SaleStatus::AwaitingPaymentRecord.as_str())
}

/// Sales in `rows` that still await payment, in order.
pub fn awaiting_only<'a>(rows: impl IntoIterator<Item = &'a Sale>) -> Vec<&'a Sale> {
    rows.into_iter().filter(|sale| sale.awaits_payment()).collect()
}

/// Every row of `query`, following the cursor for at most
/// [`MAX_PRELOAD_PAGES`] pages. The first failure aborts the count.
async fn collect_pages<T: Keyed>(
    source: &dyn ListSource<T>,
    query: &ListQuery,
) -> Result<Vec<T>, Error> {
    let first = source.fetch_page(&query.first_page()).await?;
    let mut rows = Vec::with_capacity(first.rows.len());
    merge_unique(&mut rows, first.rows);
    let mut next = first.next_cursor;
    for _ in 1..MAX_PRELOAD_PAGES {
        let Some(cursor) = next.take() else {
            break;
        };
        let page = source.fetch_page(&query.at_cursor(cursor)).await?;
        merge_unique(&mut rows, page.rows);
        next = page.next_cursor;
    }
    Ok(rows)
}

async fn count_awaiting(source: &dyn ListSource<Sale>, limit: PageLimit) -> Result<usize, Error> {
    let rows = collect_pages(source, &awaiting_payment_query(limit)).await?;
    Ok(awaiting_only(&rows).len())
}

async fn find_open_session(
    source: &dyn ListSource<CashSession>,
    limit: PageLimit,
) -> Result<Option<CashSession>, Error> {
    let page = source
        .fetch_page(&ListQuery::new(limit).with_filter("status", "OPEN"))
        .await?;
    Ok(page.rows.into_iter().find(CashSession::is_open))
}

async fn count_payments(
    source: &dyn ListSource<Payment>,
    limit: PageLimit,
    today: NaiveDate,
) -> Result<usize, Error> {
    let query = ListQuery::new(limit).with_filter("from", today.format("%Y-%m-%d").to_string());
    Ok(collect_pages(source, &query).await?.len())
}

async fn count_open_credits(source: &dyn ListSource<Credit>, limit: PageLimit) -> Result<usize, Error> {
    let query = ListQuery::new(limit).with_filter("status", "OPEN");
    Ok(collect_pages(source, &query).await?.len())
}

/// Load every tile concurrently within `scope`.
pub async fn load_cashier_dashboard(
    port: &dyn ResourceQuery,
    credentials: &BackendCredentials,
    limit: PageLimit,
    today: NaiveDate,
    scope: &mut FetchScope,
) -> CashierDashboard {
    let sales = BackendList::<Sale>::new(port, credentials, SALES);
    let sessions = BackendList::<CashSession>::new(port, credentials, CASH_SESSIONS);
    let payments = BackendList::<Payment>::new(port, credentials, PAYMENTS);
    let credits = BackendList::<Credit>::new(port, credentials, CREDITS);

    let awaiting = scope.guard(count_awaiting(&sales, limit));
    let session = scope.guard(find_open_session(&sessions, limit));
    let paid = scope.guard(count_payments(&payments, limit, today));
    let credit = scope.guard(count_open_credits(&credits, limit));
    let (awaiting, session, paid, credit) = tokio::join!(awaiting, session, paid, credit);

    CashierDashboard {
        awaiting_payment: Kpi::settle(FetchScope::settle(awaiting), false),
        open_session: Kpi::settle(FetchScope::settle(session), false),
        payments_today: Kpi::settle(FetchScope::settle(paid), false),
        open_credits: Kpi::settle(FetchScope::settle(credit), true),
    }
}
