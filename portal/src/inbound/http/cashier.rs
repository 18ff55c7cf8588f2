//! Cashier screens.
//!
//! ```text
//! GET  /cashier
//! GET  /cashier/awaiting-payment
//! POST /cashier/sales/{id}/payments {"amount":1000,"method":"cash"}
//! GET  /cashier/cash-sessions
//! POST /cashier/cash-sessions {"openingBalance":0}
//! POST /cashier/cash-sessions/{id}/close {"countedCash":1250.5}
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::ListQuery;

use super::state::HttpState;
use super::views::{
    ListPageView, ListParams, SaleRow, load_list, mutation_response, record_id, run_mutation,
};
use crate::domain::dashboard::{CashierDashboard, awaiting_payment_query, load_cashier_dashboard};
use crate::domain::forms::{
    CloseCashSession, CloseCashSessionInput, OpenCashSession, OpenCashSessionInput, RecordPayment,
    RecordPaymentInput,
};
use crate::domain::records::{CashSession, RecordId, Sale};
use crate::domain::resources::{CASH_SESSIONS, SALES};
use crate::domain::{BackendCredentials, FetchScope, ListView, SearchQuery};
use crate::inbound::http::ApiResult;

/// Register the cashier routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard)
        .service(awaiting_payment)
        .service(record_payment)
        .service(cash_sessions)
        .service(open_cash_session)
        .service(close_cash_session);
}

/// KPI tiles, loaded concurrently.
#[get("")]
pub async fn dashboard(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
) -> web::Json<CashierDashboard> {
    let mut scope = FetchScope::new();
    let today = chrono::Utc::now().date_naive();
    let tiles = load_cashier_dashboard(
        state.resources.as_ref(),
        &credentials,
        state.page_size,
        today,
        &mut scope,
    )
    .await;
    web::Json(tiles)
}

fn awaiting_page(mut view: ListView<Sale>, search: &SearchQuery) -> ListPageView<SaleRow> {
    view.retain(Sale::awaits_payment);
    ListPageView::project(&view, search, |sale| SaleRow::from(sale))
}

/// Sales waiting for a payment to be recorded.
#[get("/awaiting-payment")]
pub async fn awaiting_payment(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<SaleRow>> {
    let query = awaiting_payment_query(state.page_size);
    let view = load_list::<Sale>(&state, &credentials, SALES, query, params.pages()).await;
    web::Json(awaiting_page(view, &params.search()))
}

/// Record the customer's payment for one sale.
#[post("/sales/{id}/payments")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<RecordPaymentInput>,
) -> ApiResult<HttpResponse> {
    let payment = RecordPayment::try_from_input(record_id(&path)?, &payload)?;
    let (view, outcome) = run_mutation::<Sale>(
        &state,
        &credentials,
        SALES,
        awaiting_payment_query(state.page_size),
        payment.sale_id(),
        payment.to_command(),
        format!("Payment recorded for sale #{}", payment.sale_id()),
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &awaiting_page(view, &SearchQuery::default()),
    ))
}

/// The cashier's till sessions.
#[get("/cash-sessions")]
pub async fn cash_sessions(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<CashSession>> {
    let query = ListQuery::new(state.page_size);
    let view = load_list(&state, &credentials, CASH_SESSIONS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Open a till session.
#[post("/cash-sessions")]
pub async fn open_cash_session(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    payload: web::Json<OpenCashSessionInput>,
) -> ApiResult<HttpResponse> {
    let opening = OpenCashSession::try_from_input(&payload)?;
    let (view, outcome) = run_mutation::<CashSession>(
        &state,
        &credentials,
        CASH_SESSIONS,
        ListQuery::new(state.page_size),
        &RecordId::form("cash-session"),
        opening.to_command(),
        "Cash session opened".to_owned(),
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

/// Close a till session with the counted cash.
#[post("/cash-sessions/{id}/close")]
pub async fn close_cash_session(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<CloseCashSessionInput>,
) -> ApiResult<HttpResponse> {
    let closing = CloseCashSession::try_from_input(record_id(&path)?, &payload)?;
    let (view, outcome) = run_mutation::<CashSession>(
        &state,
        &credentials,
        CASH_SESSIONS,
        ListQuery::new(state.page_size),
        closing.session_id(),
        closing.to_command(),
        format!("Cash session #{} closed", closing.session_id()),
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::{fixture, rstest};
    use serde_json::{Value, json};

    use crate::inbound::http::routes;
    use crate::test_support::ports::{RecordingCommands, ScriptedResources, ports_for};

    #[fixture]
    fn mixed_sales() -> ScriptedResources {
        ScriptedResources::new().respond(
            "sales",
            json!({"sales": [
                {"id": 5, "status": "AWAITING_PAYMENT_RECORD", "totalAmount": 1000},
                {"id": 6, "status": "COMPLETED", "totalAmount": 2000}
            ]}),
        )
    }

    async fn call(
        resources: Arc<ScriptedResources>,
        commands: Arc<RecordingCommands>,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let state = HttpState::new(ports_for("cashier", resources, commands));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes::configure),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    #[rstest]
    #[actix_web::test]
    async fn awaiting_view_keeps_only_awaiting_sales(mixed_sales: ScriptedResources) {
        let resources = Arc::new(mixed_sales);
        let req = test::TestRequest::get().uri("/cashier/awaiting-payment");

        let res = call(Arc::clone(&resources), Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            resources.seen()[0].query.filter("status"),
            Some("AWAITING_PAYMENT_RECORD")
        );
        let body: Value = test::read_body_json(res).await;
        let rows = body["rows"].as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["id"], "5");
        assert_eq!(rows[0]["allowedActions"], json!(["record_payment", "cancel"]));
    }

    #[rstest]
    #[actix_web::test]
    async fn awaiting_view_is_empty_when_no_sale_awaits_payment() {
        let resources = Arc::new(
            ScriptedResources::new()
                .respond("sales", json!({"sales": [{"id": 6, "status": "COMPLETED"}]})),
        );
        let req = test::TestRequest::get().uri("/cashier/awaiting-payment");

        let res = call(resources, Arc::new(RecordingCommands::new()), req).await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["rows"], json!([]));
        assert_eq!(body["loaded"], 0);
        assert_eq!(body["state"], "empty");
    }

    #[rstest]
    #[actix_web::test]
    async fn dashboard_counts_awaiting_sales(mixed_sales: ScriptedResources) {
        let req = test::TestRequest::get().uri("/cashier");

        let res = call(Arc::new(mixed_sales), Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["awaitingPayment"], json!({"state": "ready", "value": 1}));
    }

    #[rstest]
    #[actix_web::test]
    async fn dashboard_counts_awaiting_sales_across_pages() {
        let resources = ScriptedResources::new()
            .respond(
                "sales",
                json!({"sales": [{"id": 5, "status": "AWAITING_PAYMENT_RECORD"}], "nextCursor": "c1"}),
            )
            .respond(
                "sales",
                json!({"sales": [{"id": 7, "status": "AWAITING_PAYMENT_RECORD"}], "nextCursor": null}),
            );
        let req = test::TestRequest::get().uri("/cashier");

        let res = call(Arc::new(resources), Arc::new(RecordingCommands::new()), req).await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["awaitingPayment"], json!({"state": "ready", "value": 2}));
    }

    #[rstest]
    #[case(json!(-1), StatusCode::BAD_REQUEST, 0)]
    #[case(json!(0), StatusCode::OK, 1)]
    #[actix_web::test]
    async fn opening_balance_is_validated_before_posting(
        #[case] opening_balance: Value,
        #[case] status: StatusCode,
        #[case] posts: usize,
    ) {
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/cashier/cash-sessions")
            .set_json(json!({"openingBalance": opening_balance}));

        let res = call(Arc::new(ScriptedResources::new()), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), status);
        assert_eq!(commands.submitted().len(), posts);
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_balance_names_the_field() {
        let req = test::TestRequest::post()
            .uri("/cashier/cash-sessions")
            .set_json(json!({"openingBalance": -1}));

        let res = call(
            Arc::new(ScriptedResources::new()),
            Arc::new(RecordingCommands::new()),
            req,
        )
        .await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "openingBalance");
    }

    #[rstest]
    #[actix_web::test]
    async fn recording_a_payment_posts_once_and_reloads(mixed_sales: ScriptedResources) {
        let resources = Arc::new(mixed_sales);
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/cashier/sales/5/payments")
            .set_json(json!({"amount": 1000, "method": "cash"}));

        let res = call(Arc::clone(&resources), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let submitted = commands.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].path, "payments");
        assert_eq!(resources.requests_to("sales"), 1);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["banner"]["kind"], "success");
    }

    #[rstest]
    #[actix_web::test]
    async fn other_roles_are_sent_to_their_landing() {
        let state = HttpState::new(ports_for(
            "seller",
            Arc::new(ScriptedResources::new()),
            Arc::new(RecordingCommands::new()),
        ));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes::configure),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/cashier/awaiting-payment").to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers()
                .get(actix_web::http::header::LOCATION)
                .and_then(|v| v.to_str().ok()),
            Some("/seller")
        );
    }
}
