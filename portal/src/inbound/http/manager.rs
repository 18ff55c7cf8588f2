//! Manager screens, also open to admins.
//!
//! ```text
//! GET  /manager
//! GET  /manager/adjustment-requests?status=PENDING
//! POST /manager/adjustment-requests/{id}/decision {"decision":"reject","reason":"miscount"}
//! GET  /manager/cash-reports?from=2026-03-01&to=2026-03-31&cashier=ana@store.test
//! GET  /manager/credits?status=OPEN
//! GET  /manager/expenses
//! GET  /manager/sales?status=COMPLETED
//! POST /manager/sales/{id}/cancel {"reason":"duplicate"}
//! POST /manager/sales/{id}/refund {"reason":"damaged"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::ListQuery;

use super::state::HttpState;
use super::views::{
    LandingView, ListPageView, ListParams, SaleRow, StatusFilter, load_list, mutation_response,
    record_id, run_mutation,
};
use crate::domain::forms::{
    AdjustmentDecision, AdjustmentDecisionInput, SaleActionInput, SaleActionRequest,
};
use crate::domain::records::{
    AdjustmentRequest, CashReport, Credit, Expense, Sale, SaleAction,
};
use crate::domain::reports::{CashReportParams, CashReportQuery};
use crate::domain::resources::{ADJUSTMENT_REQUESTS, CASH_REPORTS, CREDITS, EXPENSES, SALES};
use crate::domain::{AuthorizedUser, BackendCredentials, Error, SearchQuery};
use crate::inbound::http::ApiResult;

const SCREENS: &[&str] = &[
    "/manager/adjustment-requests",
    "/manager/cash-reports",
    "/manager/credits",
    "/manager/expenses",
    "/manager/sales",
    "/messages",
];

/// Register the manager routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing)
        .service(adjustment_requests)
        .service(decide_adjustment)
        .service(cash_reports)
        .service(credits)
        .service(expenses)
        .service(sales)
        .service(cancel_sale)
        .service(refund_sale);
}

/// Manager landing view.
#[get("")]
pub async fn landing(user: AuthorizedUser) -> web::Json<LandingView> {
    web::Json(LandingView {
        user,
        screens: SCREENS,
    })
}

/// Stock adjustment requests awaiting or past a decision.
#[get("/adjustment-requests")]
pub async fn adjustment_requests(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    filter: web::Query<StatusFilter>,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<AdjustmentRequest>> {
    let query = filter.apply(ListQuery::new(state.page_size));
    let view = load_list(&state, &credentials, ADJUSTMENT_REQUESTS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Approve or reject one adjustment request.
#[post("/adjustment-requests/{id}/decision")]
pub async fn decide_adjustment(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<AdjustmentDecisionInput>,
) -> ApiResult<HttpResponse> {
    let decision = AdjustmentDecision::try_from_input(record_id(&path)?, &payload)?;
    let (view, outcome) = run_mutation::<AdjustmentRequest>(
        &state,
        &credentials,
        ADJUSTMENT_REQUESTS,
        ListQuery::new(state.page_size),
        decision.request_id(),
        decision.to_command(),
        decision.success_message(),
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

/// Cash reports for a date range.
#[get("/cash-reports")]
pub async fn cash_reports(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    filters: web::Query<CashReportParams>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<ListPageView<CashReport>>> {
    let query = CashReportQuery::try_from_params(&filters)?.to_list_query(state.page_size);
    let view = load_list(&state, &credentials, CASH_REPORTS, query, params.pages()).await;
    Ok(web::Json(ListPageView::of(&view, &params.search())))
}

/// Customer credits.
#[get("/credits")]
pub async fn credits(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    filter: web::Query<StatusFilter>,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<Credit>> {
    let query = filter.apply(ListQuery::new(state.page_size));
    let view = load_list(&state, &credentials, CREDITS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Business expenses.
#[get("/expenses")]
pub async fn expenses(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<Expense>> {
    let query = ListQuery::new(state.page_size);
    let view = load_list(&state, &credentials, EXPENSES, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Sales with the actions each status offers.
#[get("/sales")]
pub async fn sales(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    filter: web::Query<StatusFilter>,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<SaleRow>> {
    let query = filter.apply(ListQuery::new(state.page_size));
    let view = load_list::<Sale>(&state, &credentials, SALES, query, params.pages()).await;
    web::Json(ListPageView::project(&view, &params.search(), |sale| SaleRow::from(sale)))
}

async fn act_on_sale(
    state: &HttpState,
    credentials: &BackendCredentials,
    raw_id: &str,
    action: SaleAction,
    input: &SaleActionInput,
) -> ApiResult<HttpResponse> {
    let request = SaleActionRequest::new(record_id(raw_id)?, action, input)
        .ok_or_else(|| Error::invalid_request("payments are recorded by the cashier"))?;
    let success = match request.action() {
        SaleAction::Refund => format!("Refund issued for sale #{}", request.sale_id()),
        SaleAction::Cancel | SaleAction::RecordPayment => {
            format!("Sale #{} cancelled", request.sale_id())
        }
    };
    let (view, outcome) = run_mutation::<Sale>(
        state,
        credentials,
        SALES,
        ListQuery::new(state.page_size),
        request.sale_id(),
        request.to_command(),
        success,
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::project(&view, &SearchQuery::default(), |sale| SaleRow::from(sale)),
    ))
}

/// Void a sale.
#[post("/sales/{id}/cancel")]
pub async fn cancel_sale(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<SaleActionInput>,
) -> ApiResult<HttpResponse> {
    act_on_sale(&state, &credentials, &path, SaleAction::Cancel, &payload).await
}

/// Refund a completed sale.
#[post("/sales/{id}/refund")]
pub async fn refund_sale(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<SaleActionInput>,
) -> ApiResult<HttpResponse> {
    act_on_sale(&state, &credentials, &path, SaleAction::Refund, &payload).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::domain::ports::BackendError;
    use crate::inbound::http::routes;
    use crate::test_support::ports::{RecordingCommands, ScriptedResources, ports_for};

    async fn call(
        role: &str,
        resources: Arc<ScriptedResources>,
        commands: Arc<RecordingCommands>,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let state = HttpState::new(ports_for(role, resources, commands));
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .configure(routes::configure),
        )
        .await;
        test::call_service(&app, req.to_request()).await
    }

    #[rstest]
    #[case("manager")]
    #[case("admin")]
    #[actix_web::test]
    async fn managers_and_admins_see_adjustment_requests(#[case] role: &str) {
        let resources = Arc::new(ScriptedResources::new().respond(
            "inventory/adjustment-requests",
            json!({"requests": [{"id": 9, "status": "PENDING", "productName": "Rice"}]}),
        ));
        let req = test::TestRequest::get().uri("/manager/adjustment-requests?status=PENDING");

        let res = call(role, Arc::clone(&resources), Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let seen = resources.seen();
        assert_eq!(seen[0].query.filter("status"), Some("PENDING"));
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["rows"][0]["productName"], "Rice");
    }

    #[rstest]
    #[actix_web::test]
    async fn rejected_decision_without_reason_is_refused_locally() {
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/manager/adjustment-requests/9/decision")
            .set_json(json!({"decision": "reject"}));

        let res = call(
            "manager",
            Arc::new(ScriptedResources::new()),
            Arc::clone(&commands),
            req,
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(commands.submitted().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn backend_refusal_surfaces_as_an_error_banner() {
        let resources = Arc::new(ScriptedResources::new().respond(
            "inventory/adjustment-requests",
            json!({"requests": [{"id": 9, "status": "APPROVED"}]}),
        ));
        let commands = Arc::new(RecordingCommands::failing(BackendError::status(
            409_u16,
            "request already decided",
        )));
        let req = test::TestRequest::post()
            .uri("/manager/adjustment-requests/9/decision")
            .set_json(json!({"decision": "approve"}));

        let res = call("manager", resources, Arc::clone(&commands), req).await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(commands.submitted().len(), 1);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["banner"]["kind"], "error");
        assert_eq!(body["banner"]["message"], "request already decided");
        assert_eq!(body["rows"][0]["status"], "APPROVED");
    }

    #[rstest]
    #[actix_web::test]
    async fn refund_posts_to_the_refunds_endpoint() {
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/manager/sales/6/refund")
            .set_json(json!({"reason": "damaged"}));

        let res = call(
            "manager",
            Arc::new(ScriptedResources::new()),
            Arc::clone(&commands),
            req,
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let submitted = commands.submitted();
        assert_eq!(submitted[0].path, "refunds");
        assert_eq!(submitted[0].body["saleId"], "6");
    }

    #[rstest]
    #[actix_web::test]
    async fn sales_rows_carry_allowed_actions() {
        let resources = Arc::new(ScriptedResources::new().respond(
            "sales",
            json!([{"id": 5, "status": "PENDING"}, {"id": 6, "status": "REFUNDED"}]),
        ));
        let req = test::TestRequest::get().uri("/manager/sales");

        let res = call("manager", resources, Arc::new(RecordingCommands::new()), req).await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["rows"][0]["allowedActions"], json!(["cancel"]));
        assert_eq!(body["rows"][1]["allowedActions"], json!([]));
    }
}
