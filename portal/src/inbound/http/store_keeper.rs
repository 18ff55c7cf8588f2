//! Store-keeper screens.
//!
//! ```text
//! GET  /store-keeper
//! GET  /store-keeper/inventory?q=rice
//! GET  /store-keeper/stock-requests?status=PENDING
//! POST /store-keeper/stock-requests {"productId":"p-1","quantity":12}
//! GET  /store-keeper/arrivals
//! ```

use actix_web::{HttpResponse, get, post, web};
use pagination::ListQuery;

use super::state::HttpState;
use super::views::{
    LandingView, ListPageView, ListParams, StatusFilter, load_list, mutation_response,
    run_mutation,
};
use crate::domain::forms::{NewStockRequest, NewStockRequestInput};
use crate::domain::records::{InventoryArrival, InventoryItem, RecordId, StockRequest};
use crate::domain::resources::{INVENTORY, INVENTORY_ARRIVALS, STOCK_REQUESTS};
use crate::domain::{AuthorizedUser, BackendCredentials, SearchQuery};
use crate::inbound::http::ApiResult;

const SCREENS: &[&str] = &[
    "/store-keeper/inventory",
    "/store-keeper/stock-requests",
    "/store-keeper/arrivals",
    "/messages",
];

/// Register the store-keeper routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing)
        .service(inventory)
        .service(stock_requests)
        .service(request_stock)
        .service(arrivals);
}

#[get("")]
pub async fn landing(user: AuthorizedUser) -> web::Json<LandingView> {
    web::Json(LandingView {
        user,
        screens: SCREENS,
    })
}

/// Stock on hand.
#[get("/inventory")]
pub async fn inventory(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<InventoryItem>> {
    let view = load_list(
        &state,
        &credentials,
        INVENTORY,
        ListQuery::new(state.page_size),
        params.pages(),
    )
    .await;
    web::Json(ListPageView::of(&view, &params.search()))
}

#[get("/stock-requests")]
pub async fn stock_requests(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    filter: web::Query<StatusFilter>,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<StockRequest>> {
    let query = filter.apply(ListQuery::new(state.page_size));
    let view = load_list(&state, &credentials, STOCK_REQUESTS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Ask for stock to be sent to this location.
#[post("/stock-requests")]
pub async fn request_stock(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    payload: web::Json<NewStockRequestInput>,
) -> ApiResult<HttpResponse> {
    let request = NewStockRequest::try_from_input(&payload)?;
    let (view, outcome) = run_mutation::<StockRequest>(
        &state,
        &credentials,
        STOCK_REQUESTS,
        ListQuery::new(state.page_size),
        &RecordId::form("stock-request"),
        request.to_command(),
        format!("Requested {} units", request.quantity()),
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

/// Deliveries received.
#[get("/arrivals")]
pub async fn arrivals(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<InventoryArrival>> {
    let view = load_list(
        &state,
        &credentials,
        INVENTORY_ARRIVALS,
        ListQuery::new(state.page_size),
        params.pages(),
    )
    .await;
    web::Json(ListPageView::of(&view, &params.search()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use crate::inbound::http::routes;
    use crate::test_support::ports::{RecordingCommands, ScriptedResources, ports_for};

    async fn call(
        resources: Arc<ScriptedResources>,
        commands: Arc<RecordingCommands>,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let state = HttpState::new(ports_for("store_keeper", resources, commands));
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
    async fn load_more_is_offered_only_with_a_cursor() {
        let resources = Arc::new(ScriptedResources::new().respond(
            "inventory",
            json!({"inventory": [{"id": 1, "productName": "Rice"}], "nextCursor": null}),
        ));
        let req = test::TestRequest::get().uri("/store-keeper/inventory");

        let res = call(resources, Arc::new(RecordingCommands::new()), req).await;

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["canLoadMore"], false);
        assert!(body.get("nextCursor").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn preloading_pages_follows_the_cursor() {
        let resources = Arc::new(
            ScriptedResources::new()
                .respond(
                    "inventory",
                    json!({"inventory": [{"id": 1}], "nextCursor": "c2"}),
                )
                .respond("inventory", json!({"inventory": [{"id": 2}], "nextCursor": null})),
        );
        let req = test::TestRequest::get().uri("/store-keeper/inventory?pages=3");

        let res = call(Arc::clone(&resources), Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(resources.requests_to("inventory"), 2);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["loaded"], 2);
        assert_eq!(body["canLoadMore"], false);
    }

    #[rstest]
    #[case(json!({"productId": "p-1", "quantity": 0}), StatusCode::BAD_REQUEST, 0)]
    #[case(json!({"productId": "p-1", "quantity": "12"}), StatusCode::OK, 1)]
    #[actix_web::test]
    async fn stock_requests_are_validated_first(
        #[case] payload: Value,
        #[case] status: StatusCode,
        #[case] posts: usize,
    ) {
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/store-keeper/stock-requests")
            .set_json(payload);

        let res = call(Arc::new(ScriptedResources::new()), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), status);
        assert_eq!(commands.submitted().len(), posts);
    }
}
