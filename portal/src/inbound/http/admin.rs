//! Admin screens.
//!
//! ```text
//! GET   /admin
//! GET   /admin/users?q=ana&pages=2
//! POST  /admin/users {"email":"ana@store.test","password":"...","role":"seller","locationId":"1"}
//! PATCH /admin/users/{id}/status {"active":false}
//! GET   /admin/audit-evidence?from=2026-01-01&to=2026-01-31&action=SALE_REFUNDED
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use pagination::ListQuery;
use serde::Serialize;
use tracing::{debug, warn};

use super::state::HttpState;
use super::views::{
    LandingView, ListPageView, ListParams, load_list, mutation_response, record_id, run_mutation,
};
use crate::domain::envelope::decode_rows;
use crate::domain::forms::{NewStaffUser, NewStaffUserInput, UserStatusChange, UserStatusInput};
use crate::domain::records::{AuditAction, AuditLogEntry, RecordId, StaffUser};
use crate::domain::reports::{AuditEvidenceParams, AuditEvidenceQuery};
use crate::domain::resources::{AUDIT_ACTIONS, AUDIT_LOGS, USERS};
use crate::domain::{AuthorizedUser, BackendCredentials, Error, SearchQuery};
use crate::inbound::http::ApiResult;

const SCREENS: &[&str] = &[
    "/admin/users",
    "/admin/audit-evidence",
    "/manager",
    "/messages",
];

/// Register the admin routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing)
        .service(list_users)
        .service(create_user)
        .service(set_user_status)
        .service(audit_evidence);
}

/// Admin landing view.
#[get("")]
pub async fn landing(user: AuthorizedUser) -> web::Json<LandingView> {
    web::Json(LandingView {
        user,
        screens: SCREENS,
    })
}

/// Staff accounts.
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<StaffUser>> {
    let query = ListQuery::new(state.page_size);
    let view = load_list(&state, &credentials, USERS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Create a staff account.
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    payload: web::Json<NewStaffUserInput>,
) -> ApiResult<HttpResponse> {
    let account = NewStaffUser::try_from_input(&payload)?;
    let (view, outcome) = run_mutation::<StaffUser>(
        &state,
        &credentials,
        USERS,
        ListQuery::new(state.page_size),
        &RecordId::form("user"),
        account.to_command(),
        format!("{} account created", account.role()),
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

/// Activate or deactivate a staff account.
#[patch("/users/{id}/status")]
pub async fn set_user_status(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<UserStatusInput>,
) -> ApiResult<HttpResponse> {
    let change = UserStatusChange::try_from_input(record_id(&path)?, &payload)?;
    let success = if change.active() {
        format!("User #{} activated", change.user_id())
    } else {
        format!("User #{} deactivated", change.user_id())
    };
    let (view, outcome) = run_mutation::<StaffUser>(
        &state,
        &credentials,
        USERS,
        ListQuery::new(state.page_size),
        change.user_id(),
        change.to_command(),
        success,
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

/// Audit log filtered for evidence, with the action vocabulary for the
/// filter form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvidenceView {
    /// Matching log entries.
    pub logs: ListPageView<AuditLogEntry>,
    /// Known action codes; empty when the vocabulary is unavailable.
    pub actions: Vec<AuditAction>,
}

async fn load_actions(state: &HttpState, credentials: &BackendCredentials) -> Vec<AuditAction> {
    match state
        .resources
        .fetch(credentials, AUDIT_ACTIONS.path(), &ListQuery::default())
        .await
    {
        Ok(body) => decode_rows(&body, AUDIT_ACTIONS.collection_key()),
        Err(error) => {
            let error = Error::from(error);
            if error.code().degrades_silently() {
                debug!(code = ?error.code(), "audit action vocabulary hidden");
            } else {
                warn!(%error, "audit action vocabulary failed to load");
            }
            Vec::new()
        }
    }
}

/// Audit evidence search.
#[get("/audit-evidence")]
pub async fn audit_evidence(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    filters: web::Query<AuditEvidenceParams>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<AuditEvidenceView>> {
    let query = AuditEvidenceQuery::try_from_params(&filters)?.to_list_query(state.page_size);
    let logs = load_list::<AuditLogEntry>(&state, &credentials, AUDIT_LOGS, query, params.pages());
    let actions = load_actions(&state, &credentials);
    let (logs, actions) = tokio::join!(logs, actions);
    Ok(web::Json(AuditEvidenceView {
        logs: ListPageView::of(&logs, &params.search()),
        actions,
    }))
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
        resources: Arc<ScriptedResources>,
        commands: Arc<RecordingCommands>,
        req: test::TestRequest,
    ) -> actix_web::dev::ServiceResponse {
        let state = HttpState::new(ports_for("admin", resources, commands));
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
    async fn invalid_accounts_never_reach_the_backend() {
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post().uri("/admin/users").set_json(json!({
            "email": "ana@store.test",
            "password": "short",
            "role": "seller",
            "locationId": "1",
        }));

        let res = call(Arc::new(ScriptedResources::new()), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["field"], "password");
        assert!(commands.submitted().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn deactivating_a_user_patches_and_reloads() {
        let resources = Arc::new(ScriptedResources::new().respond(
            "users",
            json!({"users": [{"id": 4, "email": "b@store.test", "active": false}]}),
        ));
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::patch()
            .uri("/admin/users/4/status")
            .set_json(json!({"active": false}));

        let res = call(Arc::clone(&resources), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(resources.requests_to("users"), 1);
        let submitted = commands.submitted();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].path, "users/4");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["banner"]["message"], "✓ User #4 deactivated");
        assert_eq!(body["rows"][0]["active"], false);
    }

    #[rstest]
    #[actix_web::test]
    async fn audit_evidence_degrades_without_the_vocabulary() {
        let resources = Arc::new(
            ScriptedResources::new()
                .respond("audit-logs", json!({"logs": [{"id": 1, "action": "SALE_REFUNDED"}]}))
                .fail("audit-logs/actions", BackendError::status(404_u16, "not found")),
        );
        let req = test::TestRequest::get().uri("/admin/audit-evidence?from=2026-01-01");

        let res = call(resources, Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["actions"], json!([]));
        assert_eq!(body["logs"]["rows"].as_array().map(Vec::len), Some(1));
        assert!(body["logs"].get("banner").is_none());
    }

    #[rstest]
    #[actix_web::test]
    async fn audit_evidence_rejects_inverted_ranges() {
        let req = test::TestRequest::get()
            .uri("/admin/audit-evidence?from=2026-02-01&to=2026-01-01");

        let res = call(Arc::new(ScriptedResources::new()), Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
