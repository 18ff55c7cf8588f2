//! Staff messaging, open to every signed-in role.
//!
//! ```text
//! GET  /messages
//! GET  /messages/threads/{id}
//! POST /messages/threads/{id}/messages {"body":"On my way"}
//! POST /messages/threads {"subject":"Till 2","recipients":["ana@store.test"],"body":"..."}
//! ```

use actix_web::{HttpResponse, get, post, web};
use async_trait::async_trait;
use pagination::{ListQuery, Page};
use tracing::warn;

use super::state::HttpState;
use super::views::{
    ListPageView, ListParams, RowAction, load_list, mutate_list, mutation_response, record_id,
    run_mutation,
};
use crate::domain::envelope::decode_page;
use crate::domain::forms::{NewThread, NewThreadInput, Reply, ReplyInput};
use crate::domain::ports::ResourceQuery;
use crate::domain::records::{Message, MessageThread, RecordId};
use crate::domain::resources::MESSAGE_THREADS;
use crate::domain::{BackendCredentials, Error, ListSource, ListView, SearchQuery};
use crate::inbound::http::ApiResult;

/// Register the messaging routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(threads)
        .service(thread_messages)
        .service(reply)
        .service(start_thread);
}

/// Messages of one thread; the path depends on the thread.
struct ThreadMessages<'a> {
    port: &'a dyn ResourceQuery,
    credentials: &'a BackendCredentials,
    path: String,
}

impl<'a> ThreadMessages<'a> {
    fn new(state: &'a HttpState, credentials: &'a BackendCredentials, thread: &RecordId) -> Self {
        Self {
            port: state.resources.as_ref(),
            credentials,
            path: MESSAGE_THREADS.member_action_path(thread.as_str(), "messages"),
        }
    }
}

#[async_trait]
impl ListSource<Message> for ThreadMessages<'_> {
    async fn fetch_page(&self, query: &ListQuery) -> Result<Page<Message>, Error> {
        let body = self
            .port
            .fetch(self.credentials, &self.path, query)
            .await
            .map_err(|err| {
                warn!(path = self.path.as_str(), error = %err, "thread load failed");
                Error::from(err)
            })?;
        Ok(decode_page(&body, "messages"))
    }
}

/// Threads the visitor takes part in.
#[get("")]
pub async fn threads(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<MessageThread>> {
    let query = ListQuery::new(state.page_size);
    let view = load_list(&state, &credentials, MESSAGE_THREADS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &params.search()))
}

/// Messages of one thread, oldest first as sent.
#[get("/threads/{id}")]
pub async fn thread_messages(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    params: web::Query<ListParams>,
) -> ApiResult<web::Json<ListPageView<Message>>> {
    let thread = record_id(&path)?;
    let source = ThreadMessages::new(&state, &credentials, &thread);
    let mut view = ListView::new(ListQuery::new(state.page_size));
    view.load_pages(&source, params.pages()).await;
    Ok(web::Json(ListPageView::of(&view, &params.search())))
}

/// Reply in a thread; answers with the thread's messages.
#[post("/threads/{id}/messages")]
pub async fn reply(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    path: web::Path<String>,
    payload: web::Json<ReplyInput>,
) -> ApiResult<HttpResponse> {
    let message = Reply::try_from_input(record_id(&path)?, &payload)?;
    let source = ThreadMessages::new(&state, &credentials, message.thread_id());
    let action = RowAction {
        scope: MESSAGE_THREADS.path(),
        key: message.thread_id(),
        command: message.to_command(),
        success: "Message sent".to_owned(),
    };
    let (view, outcome) = mutate_list::<Message, _>(
        &state,
        &credentials,
        &source,
        ListQuery::new(state.page_size),
        action,
    )
    .await;
    Ok(mutation_response(
        &outcome,
        &ListPageView::of(&view, &SearchQuery::default()),
    ))
}

/// Start a thread; answers with the thread list.
#[post("/threads")]
pub async fn start_thread(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    payload: web::Json<NewThreadInput>,
) -> ApiResult<HttpResponse> {
    let thread = NewThread::try_from_input(&payload)?;
    let (view, outcome) = run_mutation::<MessageThread>(
        &state,
        &credentials,
        MESSAGE_THREADS,
        ListQuery::new(state.page_size),
        &RecordId::form("thread"),
        thread.to_command(),
        "Thread started".to_owned(),
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
    #[case("admin")]
    #[case("cashier")]
    #[case("store_keeper")]
    #[actix_web::test]
    async fn every_role_reaches_its_threads(#[case] role: &str) {
        let resources = Arc::new(ScriptedResources::new().respond(
            "messages/threads",
            json!({"threads": [{"id": 3, "subject": "Till 2"}]}),
        ));
        let req = test::TestRequest::get().uri("/messages");

        let res = call(role, resources, Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["rows"][0]["subject"], "Till 2");
    }

    #[rstest]
    #[actix_web::test]
    async fn a_reply_reloads_the_thread_once() {
        let resources = Arc::new(ScriptedResources::new().respond(
            "messages/threads/3/messages",
            json!({"messages": [{"id": 10, "body": "hello"}, {"id": 11, "body": "on my way"}]}),
        ));
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/messages/threads/3/messages")
            .set_json(json!({"body": "on my way"}));

        let res = call("seller", Arc::clone(&resources), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(resources.requests_to("messages/threads/3/messages"), 1);
        assert_eq!(commands.submitted()[0].path, "messages/threads/3/messages");
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["banner"]["message"], "✓ Message sent");
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_replies_are_not_sent() {
        let commands = Arc::new(RecordingCommands::new());
        let req = test::TestRequest::post()
            .uri("/messages/threads/3/messages")
            .set_json(json!({"body": "   "}));

        let res = call("seller", Arc::new(ScriptedResources::new()), Arc::clone(&commands), req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert!(commands.submitted().is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn a_missing_thread_shows_an_error_banner() {
        let resources = Arc::new(ScriptedResources::new().fail(
            "messages/threads/99/messages",
            BackendError::status(404_u16, "thread not found"),
        ));
        let req = test::TestRequest::get().uri("/messages/threads/99");

        let res = call("manager", resources, Arc::new(RecordingCommands::new()), req).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["banner"]["kind"], "error");
        assert_eq!(body["banner"]["message"], "thread not found");
        assert_eq!(body["rows"], json!([]));
    }
}
