//! Shared world for portal behaviour suites.
//!
//! Steps stay synchronous: every request builds a fresh app over the
//! world's port doubles and drives it on a dedicated actix system. Scripts
//! queued by `given` steps are frozen into the resource double on the first
//! request of a scenario.

use std::cell::RefCell;
use std::sync::Arc;

use actix_rt::{System, SystemRunner};
use actix_web::http::header::LOCATION;
use actix_web::{App, test, web};
use async_trait::async_trait;
use portal::Trace;
use portal::domain::ports::{BackendError, FixtureSessionQuery, SessionQuery};
use portal::domain::{BackendCredentials, Session};
use portal::inbound::http::error::json_error_handler;
use portal::inbound::http::routes;
use portal::inbound::http::state::{HttpState, HttpStatePorts};
use portal::test_support::ports::{RecordingCommands, ScriptedResources, ports_for};
use serde_json::Value;

/// Session port whose bootstrap call always fails.
struct FailingSession;

#[async_trait]
impl SessionQuery for FailingSession {
    async fn current_session(
        &self,
        _credentials: &BackendCredentials,
    ) -> Result<Session, BackendError> {
        Err(BackendError::transport("connection refused"))
    }
}

/// How the visitor appears to the session bootstrap.
#[derive(Debug, Clone, Default)]
pub(crate) enum Visitor {
    #[default]
    SignedOut,
    SessionFails,
    SignedIn(String),
}

/// What the last request produced.
#[derive(Debug, Clone)]
pub(crate) struct Observed {
    pub(crate) status: u16,
    pub(crate) location: Option<String>,
    pub(crate) body: Option<Value>,
}

#[derive(Default)]
struct Scenario {
    visitor: Visitor,
    scripts: Vec<(String, Result<Value, BackendError>)>,
    resources: Option<Arc<ScriptedResources>>,
    commands: Arc<RecordingCommands>,
    observed: Option<Observed>,
}

pub(crate) struct PortalWorld {
    system: SystemRunner,
    scenario: RefCell<Scenario>,
}

impl Default for PortalWorld {
    fn default() -> Self {
        Self {
            system: System::new(),
            scenario: RefCell::default(),
        }
    }
}

impl PortalWorld {
    pub(crate) fn sign_in(&self, role: &str) {
        self.scenario.borrow_mut().visitor = Visitor::SignedIn(role.to_owned());
    }

    pub(crate) fn sign_out(&self) {
        self.scenario.borrow_mut().visitor = Visitor::SignedOut;
    }

    pub(crate) fn break_session(&self) {
        self.scenario.borrow_mut().visitor = Visitor::SessionFails;
    }

    /// Queue `body` as the next backend answer for `path`.
    pub(crate) fn script(&self, path: &str, body: Value) {
        self.scenario
            .borrow_mut()
            .scripts
            .push((path.to_owned(), Ok(body)));
    }

    /// Refuse every command with `error`.
    pub(crate) fn refuse_commands(&self, error: BackendError) {
        self.scenario.borrow_mut().commands = Arc::new(RecordingCommands::failing(error));
    }

    fn resources(&self) -> Arc<ScriptedResources> {
        let mut scenario = self.scenario.borrow_mut();
        if let Some(resources) = &scenario.resources {
            return Arc::clone(resources);
        }
        let scripted = scenario
            .scripts
            .drain(..)
            .fold(ScriptedResources::new(), |acc, (path, answer)| match answer {
                Ok(body) => acc.respond(&path, body),
                Err(error) => acc.fail(&path, error),
            });
        let resources = Arc::new(scripted);
        scenario.resources = Some(Arc::clone(&resources));
        resources
    }

    fn ports(&self) -> HttpStatePorts {
        let resources = self.resources();
        let scenario = self.scenario.borrow();
        let commands = Arc::clone(&scenario.commands);
        match &scenario.visitor {
            Visitor::SignedIn(role) => ports_for(role, resources, commands),
            Visitor::SignedOut => HttpStatePorts {
                session: Arc::new(FixtureSessionQuery::default()),
                resources,
                commands,
                ..HttpStatePorts::default()
            },
            Visitor::SessionFails => HttpStatePorts {
                session: Arc::new(FailingSession),
                resources,
                commands,
                ..HttpStatePorts::default()
            },
        }
    }

    /// Send `req` through the full portal route table.
    pub(crate) fn send(&self, req: test::TestRequest) {
        let state = web::Data::new(HttpState::new(self.ports()));
        let observed = self.system.block_on(async move {
            let app = test::init_service(
                App::new()
                    .app_data(state)
                    .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                    .wrap(Trace)
                    .configure(routes::configure),
            )
            .await;
            let res = test::call_service(&app, req.to_request()).await;
            let status = res.status().as_u16();
            let location = res
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned);
            let bytes = test::read_body(res).await;
            let body = serde_json::from_slice(&bytes).ok();
            Observed {
                status,
                location,
                body,
            }
        });
        self.scenario.borrow_mut().observed = Some(observed);
    }

    pub(crate) fn get(&self, uri: &str) {
        self.send(test::TestRequest::get().uri(uri));
    }

    pub(crate) fn post_json(&self, uri: &str, payload: Value) {
        self.send(test::TestRequest::post().uri(uri).set_json(payload));
    }

    pub(crate) fn observed(&self) -> Observed {
        self.scenario
            .borrow()
            .observed
            .clone()
            .expect("a request was sent")
    }

    pub(crate) fn body(&self) -> Value {
        self.observed().body.expect("response body is JSON")
    }

    pub(crate) fn requests_to(&self, path: &str) -> usize {
        self.resources().requests_to(path)
    }

    pub(crate) fn commands_sent(&self) -> usize {
        self.scenario.borrow().commands.submitted().len()
    }

    pub(crate) fn list_requests(&self) -> usize {
        self.resources().seen().len()
    }
}
