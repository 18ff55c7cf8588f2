//! Role guard middleware.
//!
//! Wrap a route scope with [`RoleGuard`] to run the role gate before any of
//! its handlers. Admitted visitors reach the handler with an
//! [`AuthorizedUser`] in the request extensions; everyone else receives a
//! `303 See Other` to their landing route or to the login page, and the
//! handler never runs.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::{HttpMessage, web};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use super::credentials::credentials_from_headers;
use super::state::HttpState;
use super::views::see_other;
use crate::domain::{AccessPolicy, Error, GateDecision, Role};

/// Middleware factory enforcing an [`AccessPolicy`] on a scope.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use portal::domain::Role;
/// use portal::inbound::http::guard::RoleGuard;
///
/// let _app = App::new().service(web::scope("/cashier").wrap(RoleGuard::only(Role::Cashier)));
/// ```
#[derive(Clone)]
pub struct RoleGuard {
    policy: Rc<AccessPolicy>,
}

impl RoleGuard {
    /// Guard with an explicit policy.
    pub fn new(policy: AccessPolicy) -> Self {
        Self {
            policy: Rc::new(policy),
        }
    }

    /// Admit one role.
    pub fn only(role: Role) -> Self {
        Self::new(AccessPolicy::only(role))
    }

    /// Admit any of `roles`.
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self::new(AccessPolicy::any_of(roles))
    }

    /// Admit every signed-in visitor.
    pub fn any_authenticated() -> Self {
        Self::new(AccessPolicy::any_authenticated())
    }
}

impl<S, B> Transform<S, ServiceRequest> for RoleGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RoleGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RoleGuardMiddleware {
            service: Rc::new(service),
            policy: Rc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`RoleGuard`].
pub struct RoleGuardMiddleware<S> {
    service: Rc<S>,
    policy: Rc<AccessPolicy>,
}

impl<S, B> Service<ServiceRequest> for RoleGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let policy = Rc::clone(&self.policy);
        Box::pin(async move {
            let Some(state) = req.app_data::<web::Data<HttpState>>().cloned() else {
                error!(path = req.path(), "role guard mounted without HttpState");
                return Err(Error::internal("portal state missing").into());
            };
            let credentials = credentials_from_headers(req.headers());
            let decision = state
                .gate
                .resolve(state.session.as_ref(), &credentials, &policy)
                .await;
            match decision {
                GateDecision::Authorized(user) => {
                    req.extensions_mut().insert(user);
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                GateDecision::Redirect { location, .. } => Ok(req
                    .into_response(see_other(&location))
                    .map_into_right_body()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    //! Guard behaviour against scripted sessions.

    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use actix_web::http::StatusCode;
    use actix_web::http::header::LOCATION;
    use actix_web::{App, HttpResponse, test};
    use rstest::rstest;
    use serde_json::json;

    use crate::domain::ports::{BackendError, FixtureSessionQuery, MockSessionQuery, SessionQuery};
    use crate::domain::{AuthorizedUser, Session};
    use crate::inbound::http::state::HttpStatePorts;

    fn session_for(role: &str) -> Session {
        serde_json::from_value(json!({"user": {"id": 1, "email": "ana@store.test", "role": role}}))
            .expect("session")
    }

    fn state_with(session: Arc<dyn SessionQuery>) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            session,
            ..HttpStatePorts::default()
        }))
    }

    async fn visit(
        session: Arc<dyn SessionQuery>,
        guard: RoleGuard,
        calls: Arc<AtomicUsize>,
    ) -> ServiceResponse {
        let app = test::init_service(
            App::new().app_data(state_with(session)).service(
                web::scope("/manager").wrap(guard).route(
                    "",
                    web::get().to(move |user: AuthorizedUser| {
                        let calls = Arc::clone(&calls);
                        async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            HttpResponse::Ok().body(user.email().to_owned())
                        }
                    }),
                ),
            ),
        )
        .await;
        test::call_service(&app, test::TestRequest::get().uri("/manager").to_request()).await
    }

    fn location(res: &ServiceResponse) -> &str {
        res.headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .expect("location header")
    }

    #[rstest]
    #[case("cashier", "/cashier")]
    #[case("seller", "/seller")]
    #[case("store-keeper", "/store-keeper")]
    #[case("auditor", "/")]
    #[actix_web::test]
    async fn other_roles_are_sent_to_their_landing_route(
        #[case] role: &str,
        #[case] expected: &str,
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let res = visit(
            Arc::new(FixtureSessionQuery::new(session_for(role))),
            RoleGuard::any_of([Role::Manager, Role::Admin]),
            Arc::clone(&calls),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), expected);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[actix_web::test]
    async fn session_failures_are_sent_to_login() {
        let mut port = MockSessionQuery::new();
        port.expect_current_session()
            .returning(|_| Err(BackendError::transport("connection refused")));
        let calls = Arc::new(AtomicUsize::new(0));

        let res = visit(Arc::new(port), RoleGuard::only(Role::Manager), Arc::clone(&calls)).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), "/login");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[rstest]
    #[actix_web::test]
    async fn admitted_role_reaches_the_handler() {
        let calls = Arc::new(AtomicUsize::new(0));
        let res = visit(
            Arc::new(FixtureSessionQuery::new(session_for("admin"))),
            RoleGuard::any_of([Role::Manager, Role::Admin]),
            Arc::clone(&calls),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let body = test::read_body(res).await;
        assert_eq!(body.as_ref(), b"ana@store.test");
    }
}
