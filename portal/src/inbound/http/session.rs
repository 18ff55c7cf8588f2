//! Shared session routes.
//!
//! ```text
//! GET  /         redirect to the visitor's landing route
//! GET  /session  current user and landing route
//! POST /login    {"email":"ana@store.test","password":"..."}
//! POST /logout
//! ```
//!
//! The backend owns the session cookie; sign-in and sign-out relay its
//! `Set-Cookie` headers unchanged.

use actix_web::http::header::{CACHE_CONTROL, HeaderValue, SET_COOKIE};
use actix_web::{HttpResponse, HttpResponseBuilder, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use super::state::HttpState;
use super::views::see_other;
use crate::domain::{
    BackendCredentials, CurrentUser, Error, ErrorCode, LOGIN_ROUTE, LoginCredentials,
    LoginValidationError, Role, RoleGate, Session,
};
use crate::inbound::http::ApiResult;

/// Who is signed in and where they belong.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    /// Whether a user is signed in.
    pub authenticated: bool,
    /// The signed-in user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<CurrentUser>,
    /// Parsed role; absent for roles the portal does not know.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// Route the visitor should land on.
    pub landing_route: String,
    /// Explanation shown when no screen is available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SessionView {
    fn from_session(gate: &RoleGate, session: Session) -> Self {
        let landing_route = gate.landing_for(&session).to_owned();
        let message = session
            .role_name()
            .filter(|_| landing_route == gate.routes().fallback())
            .map(|role| format!("No portal screens are available for the role {role}."));
        let role = session.user.as_ref().and_then(CurrentUser::known_role);
        Self {
            authenticated: session.is_authenticated(),
            user: session.user,
            role,
            landing_route,
            message,
        }
    }

    fn signed_out() -> Self {
        Self {
            authenticated: false,
            user: None,
            role: None,
            landing_route: LOGIN_ROUTE.to_owned(),
            message: None,
        }
    }
}

/// Sign-in form.
#[derive(Deserialize)]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Password.
    #[serde(default)]
    pub password: String,
}

impl TryFrom<&LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: &LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let (field, code) = match err {
        LoginValidationError::EmptyEmail => ("email", "required"),
        LoginValidationError::MalformedEmail => ("email", "invalid_format"),
        LoginValidationError::EmptyPassword => ("password", "required"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field, "code": code }))
}

fn relay_cookies(builder: &mut HttpResponseBuilder, cookies: &[String]) {
    for cookie in cookies {
        match HeaderValue::from_str(cookie) {
            Ok(value) => {
                builder.append_header((SET_COOKIE, value));
            }
            Err(error) => warn!(%error, "dropping unrelayable Set-Cookie header"),
        }
    }
}

/// Send the visitor to their landing route.
///
/// Session failures and missing roles go to the login page. A signed-in
/// user whose role has no screens gets an explanation instead of a
/// redirect loop.
#[get("/")]
pub async fn landing(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
) -> HttpResponse {
    let session = match state.session.current_session(&credentials).await {
        Ok(session) => session,
        Err(error) => {
            debug!(%error, "session bootstrap failed on landing");
            return see_other(LOGIN_ROUTE);
        }
    };
    let view = SessionView::from_session(&state.gate, session);
    if view.message.is_some() {
        return HttpResponse::Ok()
            .insert_header((CACHE_CONTROL, "no-store"))
            .json(view);
    }
    see_other(&view.landing_route)
}

/// Describe the current session.
///
/// A backend 401 reads as "nobody is signed in"; other failures surface.
#[get("/session")]
pub async fn current_session(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
) -> ApiResult<web::Json<SessionView>> {
    match state.session.current_session(&credentials).await {
        Ok(session) => Ok(web::Json(SessionView::from_session(&state.gate, session))),
        Err(error) => {
            let error = Error::from(error);
            if error.code() == ErrorCode::Unauthorized {
                Ok(web::Json(SessionView::signed_out()))
            } else {
                Err(error)
            }
        }
    }
}

/// Sign in through the backend and relay its session cookie.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(&payload.into_inner()).map_err(map_login_validation_error)?;
    let signed_in = state.auth.login(&credentials).await.map_err(|error| {
        debug!(%error, "sign-in refused");
        Error::from(error)
    })?;
    let mut response = HttpResponse::Ok();
    response.insert_header((CACHE_CONTROL, "no-store"));
    relay_cookies(&mut response, &signed_in.set_cookies);
    Ok(response.json(SessionView::from_session(&state.gate, signed_in.session)))
}

/// Sign out and relay the cookie-clearing headers.
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
) -> ApiResult<HttpResponse> {
    let cookies = state.auth.logout(&credentials).await.map_err(Error::from)?;
    let mut response = HttpResponse::Ok();
    response.insert_header((CACHE_CONTROL, "no-store"));
    relay_cookies(&mut response, &cookies);
    Ok(response.json(SessionView::signed_out()))
}
