//! Request extractors for the visitor's identity.
//!
//! [`BackendCredentials`] are the raw cookies to forward; [`AuthorizedUser`]
//! is the user the role guard admitted and is only available behind it.

use actix_web::dev::Payload;
use actix_web::http::header::{COOKIE, HeaderMap};
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{AuthorizedUser, BackendCredentials, Error};

/// Cookies from every `Cookie` header, joined the way browsers send them.
pub(crate) fn credentials_from_headers(headers: &HeaderMap) -> BackendCredentials {
    let joined = headers
        .get_all(COOKIE)
        .filter_map(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join("; ");
    BackendCredentials::from_cookie_header(Some(joined.as_str()))
}

impl FromRequest for BackendCredentials {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(credentials_from_headers(req.headers())))
    }
}

impl FromRequest for AuthorizedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user = req.extensions().get::<Self>().cloned();
        ready(user.ok_or_else(|| Error::unauthorized("sign in required").into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    #[rstest]
    fn joins_split_cookie_headers() {
        let req = TestRequest::default()
            .append_header((COOKIE, "sid=1"))
            .append_header((COOKIE, "csrf=2"))
            .to_http_request();
        let credentials = credentials_from_headers(req.headers());
        assert_eq!(credentials.cookie_header(), Some("sid=1; csrf=2"));
    }

    #[rstest]
    fn missing_cookie_is_anonymous() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(credentials_from_headers(req.headers()), BackendCredentials::anonymous());
    }

    #[rstest]
    #[actix_web::test]
    async fn authorized_user_requires_the_guard() {
        let req = TestRequest::default().to_http_request();
        let err = AuthorizedUser::extract(&req).await.expect_err("no guard ran");
        assert_eq!(
            err.as_response_error().status_code(),
            actix_web::http::StatusCode::UNAUTHORIZED
        );
    }
}
