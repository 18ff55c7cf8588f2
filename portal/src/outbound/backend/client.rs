//! Reqwest-backed adapter for the backend REST API.
//!
//! This adapter owns transport details only: URL building, cookie and trace
//! forwarding, timeout and status mapping, and JSON decoding. It implements
//! every backend port so the server wires a single client.

use std::time::Duration;

use async_trait::async_trait;
use pagination::ListQuery;
use reqwest::header::{ACCEPT, COOKIE, HeaderMap, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, RequestBuilder, Url};
use serde_json::{Value, json};
use tracing::{debug, warn};

use super::response::{error_message, json_body, upload_urls};
use crate::domain::ports::{
    BackendCommand, BackendError, CommandMethod, FileUpload, ResourceCommand, ResourceQuery,
    SessionCommand, SessionQuery, SignedIn, UploadFile,
};
use crate::domain::resources::UPLOADS;
use crate::domain::{BackendCredentials, LoginCredentials, Session, TRACE_ID_HEADER, TraceId};

/// Session bootstrap ("who am I") endpoint.
pub const SESSION_PATH: &str = "auth/me";
/// Sign-in endpoint.
pub const LOGIN_PATH: &str = "auth/login";
/// Sign-out endpoint.
pub const LOGOUT_PATH: &str = "auth/logout";

const UPLOAD_FIELD: &str = "files";

/// Backend adapter sharing one connection pool across all ports.
#[derive(Debug, Clone)]
pub struct BackendHttpClient {
    client: Client,
    base_url: Url,
}

struct Reply {
    body: Value,
    set_cookies: Vec<String>,
}

impl BackendHttpClient {
    /// Build an adapter with an explicit request timeout.
    /// ```rust,ignore
    /// let backend = BackendHttpClient::new(base_url, Duration::from_secs(30))?;
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    /// Base URL every resource path is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| BackendError::invalid_request(format!("bad backend path {path}: {err}")))
    }

    fn request(&self, method: Method, url: Url, credentials: &BackendCredentials) -> RequestBuilder {
        let mut builder = self
            .client
            .request(method, url)
            .header(ACCEPT, "application/json");
        if let Some(cookie) = credentials.cookie_header() {
            builder = builder.header(COOKIE, cookie);
        }
        if let Some(trace_id) = TraceId::current() {
            builder = builder.header(TRACE_ID_HEADER, trace_id.to_string());
        }
        builder
    }

    async fn execute(&self, builder: RequestBuilder) -> Result<Reply, BackendError> {
        let response = builder.send().await.map_err(map_transport_error)?;
        let status = response.status();
        let set_cookies = set_cookie_values(response.headers());
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            let message = error_message(status.as_u16(), body.as_ref());
            debug!(status = status.as_u16(), %message, "backend refused request");
            return Err(BackendError::status(status.as_u16(), message));
        }
        let body = json_body(body.as_ref())
            .map_err(|err| BackendError::decode(format!("invalid JSON payload: {err}")))?;
        Ok(Reply { body, set_cookies })
    }
}

#[async_trait]
impl SessionQuery for BackendHttpClient {
    async fn current_session(
        &self,
        credentials: &BackendCredentials,
    ) -> Result<Session, BackendError> {
        let url = self.endpoint(SESSION_PATH)?;
        let reply = self.execute(self.request(Method::GET, url, credentials)).await?;
        decode_session(reply.body)
    }
}

#[async_trait]
impl SessionCommand for BackendHttpClient {
    async fn login(&self, credentials: &LoginCredentials) -> Result<SignedIn, BackendError> {
        let url = self.endpoint(LOGIN_PATH)?;
        let body = json!({
            "email": credentials.email(),
            "password": credentials.password(),
        });
        let builder = self
            .request(Method::POST, url, &BackendCredentials::anonymous())
            .json(&body);
        let reply = self.execute(builder).await?;
        Ok(SignedIn {
            session: decode_session(reply.body)?,
            set_cookies: reply.set_cookies,
        })
    }

    async fn logout(&self, credentials: &BackendCredentials) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(LOGOUT_PATH)?;
        let reply = self.execute(self.request(Method::POST, url, credentials)).await?;
        Ok(reply.set_cookies)
    }
}

#[async_trait]
impl ResourceQuery for BackendHttpClient {
    async fn fetch(
        &self,
        credentials: &BackendCredentials,
        path: &str,
        query: &ListQuery,
    ) -> Result<Value, BackendError> {
        let mut url = self.endpoint(path)?;
        let pairs = query.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        let reply = self.execute(self.request(Method::GET, url, credentials)).await?;
        Ok(reply.body)
    }
}

#[async_trait]
impl ResourceCommand for BackendHttpClient {
    async fn submit(
        &self,
        credentials: &BackendCredentials,
        command: &BackendCommand,
    ) -> Result<Value, BackendError> {
        let url = self.endpoint(&command.path)?;
        let mut builder = self.request(http_method(command.method), url, credentials);
        if !command.body.is_null() {
            builder = builder.json(&command.body);
        }
        let reply = self.execute(builder).await?;
        Ok(reply.body)
    }
}

#[async_trait]
impl FileUpload for BackendHttpClient {
    async fn upload(
        &self,
        credentials: &BackendCredentials,
        files: &[UploadFile],
    ) -> Result<Vec<String>, BackendError> {
        let url = self.endpoint(UPLOADS.path())?;
        let form = multipart_form(files)?;
        let reply = self
            .execute(self.request(Method::POST, url, credentials).multipart(form))
            .await?;
        let urls = upload_urls(&reply.body);
        if urls.is_empty() {
            return Err(BackendError::decode("upload response carried no URL"));
        }
        Ok(urls)
    }
}

fn multipart_form(files: &[UploadFile]) -> Result<Form, BackendError> {
    files.iter().try_fold(Form::new(), |form, file| {
        let part = Part::bytes(file.bytes.clone()).file_name(file.file_name.clone());
        let part = match file.content_type.as_deref() {
            Some(mime) => part
                .mime_str(mime)
                .map_err(|err| BackendError::invalid_request(format!("{}: {err}", file.file_name)))?,
            None => part,
        };
        Ok(form.part(UPLOAD_FIELD, part))
    })
}

fn decode_session(body: Value) -> Result<Session, BackendError> {
    if body.is_null() {
        return Ok(Session::anonymous());
    }
    serde_json::from_value(body)
        .map_err(|err| BackendError::decode(format!("invalid session payload: {err}")))
}

fn http_method(method: CommandMethod) -> Method {
    match method {
        CommandMethod::Post => Method::POST,
        CommandMethod::Patch => Method::PATCH,
        CommandMethod::Delete => Method::DELETE,
    }
}

fn set_cookie_values(headers: &HeaderMap) -> Vec<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .map(str::to_owned)
        .collect()
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn map_transport_error(error: reqwest::Error) -> BackendError {
    warn!(error = %error, "backend transport failure");
    if error.is_timeout() {
        BackendError::timeout(error.to_string())
    } else {
        BackendError::transport(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    //! Request construction without a network.

    use super::*;
    use reqwest::header::HeaderValue;
    use rstest::{fixture, rstest};

    #[fixture]
    fn backend() -> BackendHttpClient {
        let base = Url::parse("http://backend.test/api").expect("base url");
        BackendHttpClient::new(base, Duration::from_secs(5)).expect("client")
    }

    #[rstest]
    #[case("sales", "http://backend.test/api/sales")]
    #[case("/sales/5/cancel", "http://backend.test/api/sales/5/cancel")]
    #[case("inventory/adjustment-requests", "http://backend.test/api/inventory/adjustment-requests")]
    fn paths_resolve_under_the_base(
        backend: BackendHttpClient,
        #[case] path: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(backend.endpoint(path).expect("endpoint").as_str(), expected);
    }

    #[rstest]
    fn base_without_trailing_slash_is_normalised(backend: BackendHttpClient) {
        assert_eq!(backend.base_url().as_str(), "http://backend.test/api/");
    }

    #[rstest]
    #[tokio::test]
    async fn requests_forward_cookies_and_trace_id(backend: BackendHttpClient) {
        let trace_id: TraceId = "00000000-0000-0000-0000-000000000007"
            .parse()
            .expect("trace id");
        let credentials = BackendCredentials::from_cookie_header(Some("sid=abc"));
        let url = backend.endpoint("sales").expect("endpoint");

        let request = TraceId::scope(trace_id, async {
            backend
                .request(Method::GET, url, &credentials)
                .build()
                .expect("request")
        })
        .await;

        let headers = request.headers();
        assert_eq!(headers.get(COOKIE), Some(&HeaderValue::from_static("sid=abc")));
        assert_eq!(
            headers.get(TRACE_ID_HEADER).and_then(|v| v.to_str().ok()),
            Some("00000000-0000-0000-0000-000000000007")
        );
    }

    #[rstest]
    fn anonymous_requests_carry_no_cookie(backend: BackendHttpClient) {
        let url = backend.endpoint(SESSION_PATH).expect("endpoint");
        let request = backend
            .request(Method::GET, url, &BackendCredentials::anonymous())
            .build()
            .expect("request");
        assert!(request.headers().get(COOKIE).is_none());
        assert!(request.headers().get(TRACE_ID_HEADER).is_none());
    }

    #[rstest]
    #[case(CommandMethod::Post, Method::POST)]
    #[case(CommandMethod::Patch, Method::PATCH)]
    #[case(CommandMethod::Delete, Method::DELETE)]
    fn command_methods_map_to_http(#[case] method: CommandMethod, #[case] expected: Method) {
        assert_eq!(http_method(method), expected);
    }

    #[rstest]
    #[case(Value::Null, None)]
    #[case(json!({"user": null}), None)]
    #[case(json!({"user": {"id": 3, "role": "seller"}}), Some("seller"))]
    fn session_payloads_decode(#[case] body: Value, #[case] role: Option<&str>) {
        let session = decode_session(body).expect("session");
        assert_eq!(session.role_name(), role);
    }

    #[rstest]
    fn invalid_mime_is_rejected_before_sending() {
        let files = [UploadFile {
            file_name: "a.png".to_owned(),
            content_type: Some("not a mime".to_owned()),
            bytes: vec![1],
        }];
        let err = multipart_form(&files).expect_err("invalid mime");
        assert!(matches!(err, BackendError::InvalidRequest { .. }));
    }

    #[rstest]
    fn set_cookie_headers_are_relayed_in_order() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("sid=1; Path=/"));
        headers.append(SET_COOKIE, HeaderValue::from_static("csrf=2; Path=/"));
        assert_eq!(
            set_cookie_values(&headers),
            vec!["sid=1; Path=/".to_owned(), "csrf=2; Path=/".to_owned()]
        );
    }
}
