//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::http::header::HeaderValue;
use actix_web::test::TestRequest;
use rstest::{fixture, rstest};
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn internal_error() -> Error {
    Error::internal("connection pool exhausted at 10.0.0.4")
        .with_trace_id(TRACE_ID)
        .with_details(json!({"host": "10.0.0.4"}))
}

async fn payload_of(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("Error JSON deserialisation succeeds")
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no session"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("already paid"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("backend down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted_but_keep_their_trace(internal_error: Error) {
    let response = ResponseError::error_response(&internal_error);

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.headers().get(TRACE_ID_HEADER),
        Some(&HeaderValue::from_static(TRACE_ID))
    );
    let body = payload_of(response).await;
    assert_eq!(body.message(), "Internal server error");
    assert_eq!(body.trace_id(), Some(TRACE_ID));
    assert!(body.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let err = Error::invalid_request("openingBalance must not be negative")
        .with_details(json!({"field": "openingBalance"}));

    let response = ResponseError::error_response(&err);

    assert_eq!(
        response.headers().get(CACHE_CONTROL),
        Some(&HeaderValue::from_static("no-store"))
    );
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());
    let body = payload_of(response).await;
    assert_eq!(body, err);
}

#[rstest]
#[case(JsonPayloadError::Overflow { limit: 64 }, "request body exceeds 64 bytes")]
#[case(JsonPayloadError::ContentType, "request body must be JSON")]
#[actix_web::test]
async fn json_extractor_failures_become_invalid_requests(
    #[case] failure: JsonPayloadError,
    #[case] message: &str,
) {
    let req = TestRequest::default().to_http_request();

    let response = json_error_handler(failure, &req).error_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = payload_of(response).await;
    assert_eq!(body.code(), ErrorCode::InvalidRequest);
    assert_eq!(body.message(), message);
}

#[rstest]
#[actix_web::test]
async fn query_extractor_failures_become_invalid_requests() {
    let req = TestRequest::default().to_http_request();
    let failure = non_numeric_page_count().expect("pages must be numeric");

    let response = query_error_handler(failure, &req).error_response();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = payload_of(response).await;
    assert!(body.message().starts_with("invalid query"));
}

fn non_numeric_page_count() -> Option<QueryPayloadError> {
    #[derive(Debug, serde::Deserialize)]
    struct Page {
        #[allow(dead_code, reason = "only parsed to provoke a failure")]
        pages: u32,
    }
    actix_web::web::Query::<Page>::from_query("pages=many").err()
}
