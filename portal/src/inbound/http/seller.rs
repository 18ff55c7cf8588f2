//! Seller screens.
//!
//! ```text
//! GET  /seller
//! GET  /seller/sales?q=ana
//! GET  /seller/customers?q=0788
//! POST /seller/uploads {"files":[{"fileName":"receipt.jpg","contentType":"image/jpeg","bytes":[255,216]}]}
//! ```

use actix_web::{HttpResponse, get, web};
use pagination::ListQuery;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::state::HttpState;
use super::views::{LandingView, ListPageView, ListParams, SaleRow, load_list};
use crate::domain::forms::UploadBatch;
use crate::domain::ports::UploadFile;
use crate::domain::records::{Customer, Sale};
use crate::domain::resources::{CUSTOMERS, SALES};
use crate::domain::{AuthorizedUser, BackendCredentials, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::json_error_handler;

const SCREENS: &[&str] = &["/seller/sales", "/seller/customers", "/messages"];

/// Largest upload request body accepted, in bytes of JSON.
pub const UPLOAD_JSON_LIMIT: usize = 32 * 1024 * 1024;

/// Register the seller routes on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing)
        .service(my_sales)
        .service(customers)
        .service(
            web::resource("/uploads")
                .app_data(
                    web::JsonConfig::default()
                        .limit(UPLOAD_JSON_LIMIT)
                        .error_handler(json_error_handler),
                )
                .route(web::post().to(upload_files)),
        );
}

/// Seller landing view.
#[get("")]
pub async fn landing(user: AuthorizedUser) -> web::Json<LandingView> {
    web::Json(LandingView {
        user,
        screens: SCREENS,
    })
}

/// Sales the signed-in seller created.
#[get("/sales")]
pub async fn my_sales(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    user: AuthorizedUser,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<SaleRow>> {
    let query = ListQuery::new(state.page_size).with_filter("sellerEmail", user.email());
    let view = load_list::<Sale>(&state, &credentials, SALES, query, params.pages()).await;
    web::Json(ListPageView::project(&view, &params.search(), |sale| SaleRow::from(sale)))
}

/// Customer lookup. The text is sent to the backend and applied again to
/// the rows it returns.
#[get("/customers")]
pub async fn customers(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    params: web::Query<ListParams>,
) -> web::Json<ListPageView<Customer>> {
    let search = params.search();
    let query = ListQuery::new(state.page_size).with_optional_filter(
        "q",
        (!search.is_empty()).then(|| search.as_str().to_owned()),
    );
    let view = load_list(&state, &credentials, CUSTOMERS, query, params.pages()).await;
    web::Json(ListPageView::of(&view, &search))
}

/// One file of an upload request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    /// Original file name.
    pub file_name: String,
    /// MIME type, when known.
    #[serde(default)]
    pub content_type: Option<String>,
    /// File contents.
    #[serde(default)]
    pub bytes: Vec<u8>,
}

impl From<UploadFileRequest> for UploadFile {
    fn from(file: UploadFileRequest) -> Self {
        Self {
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        }
    }
}

/// Upload request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadRequest {
    /// Files sent together.
    #[serde(default)]
    pub files: Vec<UploadFileRequest>,
}

/// Public URLs of an uploaded batch, in request order.
#[derive(Debug, Clone, Serialize)]
pub struct UploadResponse {
    /// One URL per file.
    pub urls: Vec<String>,
}

/// Upload a batch of files in one backend request.
pub async fn upload_files(
    state: web::Data<HttpState>,
    credentials: BackendCredentials,
    payload: web::Json<UploadRequest>,
) -> ApiResult<HttpResponse> {
    let files = payload
        .into_inner()
        .files
        .into_iter()
        .map(UploadFile::from)
        .collect();
    let batch = UploadBatch::try_from_files(files)?;
    let urls = state
        .uploads
        .upload(&credentials, batch.files())
        .await
        .map_err(Error::from)?;
    info!(files = batch.files().len(), "upload batch stored");
    Ok(HttpResponse::Ok().json(UploadResponse { urls }))
}
