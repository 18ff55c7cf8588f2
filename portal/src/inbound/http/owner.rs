//! Owner landing: a hand-off to the separate owner application.

use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, get, web};

use super::state::HttpState;
use super::views::see_other;
use crate::domain::OwnerPortal;

/// Register the owner route on a scope.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(landing);
}

/// Redirect to the owner portal, or explain that none is configured.
#[get("")]
pub async fn landing(state: web::Data<HttpState>) -> HttpResponse {
    match OwnerPortal::from_config(state.owner_portal.as_ref()) {
        OwnerPortal::Redirect { url } => see_other(&url),
        unavailable @ OwnerPortal::Unavailable { .. } => HttpResponse::Ok()
            .insert_header((CACHE_CONTROL, "no-store"))
            .json(unavailable),
    }
}
