//! Portal entry-point: loads settings, wires the backend adapter and serves
//! the role screens.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use portal::inbound::http::health::HealthState;
use portal::inbound::http::state::{HttpState, HttpStatePorts};
use portal::outbound::backend::BackendHttpClient;
use server::{PortalSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load_from_iter(std::env::args_os()).map_err(|e| {
        std::io::Error::other(format!("failed to load portal settings: {e}"))
    })?;
    let backend_url = settings.backend_url().map_err(std::io::Error::other)?;
    let owner_portal = settings.owner_portal_url().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;

    let backend = BackendHttpClient::new(backend_url.clone(), settings.request_timeout())
        .map_err(|e| std::io::Error::other(format!("failed to build backend client: {e}")))?;
    let http_state = HttpState::new(HttpStatePorts::from_backend(Arc::new(backend)))
        .with_page_size(settings.page_size())
        .with_owner_portal(owner_portal);

    info!(%bind_addr, backend = %backend_url, "starting portal");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, http_state, bind_addr)?.await
}
