//! Liveness and readiness probes.
//!
//! ```text
//! GET /health/live   200 {"status":"live"}   | 503 {"status":"draining"}
//! GET /health/ready  200 {"status":"ready"}  | 503 {"status":"starting"}
//! ```
//!
//! Probes never touch the backend; readiness only says the portal has
//! finished wiring its adapters.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::http::header::CACHE_CONTROL;
use actix_web::{HttpResponse, get, web};
use serde::Serialize;

/// Probe flags shared between the server and its handlers.
#[derive(Debug)]
pub struct HealthState {
    ready: AtomicBool,
    draining: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            draining: AtomicBool::new(false),
        }
    }
}

impl HealthState {
    /// Live but not yet ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept traffic.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Fail both probes while shutting down.
    pub fn mark_draining(&self) {
        self.draining.store(true, Ordering::Release);
        self.ready.store(false, Ordering::Release);
    }

    /// Whether readiness probes pass.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Whether liveness probes pass.
    pub fn is_alive(&self) -> bool {
        !self.draining.load(Ordering::Acquire)
    }
}

#[derive(Serialize)]
struct ProbeBody {
    status: &'static str,
}

fn probe(ok: bool, passing: &'static str, failing: &'static str) -> HttpResponse {
    let mut response = if ok {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((CACHE_CONTROL, "no-store"))
        .json(ProbeBody {
            status: if ok { passing } else { failing },
        })
}

/// Register the probes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(ready).service(live);
}

/// Readiness probe.
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready(), "ready", "starting")
}

/// Liveness probe; fails once draining starts.
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive(), "live", "draining")
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn probe_status(
        health: web::Data<HealthState>,
        uri: &str,
    ) -> (StatusCode, Option<String>, Value) {
        let app = test::init_service(App::new().app_data(health).configure(configure)).await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        let cache = res
            .headers()
            .get(CACHE_CONTROL)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let body: Value = test::read_body_json(res).await;
        (status, cache, body)
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_follows_startup() {
        let health = web::Data::new(HealthState::new());

        let (status, cache, body) = probe_status(health.clone(), "/health/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(cache.as_deref(), Some("no-store"));
        assert_eq!(body, json!({"status": "starting"}));

        health.mark_ready();
        let (status, _, body) = probe_status(health, "/health/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ready"}));
    }

    #[rstest]
    #[actix_web::test]
    async fn draining_fails_both_probes() {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        health.mark_draining();

        let (live_status, _, live_body) = probe_status(health.clone(), "/health/live").await;
        let (ready_status, _, _) = probe_status(health, "/health/ready").await;

        assert_eq!(live_status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(live_body, json!({"status": "draining"}));
        assert_eq!(ready_status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
