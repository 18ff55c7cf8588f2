//! Steps shared by every portal behaviour suite.

use rstest_bdd_macros::{given, then, when};
use serde_json::Value;

use crate::portal_world::PortalWorld;

#[given("the visitor is signed in as {role}")]
fn the_visitor_is_signed_in_as(world: &PortalWorld, role: String) {
    world.sign_in(&role);
}

#[given("the visitor is signed out")]
fn the_visitor_is_signed_out(world: &PortalWorld) {
    world.sign_out();
}

#[given("the session bootstrap fails")]
fn the_session_bootstrap_fails(world: &PortalWorld) {
    world.break_session();
}

#[when("they visit {path}")]
fn they_visit(world: &PortalWorld, path: String) {
    world.get(&path);
}

#[then("the screen loads")]
fn the_screen_loads(world: &PortalWorld) {
    assert_eq!(world.observed().status, 200);
}

#[then("the response status is {status}")]
fn the_response_status_is(world: &PortalWorld, status: u16) {
    assert_eq!(world.observed().status, status);
}

#[then("exactly {count} row is shown")]
fn exactly_rows_are_shown(world: &PortalWorld, count: usize) {
    let rows = world.body()["rows"].as_array().map_or(0, Vec::len);
    assert_eq!(rows, count);
}

#[then("{count} commands are sent")]
fn commands_are_sent(world: &PortalWorld, count: usize) {
    assert_eq!(world.commands_sent(), count);
}

#[then("a success banner reads \"{message}\"")]
fn a_success_banner_reads(world: &PortalWorld, message: String) {
    let body = world.body();
    assert_eq!(body["banner"]["kind"], "success");
    let shown = body["banner"]["message"].as_str().unwrap_or_default();
    assert_eq!(shown.trim_start_matches("✓ "), message);
}

#[then("an error banner reads \"{message}\"")]
fn an_error_banner_reads(world: &PortalWorld, message: String) {
    let body = world.body();
    assert_eq!(body["banner"]["kind"], "error");
    assert_eq!(body["banner"]["message"], Value::String(message));
}
