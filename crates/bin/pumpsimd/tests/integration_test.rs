//! End-to-end smoke tests for the full pumpsimd stack.
//!
//! Each test wires the complete application (virtual collaborators, real form
//! controller, real axum router) and exercises the HTTP layer via
//! `tower::ServiceExt::oneshot`. No TCP port is bound.

use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use pumpsim_adapter_http_axum::router;
use pumpsim_adapter_http_axum::state::AppState;
use pumpsim_adapter_virtual::{RandomNameProvider, SimulatedPump};
use pumpsim_app::services::{DashboardShell, FormController};
use pumpsim_domain::form::PumpType;
use pumpsim_domain::status::OperationalStatus;
use serde_json::Value;
use tower::ServiceExt;

type TestState = AppState<RandomNameProvider, SimulatedPump>;

/// Build a fully-wired state backed by the virtual collaborators.
fn state() -> (TestState, SimulatedPump) {
    let pump = SimulatedPump::default();
    let controller = FormController::loading(RandomNameProvider::default(), pump.clone());
    controller
        .finish_loading(None)
        .expect("fresh controller should be loading");
    (AppState::new(controller, DashboardShell::default()), pump)
}

async fn call(state: &TestState, method: &str, uri: &str, json: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match json {
        Some(json) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let resp = router::build(state.clone())
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get_html(state: &TestState, uri: &str) -> (StatusCode, String) {
    let resp = router::build(state.clone())
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (state, _) = state();
    let (status, body) = get_html(&state, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "OK");
}

// ---------------------------------------------------------------------------
// Form lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_edit_submit_and_apply_to_pump() {
    let (state, pump) = state();

    let (_, view) = call(&state, "GET", "/api/basic", None).await;
    assert_eq!(view["form"]["name"], "");
    assert_eq!(view["form"]["type"], 2);
    assert_eq!(view["form"]["reservoir"], 300);
    assert_eq!(view["form"]["battery"], 100);
    assert_eq!(view["dirty"], false);

    let (status, view) = call(
        &state,
        "PUT",
        "/api/basic/fields",
        Some(serde_json::json!({"field": "reservoir", "value": 150})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["dirty"], true);
    assert_eq!(view["can_submit"], true);

    let (status, snapshot) = call(&state, "POST", "/api/basic/submit", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(snapshot["form"]["reservoir"], 150);

    let (_, view) = call(&state, "GET", "/api/basic", None).await;
    assert_eq!(view["dirty"], false);

    let applied = pump.current().expect("pump should hold the submitted form");
    assert_eq!(applied.form().reservoir_level.units(), 150);
    assert_eq!(applied.form().pump_type, PumpType::Wireless);
}

#[tokio::test]
async fn should_clamp_reservoir_above_maximum() {
    let (state, _) = state();
    let (status, view) = call(
        &state,
        "PUT",
        "/api/basic/fields",
        Some(serde_json::json!({"field": "reservoir", "value": "999"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["form"]["reservoir"], 300);
    assert_eq!(view["dirty"], false);
}

#[tokio::test]
async fn should_reject_unset_pump_type_on_submit() {
    let (state, pump) = state();
    call(
        &state,
        "PUT",
        "/api/basic/fields",
        Some(serde_json::json!({"field": "type", "value": 0})),
    )
    .await;

    let (status, body) = call(&state, "POST", "/api/basic/submit", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("pump type"));
    assert!(pump.current().is_none());
}

#[tokio::test]
async fn should_reject_invalid_battery_threshold() {
    let (state, _) = state();
    let (status, _) = call(
        &state,
        "PUT",
        "/api/basic/fields",
        Some(serde_json::json!({"field": "battery", "value": "30%"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_report_bad_gateway_when_pump_offline() {
    let (state, pump) = state();
    pump.set_offline(true);
    call(
        &state,
        "PUT",
        "/api/basic/fields",
        Some(serde_json::json!({"field": "name", "value": "ABC12345DE"})),
    )
    .await;

    let (status, _) = call(&state, "POST", "/api/basic/submit", None).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(state.controller.is_dirty());
}

// ---------------------------------------------------------------------------
// Operational status
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_start_then_refuse_name_refresh() {
    let (state, _) = state();

    let (status, view) = call(&state, "POST", "/api/basic/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "running");
    assert_eq!(view["shows_stop"], true);
    assert_eq!(view["can_refresh_name"], false);

    let (status, _) = call(&state, "POST", "/api/basic/refresh-name", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call(&state, "POST", "/api/basic/start", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, view) = call(&state, "POST", "/api/basic/stop", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "idle");
}

#[tokio::test]
async fn should_refresh_name_while_idle() {
    let (state, _) = state();
    let mut events = state.controller.subscribe();

    let (status, _) = call(&state, "POST", "/api/basic/refresh-name", None).await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let event = tokio::time::timeout(Duration::from_secs(2), events.recv())
        .await
        .expect("name should arrive")
        .unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "name_refreshed");

    let view = state.controller.view();
    assert_eq!(view.form.name.len(), 10);
    assert!(view.dirty);
    assert_eq!(view.status, OperationalStatus::Idle);
}

#[tokio::test]
async fn should_reset_unsaved_edits() {
    let (state, _) = state();
    call(
        &state,
        "PUT",
        "/api/basic/fields",
        Some(serde_json::json!({"field": "type", "value": 1})),
    )
    .await;

    let (status, view) = call(&state, "POST", "/api/basic/reset", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["form"]["type"], 2);
    assert_eq!(view["dirty"], false);
}

// ---------------------------------------------------------------------------
// Dashboard (SSR) pages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_render_home_page() {
    let (state, _) = state();
    let (status, body) = get_html(&state, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<title>Pump Simulator</title>"));
    assert!(body.contains("Basic Information"));
    assert!(body.contains(r#"<option value="2" selected>Wireless</option>"#));
    assert!(body.contains(r#"<option value="100" selected>100%</option>"#));
}

#[tokio::test]
async fn should_save_through_dashboard_form() {
    let (state, pump) = state();
    let resp = router::build(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/basic")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=ABC12345DE&type=1&reservoir=42&battery=25"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    let applied = pump.current().unwrap();
    assert_eq!(applied.form().name, "ABC12345DE");
    assert_eq!(applied.form().pump_type, PumpType::Wired);
    assert_eq!(applied.form().reservoir_level.units(), 42);
}

#[tokio::test]
async fn should_not_apply_unchanged_dashboard_form() {
    let (state, pump) = state();
    let resp = router::build(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/basic")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("name=&type=2&reservoir=300&battery=100"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/");
    assert!(pump.history().is_empty());
}

#[tokio::test]
async fn should_offer_unset_type_only_as_disabled_placeholder() {
    let (state, _) = state();
    let (_, body) = get_html(&state, "/").await;

    assert!(body.contains(r#"<option value="0" disabled>Unset</option>"#));
    assert!(body.contains(r#"value="" readonly>"#));
}

#[tokio::test]
async fn should_hide_start_button_while_running() {
    let (state, _) = state();
    state.controller.start().unwrap();

    let (_, body) = get_html(&state, "/").await;

    assert!(body.contains(r#"action="/basic/stop""#));
    assert!(!body.contains(r#"action="/basic/start""#));
    assert!(!body.contains(r#"action="/basic/refresh-name""#));
}

// ---------------------------------------------------------------------------
// Event stream
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_stream_status_change_as_named_event() {
    let (state, _) = state();
    let resp = router::build(state.clone())
        .oneshot(
            Request::builder()
                .uri("/api/basic/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut body = resp.into_body();

    let (status, _) = call(&state, "POST", "/api/basic/start", None).await;
    assert_eq!(status, StatusCode::OK);

    let event = tokio::time::timeout(Duration::from_secs(2), async {
        let mut text = String::new();
        while !text.contains("\n\n") {
            let Some(frame) = body.frame().await else {
                break;
            };
            if let Ok(data) = frame.unwrap().into_data() {
                text.push_str(std::str::from_utf8(&data).unwrap());
            }
        }
        text
    })
    .await
    .expect("an event should arrive on the stream");

    let name = event
        .lines()
        .find_map(|line| line.strip_prefix("event:"))
        .map(str::trim);
    assert_eq!(name, Some("status_changed"));
    let data = event
        .lines()
        .find_map(|line| line.strip_prefix("data:"))
        .map(str::trim)
        .unwrap();
    let json: Value = serde_json::from_str(data).unwrap();
    assert_eq!(json["from"], "idle");
    assert_eq!(json["to"], "running");
}

// ---------------------------------------------------------------------------
// Translations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_fall_back_to_key_for_unknown_translation() {
    let (state, _) = state();
    let (status, body) = call(&state, "GET", "/api/translations/BASIC.UNKNOWN", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["value"], "BASIC.UNKNOWN");
}
