//! JSON handlers for the "Basic Information" card.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use pumpsim_app::ports::{ConfigApplier, NameProvider};
use pumpsim_domain::form::FieldUpdate;
use pumpsim_domain::snapshot::FormSnapshot;
use pumpsim_domain::view::FormView;

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for updating one field.
///
/// `value` may be a JSON string or a bare number (`{"field": "reservoir", "value": 150}`).
#[derive(Deserialize)]
pub struct SetFieldRequest {
    pub field: String,
    pub value: serde_json::Value,
}

impl SetFieldRequest {
    fn raw_value(&self) -> String {
        match &self.value {
            serde_json::Value::String(raw) => raw.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Possible responses from the submit endpoint.
pub enum SubmitResponse {
    Created(Json<FormSnapshot>),
}

impl IntoResponse for SubmitResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Created(json) => (StatusCode::CREATED, json).into_response(),
        }
    }
}

/// Possible responses from the refresh-name endpoint.
pub enum RefreshResponse {
    /// The request was handed to the naming service; watch the event stream
    /// or poll `GET /api/basic` for the result.
    Accepted(Json<FormView>),
}

impl IntoResponse for RefreshResponse {
    fn into_response(self) -> Response {
        match self {
            Self::Accepted(json) => (StatusCode::ACCEPTED, json).into_response(),
        }
    }
}

/// `GET /api/basic`
pub async fn show<N, A>(State(state): State<AppState<N, A>>) -> Json<FormView>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Json(state.controller.view())
}

/// `PUT /api/basic/fields`
pub async fn set_field<N, A>(
    State(state): State<AppState<N, A>>,
    Json(req): Json<SetFieldRequest>,
) -> Result<Json<FormView>, ApiError>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let update = FieldUpdate::parse(&req.field, &req.raw_value())?;
    Ok(Json(state.controller.set_field(update)))
}

/// `POST /api/basic/submit`
pub async fn submit<N, A>(
    State(state): State<AppState<N, A>>,
) -> Result<SubmitResponse, ApiError>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let snapshot = state.controller.submit().await?;
    Ok(SubmitResponse::Created(Json(snapshot)))
}

/// `POST /api/basic/start`
pub async fn start<N, A>(State(state): State<AppState<N, A>>) -> Result<Json<FormView>, ApiError>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Ok(Json(state.controller.start()?))
}

/// `POST /api/basic/stop`
pub async fn stop<N, A>(State(state): State<AppState<N, A>>) -> Result<Json<FormView>, ApiError>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Ok(Json(state.controller.stop()?))
}

/// `POST /api/basic/reset`
pub async fn reset<N, A>(State(state): State<AppState<N, A>>) -> Json<FormView>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Json(state.controller.reset())
}

/// `POST /api/basic/refresh-name`
pub async fn refresh_name<N, A>(
    State(state): State<AppState<N, A>>,
) -> Result<RefreshResponse, ApiError>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    // The refresh keeps running after the handle is dropped.
    let _handle = state.controller.request_refresh_name()?;
    Ok(RefreshResponse::Accepted(Json(state.controller.view())))
}
