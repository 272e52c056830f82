//! JSON handlers for localized labels and the dashboard layout.

use axum::Json;
use axum::extract::{Path, State};
use serde::Serialize;

use pumpsim_app::ports::{ConfigApplier, NameProvider};
use pumpsim_app::services::Layout;

use crate::state::AppState;

/// A resolved label.
#[derive(Debug, Serialize)]
pub struct TranslationResponse {
    pub key: String,
    pub value: String,
    pub locale: String,
}

/// `GET /api/translations/{key}`
///
/// Unknown keys resolve to themselves, so this never fails.
pub async fn get<N, A>(
    State(state): State<AppState<N, A>>,
    Path(key): Path<String>,
) -> Json<TranslationResponse>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let value = state.catalog.lookup(&key).to_string();
    Json(TranslationResponse {
        key,
        value,
        locale: state.catalog.locale().to_string(),
    })
}

/// `GET /api/layout`
pub async fn layout<N, A>(State(state): State<AppState<N, A>>) -> Json<Layout>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Json(state.shell.render(state.catalog))
}
