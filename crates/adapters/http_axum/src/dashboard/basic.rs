//! Form handlers for the "Basic Information" card (PRG).

use axum::extract::{Form, State};
use axum::response::Redirect;
use serde::Deserialize;

use pumpsim_app::ports::{ConfigApplier, NameProvider};
use pumpsim_app::services::RefreshOutcome;
use pumpsim_domain::error::PumpSimError;
use pumpsim_domain::form::{FieldUpdate, FormField};

use super::Notice;
use crate::state::AppState;

/// Fields posted by the card's `<form>`.
#[derive(Debug, Deserialize)]
pub struct BasicForm {
    pub name: String,
    #[serde(rename = "type")]
    pub pump_type: String,
    pub reservoir: String,
    pub battery: String,
}

impl BasicForm {
    fn updates(&self) -> Result<Vec<FieldUpdate>, PumpSimError> {
        [
            (FormField::Name, &self.name),
            (FormField::PumpType, &self.pump_type),
            (FormField::ReservoirLevel, &self.reservoir),
            (FormField::BatteryThreshold, &self.battery),
        ]
        .into_iter()
        .map(|(field, raw)| FieldUpdate::parse(field.key(), raw).map_err(PumpSimError::from))
        .collect()
    }
}

fn redirect(notice: Option<Notice>) -> Redirect {
    match notice {
        Some(notice) => Redirect::to(&format!("/?notice={}", notice.code())),
        None => Redirect::to("/"),
    }
}

fn redirect_on<T>(result: Result<T, PumpSimError>) -> Redirect {
    match result {
        Ok(_) => redirect(None),
        Err(err) => {
            tracing::debug!(error = %err, "dashboard action rejected");
            redirect(Some(Notice::from(&err)))
        }
    }
}

/// `POST /basic`: write every field, then submit if anything changed.
pub async fn save<N, A>(State(state): State<AppState<N, A>>, Form(form): Form<BasicForm>) -> Redirect
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let updates = match form.updates() {
        Ok(updates) => updates,
        Err(err) => return redirect_on::<()>(Err(err)),
    };
    for update in updates {
        state.controller.set_field(update);
    }
    if !state.controller.is_dirty() {
        tracing::debug!("dashboard save skipped, no unsaved changes");
        return redirect(None);
    }
    match state.controller.submit().await {
        Ok(_) => redirect(Some(Notice::Saved)),
        Err(err) => redirect_on::<()>(Err(err)),
    }
}

/// `POST /basic/start`
pub async fn start<N, A>(State(state): State<AppState<N, A>>) -> Redirect
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    redirect_on(state.controller.start())
}

/// `POST /basic/stop`
pub async fn stop<N, A>(State(state): State<AppState<N, A>>) -> Redirect
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    redirect_on(state.controller.stop())
}

/// `POST /basic/refresh-name`: waits for the naming service so the redirected
/// page already shows the new name.
pub async fn refresh_name<N, A>(State(state): State<AppState<N, A>>) -> Redirect
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    let handle = match state.controller.request_refresh_name() {
        Ok(handle) => handle,
        Err(err) => return redirect_on::<()>(Err(err)),
    };
    match handle.outcome().await {
        Ok(RefreshOutcome::Applied(_) | RefreshOutcome::Discarded) => redirect(None),
        Err(err) => redirect_on::<()>(Err(err)),
    }
}

/// `POST /basic/reset`
pub async fn reset<N, A>(State(state): State<AppState<N, A>>) -> Redirect
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    state.controller.reset();
    redirect(None)
}
