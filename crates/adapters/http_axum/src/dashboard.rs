//! Server-side rendered HTML dashboard (no JavaScript).
//!
//! Forms use POST + redirect (PRG pattern) to avoid double-submission. The
//! outcome of an action travels back to the page as a `?notice=` code.

#[allow(clippy::missing_errors_doc)]
pub mod basic;
#[allow(clippy::missing_errors_doc)]
pub mod home;

use axum::Router;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};

use pumpsim_app::ports::{ConfigApplier, NameProvider};
use pumpsim_domain::error::PumpSimError;

use crate::state::AppState;

/// Failure while producing a dashboard page.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("template rendering failed: {0}")]
    Render(#[from] askama::Error),
}

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "dashboard error");
        (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
    }
}

/// Outcome of a dashboard action, carried in the redirect URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Saved,
    Validation,
    InvalidState,
    Collaborator,
}

impl Notice {
    const ALL: [Self; 4] = [
        Self::Saved,
        Self::Validation,
        Self::InvalidState,
        Self::Collaborator,
    ];

    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Validation => "validation",
            Self::InvalidState => "invalid_state",
            Self::Collaborator => "collaborator",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|notice| notice.code() == code)
    }

    /// Translation key of the message shown for this notice.
    #[must_use]
    pub fn label_key(self) -> &'static str {
        match self {
            Self::Saved => "BASIC.MESSAGE.SAVED",
            Self::Validation => "ERROR.VALIDATION",
            Self::InvalidState => "ERROR.INVALID_STATE",
            Self::Collaborator => "ERROR.COLLABORATOR",
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self != Self::Saved
    }
}

impl From<&PumpSimError> for Notice {
    fn from(err: &PumpSimError) -> Self {
        match err {
            PumpSimError::Validation(_) => Self::Validation,
            PumpSimError::InvalidState(_) => Self::InvalidState,
            PumpSimError::Collaborator(_) => Self::Collaborator,
        }
    }
}

/// Build the dashboard sub-router for SSR HTML pages.
pub fn routes<N, A>() -> Router<AppState<N, A>>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(home::index::<N, A>))
        .route("/basic", post(basic::save::<N, A>))
        .route("/basic/start", post(basic::start::<N, A>))
        .route("/basic/stop", post(basic::stop::<N, A>))
        .route("/basic/refresh-name", post(basic::refresh_name::<N, A>))
        .route("/basic/reset", post(basic::reset::<N, A>))
}
