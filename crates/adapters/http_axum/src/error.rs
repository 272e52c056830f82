//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use pumpsim_domain::error::{PumpSimError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Status code for a [`PumpSimError`].
pub(crate) fn status_of(err: &PumpSimError) -> StatusCode {
    match err {
        PumpSimError::Validation(_) => StatusCode::BAD_REQUEST,
        PumpSimError::InvalidState(_) => StatusCode::CONFLICT,
        PumpSimError::Collaborator(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Maps [`PumpSimError`] to an HTTP response with appropriate status code.
#[derive(Debug)]
pub struct ApiError(PumpSimError);

impl From<PumpSimError> for ApiError {
    fn from(err: PumpSimError) -> Self {
        Self(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_of(&self.0);
        if let PumpSimError::Collaborator(err) = &self.0 {
            tracing::error!(error = %err, "collaborator error");
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}
