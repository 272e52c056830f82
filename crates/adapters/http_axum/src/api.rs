//! JSON API handler modules.

#[allow(clippy::missing_errors_doc)]
pub mod basic;
pub mod sse;
#[allow(clippy::missing_errors_doc)]
pub mod translations;

use axum::Router;
use axum::routing::{get, post, put};

use pumpsim_app::ports::{ConfigApplier, NameProvider};

use crate::state::AppState;

/// Build the `/api` sub-router.
pub fn routes<N, A>() -> Router<AppState<N, A>>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    Router::new()
        // Basic information card
        .route("/basic", get(basic::show::<N, A>))
        .route("/basic/fields", put(basic::set_field::<N, A>))
        .route("/basic/submit", post(basic::submit::<N, A>))
        .route("/basic/start", post(basic::start::<N, A>))
        .route("/basic/stop", post(basic::stop::<N, A>))
        .route("/basic/reset", post(basic::reset::<N, A>))
        .route("/basic/refresh-name", post(basic::refresh_name::<N, A>))
        .route("/basic/stream", get(sse::stream::<N, A>))
        // Dashboard shell
        .route("/layout", get(translations::layout::<N, A>))
        .route("/translations/{key}", get(translations::get::<N, A>))
}
