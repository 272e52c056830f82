//! Shared application state for axum handlers.

use std::sync::Arc;

use pumpsim_app::i18n::{self, Catalog};
use pumpsim_app::ports::{ConfigApplier, NameProvider};
use pumpsim_app::services::{DashboardShell, FormController};

/// Application state shared across all axum handlers.
///
/// Generic over the naming service and the configuration applier to avoid
/// dynamic dispatch. `Clone` is implemented manually so the underlying types
/// themselves do not need to be `Clone`; only the `Arc` wrappers are cloned.
pub struct AppState<N, A> {
    /// Controller behind the "Basic Information" card.
    pub controller: Arc<FormController<N, A>>,
    /// Cards shown on the dashboard.
    pub shell: Arc<DashboardShell>,
    /// Catalog used to resolve labels.
    pub catalog: &'static Catalog,
}

impl<N, A> Clone for AppState<N, A> {
    fn clone(&self) -> Self {
        Self {
            controller: Arc::clone(&self.controller),
            shell: Arc::clone(&self.shell),
            catalog: self.catalog,
        }
    }
}

impl<N, A> AppState<N, A>
where
    N: NameProvider + Send + Sync + 'static,
    A: ConfigApplier + Send + Sync + 'static,
{
    /// Create a new application state resolving labels with the process-wide
    /// catalog.
    pub fn new(controller: FormController<N, A>, shell: DashboardShell) -> Self {
        Self::from_arcs(Arc::new(controller), Arc::new(shell))
    }

    /// Create a new application state from pre-wrapped `Arc` services.
    ///
    /// Use this when the controller needs to be shared with background tasks
    /// before constructing the HTTP state.
    pub fn from_arcs(controller: Arc<FormController<N, A>>, shell: Arc<DashboardShell>) -> Self {
        Self {
            controller,
            shell,
            catalog: i18n::global(),
        }
    }
}
