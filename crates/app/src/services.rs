//! Application services: use-case implementations.
//!
//! Services accept port trait implementations via generic parameters
//! (constructor injection), keeping this layer decoupled from concrete adapters.

pub mod dashboard_shell;
pub mod form_controller;

pub use dashboard_shell::{DashboardShell, Layout, RenderedCard, ResponsiveGrid};
pub use form_controller::{FormController, RefreshHandle, RefreshOutcome};
