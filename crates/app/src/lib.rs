//! # pumpsim-app
//!
//! Application layer: use-cases and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement (driven/outbound ports):
//!   - `NameProvider`: hands out new pump names
//!   - `ConfigApplier`: receives submitted configuration snapshots
//!   - `Translator`: resolves label keys
//! - Provide the **use-cases**:
//!   - `FormController`: edit, submit, start/stop, name refresh
//!   - `DashboardShell`: compose cards into a responsive layout
//! - Provide **in-process infrastructure** that doesn't need IO: the form
//!   event bus and the translation catalog
//!
//! ## Dependency rule
//! Depends on `pumpsim-domain` only (plus `tokio` for tasks and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod event_bus;
pub mod i18n;
pub mod ports;
pub mod services;
