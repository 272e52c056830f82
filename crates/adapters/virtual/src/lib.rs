//! # pumpsim-adapter-virtual
//!
//! Virtual/demo collaborators for the form controller.
//!
//! ## Provided collaborators
//!
//! | Collaborator | Port | Behaviour |
//! |--------------|------|-----------|
//! | `RandomNameProvider` | `NameProvider` | Generates serials like `UHH00002TI` after an optional delay |
//! | `SimulatedPump` | `ConfigApplier` | Records every applied snapshot; can be switched offline |
//!
//! ## Dependency rule
//!
//! Depends on `pumpsim-app` (port traits) and `pumpsim-domain` only.

mod naming;
mod pump;

pub use naming::RandomNameProvider;
pub use pump::{HISTORY_LIMIT, SimulatedPump};
