//! # pumpsim-domain
//!
//! Pure domain model for the pumpsim configuration dashboard.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions, timestamps
//! - Define the **configuration form** (name, pump type, reservoir, battery)
//!   and the typed field updates that edit it
//! - Define the **operational status** lifecycle (loading → idle ⇄ running)
//! - Define **snapshots** (immutable copies handed to the apply collaborator)
//! - Define **events** and the **view** published to observers
//! - Define **layout** primitives (cards, responsive grid, placement)
//! - Contain all invariant enforcement (clamping, submission rules, transitions)
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod event;
pub mod form;
pub mod layout;
pub mod snapshot;
pub mod status;
pub mod view;
