//! # pumpsim-adapter-http-axum
//!
//! HTTP adapter built on [axum](https://docs.rs/axum).
//!
//! ## Responsibilities
//! - Serve a **JSON API** for programmatic access to the form controller
//!   (`/api/basic`, `/api/basic/fields`, `/api/basic/submit`, …)
//! - Serve a **server-side-rendered HTML dashboard** that works with
//!   **zero JavaScript**: pure HTML forms that POST and redirect (PRG)
//! - Stream form events as **Server-Sent Events** (`/api/basic/stream`)
//! - Map application results and errors into HTTP responses
//!
//! ## Dependency rule
//! Depends on `pumpsim-app` (for port traits and services) and `pumpsim-domain`
//! (for domain types used in request/response mapping). Never leaks axum types
//! into the domain.

pub mod api;
pub mod dashboard;
pub mod error;
pub mod router;
pub mod state;
