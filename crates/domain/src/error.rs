//! Common error types used across the workspace.
//!
//! Each failure kind has its own typed error; [`PumpSimError`] wraps them via
//! `#[from]` so use-cases can propagate with `?`.

use std::time::Duration;

use crate::status::{OperationalStatus, StatusAction};

/// Top-level error for every fallible pumpsim operation.
#[derive(Debug, thiserror::Error)]
pub enum PumpSimError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidStateError),

    #[error("collaborator error: {0}")]
    Collaborator(#[from] CollaboratorError),
}

/// A form value that cannot be accepted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("pump type must be selected before submitting")]
    UnsetPumpType,

    #[error("unknown form field `{0}`")]
    UnknownField(String),

    #[error("invalid value `{value}` for field `{field}`")]
    InvalidFieldValue { field: &'static str, value: String },

    #[error("battery threshold must be 25, 50, 75 or 100, got {0}")]
    InvalidBatteryThreshold(u16),

    #[error("unknown pump type {0}")]
    InvalidPumpType(u8),
}

/// An action was requested that the current operational status forbids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} while the pump is {status}")]
pub struct InvalidStateError {
    pub action: StatusAction,
    pub status: OperationalStatus,
}

/// Failure reported by (or while waiting for) an external collaborator.
#[derive(Debug, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{collaborator} did not answer within {after:?}")]
    Timeout {
        collaborator: &'static str,
        after: Duration,
    },

    #[error("{collaborator} failed")]
    Failed {
        collaborator: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl CollaboratorError {
    /// Wrap an arbitrary error raised by `collaborator`.
    pub fn failed(
        collaborator: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Failed {
            collaborator,
            source: source.into(),
        }
    }
}
