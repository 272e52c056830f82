//! Operational status: the three-state lifecycle gating the card's actions.

use serde::{Deserialize, Serialize};

use crate::error::InvalidStateError;

/// Discrete operational status of the simulated pump.
///
/// ```text
/// Loading ──finish_loading──▶ Idle ──start──▶ Running
///                              ▲                 │
///                              └──────stop───────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationalStatus {
    Loading,
    #[default]
    Idle,
    Running,
}

/// A user or system action that is only valid from some statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusAction {
    FinishLoading,
    Start,
    Stop,
    RefreshName,
}

impl OperationalStatus {
    /// Loading → Idle.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] from any status other than `Loading`.
    pub fn finish_loading(self) -> Result<Self, InvalidStateError> {
        match self {
            Self::Loading => Ok(Self::Idle),
            status => Err(InvalidStateError {
                action: StatusAction::FinishLoading,
                status,
            }),
        }
    }

    /// Idle → Running.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] from any status other than `Idle`.
    pub fn start(self) -> Result<Self, InvalidStateError> {
        match self {
            Self::Idle => Ok(Self::Running),
            status => Err(InvalidStateError {
                action: StatusAction::Start,
                status,
            }),
        }
    }

    /// Running → Idle.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] from any status other than `Running`.
    pub fn stop(self) -> Result<Self, InvalidStateError> {
        match self {
            Self::Running => Ok(Self::Idle),
            status => Err(InvalidStateError {
                action: StatusAction::Stop,
                status,
            }),
        }
    }

    /// Check that a name refresh may be requested.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidStateError`] while `Loading` or `Running`.
    pub fn ensure_can_refresh_name(self) -> Result<(), InvalidStateError> {
        if self.can_refresh_name() {
            Ok(())
        } else {
            Err(InvalidStateError {
                action: StatusAction::RefreshName,
                status: self,
            })
        }
    }

    #[must_use]
    pub fn can_refresh_name(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the Start button is offered.
    #[must_use]
    pub fn shows_start(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// Whether the Stop button is offered.
    #[must_use]
    pub fn shows_stop(self) -> bool {
        matches!(self, Self::Running)
    }
}

impl std::fmt::Display for OperationalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => f.write_str("loading"),
            Self::Idle => f.write_str("idle"),
            Self::Running => f.write_str("running"),
        }
    }
}

impl std::fmt::Display for StatusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FinishLoading => f.write_str("finish loading"),
            Self::Start => f.write_str("start"),
            Self::Stop => f.write_str("stop"),
            Self::RefreshName => f.write_str("refresh name"),
        }
    }
}
