//! Form events: notifications published to observers of a form controller.

use serde::{Deserialize, Serialize};

use crate::form::FormField;
use crate::id::SnapshotId;
use crate::status::OperationalStatus;
use crate::time::{Timestamp, now};

/// Something that happened to the form, with the moment it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormEvent {
    pub at: Timestamp,
    #[serde(flatten)]
    pub change: FormChange,
}

impl FormEvent {
    #[must_use]
    pub fn new(change: FormChange) -> Self {
        Self { at: now(), change }
    }
}

/// The kind of change carried by a [`FormEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormChange {
    FieldChanged { field: FormField, dirty: bool },
    Submitted { snapshot: SnapshotId },
    StatusChanged {
        from: OperationalStatus,
        to: OperationalStatus,
    },
    NameRefreshed { name: String, dirty: bool },
    BaselineReplaced,
    Reset,
}
