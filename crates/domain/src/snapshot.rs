//! Form snapshot: an immutable copy of the form taken at submit time.

use serde::{Deserialize, Serialize};

use crate::form::ConfigurationForm;
use crate::id::SnapshotId;
use crate::time::{Timestamp, now};

/// Immutable copy of a [`ConfigurationForm`].
///
/// Fields are private so a snapshot cannot be edited after capture; cloning is
/// the only way to hand one to several owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    id: SnapshotId,
    taken_at: Timestamp,
    form: ConfigurationForm,
}

impl FormSnapshot {
    /// Capture `form` now under a fresh id.
    #[must_use]
    pub fn capture(form: &ConfigurationForm) -> Self {
        Self {
            id: SnapshotId::new(),
            taken_at: now(),
            form: form.clone(),
        }
    }

    #[must_use]
    pub fn id(&self) -> SnapshotId {
        self.id
    }

    #[must_use]
    pub fn taken_at(&self) -> Timestamp {
        self.taken_at
    }

    #[must_use]
    pub fn form(&self) -> &ConfigurationForm {
        &self.form
    }
}
