//! Form view: the read model handed to presentation and observers.

use serde::Serialize;

use crate::form::ConfigurationForm;
use crate::status::OperationalStatus;

/// Current form values plus the flags that decide which controls are enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub form: ConfigurationForm,
    pub status: OperationalStatus,
    pub dirty: bool,
    /// Save is only offered for unsaved edits.
    pub can_submit: bool,
    pub can_refresh_name: bool,
    pub shows_start: bool,
    pub shows_stop: bool,
}

impl FormView {
    #[must_use]
    pub fn new(form: ConfigurationForm, status: OperationalStatus, dirty: bool) -> Self {
        Self {
            form,
            status,
            dirty,
            can_submit: dirty,
            can_refresh_name: status.can_refresh_name(),
            shows_start: status.shows_start(),
            shows_stop: status.shows_stop(),
        }
    }
}
