//! Timestamps attached to snapshots and events.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for snapshot and event times.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// Render a timestamp the way the dashboard shows it (RFC 3339, whole seconds).
#[must_use]
pub fn display(ts: Timestamp) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}
