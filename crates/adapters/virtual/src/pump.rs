//! Simulated pump receiving applied configurations.

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use pumpsim_app::ports::ConfigApplier;
use pumpsim_domain::error::{CollaboratorError, PumpSimError};
use pumpsim_domain::snapshot::FormSnapshot;
use pumpsim_domain::time;

/// Number of applied snapshots the pump remembers.
pub const HISTORY_LIMIT: usize = 16;

/// In-memory stand-in for the pump. Cloning shares the same device.
#[derive(Debug, Clone, Default)]
pub struct SimulatedPump {
    applied: Arc<Mutex<VecDeque<FormSnapshot>>>,
    offline: Arc<AtomicBool>,
}

impl SimulatedPump {
    /// The configuration currently active on the pump, if any was applied.
    #[must_use]
    pub fn current(&self) -> Option<FormSnapshot> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .back()
            .cloned()
    }

    /// The last [`HISTORY_LIMIT`] applied snapshots, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<FormSnapshot> {
        self.applied
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }

    /// Make subsequent applies fail until switched back online.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_offline(&self) -> bool {
        self.offline.load(Ordering::Relaxed)
    }
}

impl ConfigApplier for SimulatedPump {
    fn apply(&self, snapshot: FormSnapshot) -> impl Future<Output = Result<(), PumpSimError>> + Send {
        let result = if self.is_offline() {
            Err(CollaboratorError::failed("simulated pump", "pump is offline").into())
        } else {
            let form = snapshot.form();
            tracing::info!(
                snapshot = %snapshot.id(),
                taken_at = %time::display(snapshot.taken_at()),
                name = %form.name,
                pump_type = ?form.pump_type,
                reservoir = form.reservoir_level.units(),
                battery = %form.battery_threshold,
                "pump configuration applied"
            );
            let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
            if applied.len() == HISTORY_LIMIT {
                applied.pop_front();
            }
            applied.push_back(snapshot);
            Ok(())
        };
        async move { result }
    }
}
