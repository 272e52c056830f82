//! Apply port: receives submitted configuration snapshots.

use std::future::Future;

use pumpsim_domain::error::PumpSimError;
use pumpsim_domain::snapshot::FormSnapshot;

/// Saves or applies a submitted configuration.
///
/// The snapshot is passed by value: the applier owns its copy.
pub trait ConfigApplier {
    /// Apply `snapshot`. Any error is reported back to the submitter as-is.
    fn apply(&self, snapshot: FormSnapshot) -> impl Future<Output = Result<(), PumpSimError>> + Send;
}

impl<T: ConfigApplier + Send + Sync> ConfigApplier for std::sync::Arc<T> {
    fn apply(&self, snapshot: FormSnapshot) -> impl Future<Output = Result<(), PumpSimError>> + Send {
        (**self).apply(snapshot)
    }
}
