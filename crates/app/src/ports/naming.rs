//! Naming port: source of fresh pump names for the "refresh name" action.

use std::future::Future;

use pumpsim_domain::error::PumpSimError;

/// Produces a new device name on request.
///
/// No timeout is implied by the port; callers bound the wait themselves.
pub trait NameProvider {
    /// Ask for a new name.
    fn request_name(&self) -> impl Future<Output = Result<String, PumpSimError>> + Send;
}

impl<T: NameProvider + Send + Sync> NameProvider for std::sync::Arc<T> {
    fn request_name(&self) -> impl Future<Output = Result<String, PumpSimError>> + Send {
        (**self).request_name()
    }
}
