//! In-process form event bus backed by a tokio broadcast channel.

use tokio::sync::broadcast;

use pumpsim_domain::event::{FormChange, FormEvent};

/// Default number of buffered events per subscriber before it lags.
pub const DEFAULT_CAPACITY: usize = 64;

/// Fan-out of [`FormEvent`]s to any number of observers.
///
/// Publishing succeeds even when there are no active subscribers
/// (the event is simply dropped). Cloning yields another handle to the
/// same channel.
#[derive(Clone)]
pub struct FormEventBus {
    sender: broadcast::Sender<FormEvent>,
}

impl FormEventBus {
    /// Create a new event bus with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribe to events on this bus.
    ///
    /// Returns a receiver that will get all events published *after*
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<FormEvent> {
        self.sender.subscribe()
    }

    /// Timestamp `change` and deliver it to current subscribers.
    pub fn publish(&self, change: FormChange) {
        // broadcast::send fails only when there are zero receivers.
        let _ = self.sender.send(FormEvent::new(change));
    }
}

impl Default for FormEventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
