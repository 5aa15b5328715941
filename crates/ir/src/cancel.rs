use crossbeam_channel::{Receiver, Sender, TryRecvError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Cooperative cancellation shared by every stage of a run.
///
/// Nothing is ever sent on the channel: cancelling drops the only sender,
/// which disconnects every receiver at once. That makes the signal usable
/// both by polling and inside `crossbeam_channel::select!`.
#[derive(Debug, Clone)]
pub struct Cancellation {
    trigger: Arc<Mutex<Option<Sender<()>>>>,
    signal: Receiver<()>,
}

impl Default for Cancellation {
    fn default() -> Self {
        Self::new()
    }
}

impl Cancellation {
    #[must_use]
    pub fn new() -> Self {
        let (trigger, signal) = crossbeam_channel::bounded(0);
        Self {
            trigger: Arc::new(Mutex::new(Some(trigger))),
            signal,
        }
    }

    /// Request cancellation. Calling it again has no effect.
    pub fn cancel(&self) {
        if self.trigger.lock().take().is_some() {
            tracing::debug!("Cancellation requested");
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self.signal.try_recv(), Err(TryRecvError::Disconnected))
    }

    /// Receiver that becomes ready (disconnected) once cancelled
    #[must_use]
    pub const fn receiver(&self) -> &Receiver<()> {
        &self.signal
    }
}
