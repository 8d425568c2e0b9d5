//! Debouncing of rapidly changing input
//!
//! Each [`Debouncer::push`] supersedes the previous one. A value is emitted
//! only once the quiescence window has passed without another push.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Quiescence window used by the list views
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(1000);

/// Delays values until input settles.
///
/// Emissions arrive on the receiver returned by [`Debouncer::new`]. Dropping
/// the debouncer cancels a pending emission.
pub struct Debouncer<T> {
    quiescence: Duration,
    output: mpsc::UnboundedSender<T>,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> Debouncer<T> {
    /// Must be called from within a tokio runtime before the first push.
    pub fn new(quiescence: Duration) -> (Self, mpsc::UnboundedReceiver<T>) {
        let (output, receiver) = mpsc::unbounded_channel();
        let debouncer = Self {
            quiescence,
            output,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
        };
        (debouncer, receiver)
    }

    /// Replace any pending value and restart the quiescence window
    pub fn push(&mut self, value: T) {
        self.cancel();

        let generation = Arc::clone(&self.generation);
        let issued = generation.load(Ordering::SeqCst);
        let output = self.output.clone();
        let quiescence = self.quiescence;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiescence).await;
            if generation.load(Ordering::SeqCst) == issued {
                let _ = output.send(value);
            }
        }));
    }
}

impl<T> Debouncer<T> {
    /// Drop the pending value, if any
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }

    /// Whether a value is waiting for the window to elapse
    pub fn is_pending(&self) -> bool {
        self.pending
            .as_ref()
            .map_or(false, |pending| !pending.is_finished())
    }

    pub fn quiescence(&self) -> Duration {
        self.quiescence
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.cancel();
    }
}
