use std::sync::{Mutex, MutexGuard, PoisonError};

use {
    forum_alerts::{Alert, AlertHandle, AlertQueue},
    tracing::debug,
};

/// Holds the one alert a gateway currently has on screen, if any.
///
/// Dismissing the previous alert and showing the next happen under the same
/// lock, so concurrent completions cannot leave two gateway alerts visible.
#[derive(Debug, Default)]
pub struct PendingAlertSlot {
    current: Mutex<Option<AlertHandle>>,
}

impl PendingAlertSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<AlertHandle> {
        *self.lock()
    }

    /// Dismiss the held alert, then show `next` (if any) and hold it instead.
    /// Returns the handle now held.
    pub fn replace(&self, queue: &dyn AlertQueue, next: Option<Alert>) -> Option<AlertHandle> {
        let mut current = self.lock();
        if let Some(prev) = current.take() {
            debug!(handle = %prev, "dismissing pending alert");
            queue.dismiss(prev);
        }
        if let Some(alert) = next {
            *current = Some(queue.show(alert));
        }
        *current
    }

    fn lock(&self) -> MutexGuard<'_, Option<AlertHandle>> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
