use std::sync::{
    Mutex, MutexGuard, PoisonError,
    atomic::{AtomicU64, Ordering},
};

use tracing::{debug, trace};

use crate::alert::Alert;

/// Identity of an alert shown through an [`AlertQueue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertHandle(u64);

impl std::fmt::Display for AlertHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "alert-{}", self.0)
    }
}

/// Where alerts are displayed.
pub trait AlertQueue: Send + Sync {
    /// Show an alert and return a handle that can later dismiss it.
    fn show(&self, alert: Alert) -> AlertHandle;

    /// Remove an alert. Dismissing an unknown or already dismissed handle is a
    /// no-op.
    fn dismiss(&self, handle: AlertHandle);

    /// Remove every visible alert.
    fn clear(&self);

    /// Currently visible alerts, oldest first.
    fn visible(&self) -> Vec<(AlertHandle, Alert)>;
}

/// In-memory alert queue that keeps alerts in the order they were shown.
#[derive(Debug, Default)]
pub struct AlertStack {
    alerts: Mutex<Vec<(AlertHandle, Alert)>>,
    next_id: AtomicU64,
}

impl AlertStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, handle: AlertHandle) -> bool {
        self.lock().iter().any(|(h, _)| *h == handle)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(AlertHandle, Alert)>> {
        self.alerts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AlertQueue for AlertStack {
    fn show(&self, alert: Alert) -> AlertHandle {
        let mut alerts = self.lock();
        let handle = AlertHandle(self.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        debug!(%handle, level = %alert.level, message = %alert.message, "showing alert");
        alerts.push((handle, alert));
        handle
    }

    fn dismiss(&self, handle: AlertHandle) {
        let mut alerts = self.lock();
        let before = alerts.len();
        alerts.retain(|(h, _)| *h != handle);
        if alerts.len() < before {
            debug!(%handle, "dismissed alert");
        } else {
            trace!(%handle, "dismiss of absent alert ignored");
        }
    }

    fn clear(&self) {
        let mut alerts = self.lock();
        if !alerts.is_empty() {
            debug!(count = alerts.len(), "clearing alerts");
        }
        alerts.clear();
    }

    fn visible(&self) -> Vec<(AlertHandle, Alert)> {
        self.lock().clone()
    }
}
