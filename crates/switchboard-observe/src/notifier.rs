//! Best-effort broadcast of call notifications.

use tokio::sync::broadcast;

use crate::event::CallNotification;

/// Default broadcast channel capacity. Slow dashboard subscribers lag and
/// drop old notifications rather than backpressuring the engine.
const DEFAULT_CAPACITY: usize = 64;

/// Fans call notifications out to dashboard subscribers.
///
/// Cloning is cheap; the engine and the SSE handler share one notifier.
/// Sends never block and never fail the caller: a send with no subscribers
/// is the normal idle state.
#[derive(Debug, Clone)]
pub struct CallNotifier {
    tx: broadcast::Sender<CallNotification>,
}

impl CallNotifier {
    /// Creates a notifier with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a notifier with an explicit channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribes a new dashboard receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<CallNotification> {
        self.tx.subscribe()
    }

    /// Broadcasts a notification, best-effort.
    pub fn notify(&self, notification: CallNotification) {
        tracing::debug!(
            event = notification.event_type(),
            from_number = notification.from_number(),
            "broadcasting call notification"
        );
        if self.tx.send(notification).is_err() {
            // No dashboard connected; routing proceeds regardless.
            tracing::debug!("no notification subscribers");
        }
    }
}

impl Default for CallNotifier {
    fn default() -> Self {
        Self::new()
    }
}
