use std::time::{Duration, Instant};

/// Collapses bursts of notifications into the latest value, released once the input has
/// been quiet for `delay`.
///
/// The caller supplies the clock, so the same instance works from any event loop.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<T>,
    last_notified: Option<Instant>,
}

impl<T> Debouncer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            last_notified: None,
        }
    }

    /// Records `value` as the latest one and restarts the quiet period.
    pub fn notify(&mut self, now: Instant, value: T) {
        self.pending = Some(value);
        self.last_notified = Some(now);
    }

    /// Returns the latest value once `delay` has passed since the last notification.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let last = self.last_notified?;
        if now.saturating_duration_since(last) < self.delay {
            return None;
        }

        self.flush()
    }

    /// Returns the latest value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.last_notified = None;
        self.pending.take()
    }
}
