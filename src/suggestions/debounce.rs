//! Single-slot cancellable timer.
//!
//! Time is passed in by the caller, so the timer works with any runtime (or
//! none) and is fully deterministic under test. Scheduling while something is
//! pending replaces it: there is never more than one pending action.

use std::time::{Duration, Instant};

use tracing::trace;

#[derive(Debug, Clone)]
pub struct DebounceTimer<T> {
    delay: Duration,
    pending: Option<(Instant, T)>,
}

impl<T> DebounceTimer<T> {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Arm the timer to fire `delay` after `now`, replacing any pending action.
    pub fn schedule(&mut self, now: Instant, payload: T) {
        if self.pending.is_some() {
            trace!("debounce restarted");
        }
        self.pending = Some((now + self.delay, payload));
    }

    /// Drop the pending action, if any. Returns whether one was dropped.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending action is due.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(at, _)| *at)
    }

    /// Take the payload if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((at, _)) if *at <= now => self.pending.take().map(|(_, payload)| payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn fires_only_after_delay() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(start, "a");

        assert_eq!(timer.fire(start + Duration::from_millis(299)), None);
        assert_eq!(timer.fire(start + DELAY), Some("a"));
        assert!(!timer.is_pending());
        assert_eq!(timer.fire(start + DELAY * 2), None);
    }

    #[test]
    fn reschedule_replaces_payload_and_deadline() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(start, "r");
        timer.schedule(start + Duration::from_millis(200), "re");

        assert_eq!(timer.fire(start + DELAY), None);
        assert_eq!(
            timer.deadline(),
            Some(start + Duration::from_millis(200) + DELAY)
        );
        assert_eq!(timer.fire(start + Duration::from_millis(500)), Some("re"));
    }

    #[test]
    fn cancel_leaves_nothing_behind() {
        let start = Instant::now();
        let mut timer = DebounceTimer::new(DELAY);
        timer.schedule(start, 1);
        assert!(timer.cancel());
        assert!(!timer.cancel());
        assert_eq!(timer.fire(start + DELAY * 10), None);
    }
}
