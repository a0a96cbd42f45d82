//! Quiet-period debouncing for search input.
//!
//! The event loop is single-threaded, so a "timer" is just a deadline that
//! the loop polls. Scheduling a new value supersedes the previous one and
//! hands out a new [`TimerHandle`]; a handle that has been superseded or
//! cancelled never fires.
use std::time::{Duration, Instant};

/// Default quiet period before a search query is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Identifies one scheduled value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<T> {
    handle: TimerHandle,
    due: Instant,
    value: T,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    next_id: u64,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self { delay, next_id: 0, pending: None }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedule `value` to fire one quiet period after `now`, replacing any
    /// value that was still waiting.
    pub fn schedule(&mut self, value: T, now: Instant) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending = Some(Pending { handle, due: now + self.delay, value });
        handle
    }

    /// Drop the pending value, if any.
    pub fn cancel(&mut self) -> bool {
        self.pending.take().is_some()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True while `handle` is the most recently scheduled, unfired value.
    pub fn is_current(&self, handle: TimerHandle) -> bool {
        self.pending.as_ref().is_some_and(|p| p.handle == handle)
    }

    /// When the pending value becomes due.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.due)
    }

    /// Fire `handle` if it is still current and due. Stale handles yield `None`.
    pub fn fire(&mut self, handle: TimerHandle, now: Instant) -> Option<T> {
        if !self.is_current(handle) {
            return None;
        }
        self.poll(now)
    }

    /// Take the pending value once its quiet period has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        let due = self.pending.as_ref()?.due;
        if now < due {
            return None;
        }
        self.pending.take().map(|p| p.value)
    }

    /// Take the pending value immediately, ignoring the deadline.
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take().map(|p| p.value)
    }
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(SEARCH_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_quiet_period() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        d.schedule("a", t0);
        assert_eq!(d.poll(t0 + Duration::from_millis(299)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(300)), Some("a"));
        assert_eq!(d.poll(t0 + Duration::from_millis(900)), None);
    }

    #[test]
    fn rescheduling_supersedes_the_old_handle() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(Duration::from_millis(300));
        let first = d.schedule("ab", t0);
        let second = d.schedule("abc", t0 + Duration::from_millis(200));
        assert!(!d.is_current(first));
        // The old deadline passing must not apply the stale value.
        assert_eq!(d.fire(first, t0 + Duration::from_millis(350)), None);
        assert_eq!(d.poll(t0 + Duration::from_millis(350)), None);
        assert_eq!(d.fire(second, t0 + Duration::from_millis(500)), Some("abc"));
    }

    #[test]
    fn cancel_and_flush() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        assert_eq!(d.delay(), SEARCH_DEBOUNCE);
        d.schedule(1, t0);
        assert!(d.cancel());
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + Duration::from_secs(5)), None);

        d.schedule(2, t0);
        assert_eq!(d.deadline(), Some(t0 + SEARCH_DEBOUNCE));
        assert_eq!(d.flush(), Some(2));
        assert_eq!(d.deadline(), None);
    }
}
