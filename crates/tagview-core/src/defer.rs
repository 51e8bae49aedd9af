//! Single-slot deferred actions.
//!
//! Replaces ad-hoc timeout handles with an explicit cancel-and-replace slot:
//! at most one action is ever pending, scheduling again drops the previous
//! one, and firing requires an explicit `tick` so callers (and tests)
//! control time.

use std::time::Instant;

/// One pending action with a deadline.
#[derive(Debug, Clone)]
pub struct Deferred<T> {
    pending: Option<(Instant, T)>,
}

impl<T> Default for Deferred<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Deferred<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an action, replacing any pending one.
    pub fn schedule(&mut self, deadline: Instant, action: T) {
        self.pending = Some((deadline, action));
    }

    /// Drop the pending action, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(deadline, _)| *deadline)
    }

    /// Take the action if its deadline has passed.
    pub fn fire(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((deadline, _)) if *deadline <= now => {
                self.pending.take().map(|(_, action)| action)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_fires_only_after_deadline() {
        let now = Instant::now();
        let mut slot = Deferred::new();
        slot.schedule(now + Duration::from_millis(300), 42);
        assert!(slot.is_pending());
        assert_eq!(slot.fire(now + Duration::from_millis(100)), None);
        assert!(slot.is_pending());
        assert_eq!(slot.fire(now + Duration::from_millis(300)), Some(42));
        assert!(!slot.is_pending());
    }

    #[test]
    fn test_cancel_discards() {
        let now = Instant::now();
        let mut slot = Deferred::new();
        slot.schedule(now, 1);
        slot.cancel();
        assert_eq!(slot.fire(now + Duration::from_secs(1)), None);
    }

    #[test]
    fn test_schedule_replaces_pending() {
        let now = Instant::now();
        let mut slot = Deferred::new();
        slot.schedule(now + Duration::from_millis(100), 1);
        slot.schedule(now + Duration::from_millis(500), 2);
        // The first deadline passed, but the slot was re-armed.
        assert_eq!(slot.fire(now + Duration::from_millis(200)), None);
        assert_eq!(slot.fire(now + Duration::from_millis(500)), Some(2));
    }
}
