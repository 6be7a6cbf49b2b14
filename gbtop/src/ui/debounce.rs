//! Trailing-edge debounce for terminal resize bursts.

use std::time::{Duration, Instant};

pub const RESIZE_DEBOUNCE: Duration = Duration::from_millis(250);

#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    /// Record an event; restarts the quiet period.
    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once, when the quiet period after the last trigger has passed.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(d) if now >= d => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(RESIZE_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_fires_once_after_last_event() {
        let t0 = Instant::now();
        let mut d = Debouncer::default();
        assert!(!d.fire(t0));

        d.trigger(t0);
        d.trigger(t0 + Duration::from_millis(100));
        d.trigger(t0 + Duration::from_millis(200));
        assert!(!d.fire(t0 + Duration::from_millis(300)));
        assert!(d.is_pending());
        assert!(d.fire(t0 + Duration::from_millis(450)));
        assert!(!d.fire(t0 + Duration::from_millis(900)));
        assert!(!d.is_pending());
    }
}
