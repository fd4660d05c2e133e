#![forbid(unsafe_code)]

//! Host-controlled monotonic clock.

use std::time::Duration;

/// Deterministic monotonic clock.
///
/// Time only moves when the host calls [`set`](Self::set) or
/// [`advance`](Self::advance), which keeps timer and throttle behavior
/// reproducible in tests and in event-sourced replays.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Current time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Jump to `now`. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        if now >= self.now {
            self.now = now;
        } else {
            tracing::warn!(
                current_ms = self.now.as_millis() as u64,
                requested_ms = now.as_millis() as u64,
                "ignoring backwards clock set"
            );
        }
    }

    /// Advance by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(DeterministicClock::new().now(), Duration::ZERO);
    }

    #[test]
    fn advance_and_set() {
        let mut clock = DeterministicClock::new();
        clock.advance(Duration::from_millis(30));
        clock.advance(Duration::from_millis(20));
        assert_eq!(clock.now(), Duration::from_millis(50));
        clock.set(Duration::from_secs(2));
        assert_eq!(clock.now(), Duration::from_secs(2));
    }

    #[test]
    fn never_goes_backwards() {
        let mut clock = DeterministicClock::new();
        clock.set(Duration::from_secs(5));
        clock.set(Duration::from_secs(1));
        assert_eq!(clock.now(), Duration::from_secs(5));
    }
}
