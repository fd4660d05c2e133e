#![forbid(unsafe_code)]

//! Rate limiting for high-frequency handlers.
//!
//! [`Throttle`] lets a handler run at most once per interval. The first call
//! in a quiet period runs immediately (leading edge). Calls that land inside
//! the window collapse into a single trailing run, which the caller schedules
//! with a one-shot timer and confirms with [`Throttle::fire_trailing`].
//!
//! The trailing run reads whatever state is current when it fires, so input
//! arriving between the last sample and the trailing run is not guaranteed to
//! be reflected until the next run. That approximation is accepted.
//!
//! ```
//! use domkit_core::throttle::{Throttle, ThrottleDecision};
//! use std::time::Duration;
//!
//! let ms = Duration::from_millis;
//! let mut throttle = Throttle::new(ms(50));
//! assert_eq!(throttle.offer(ms(0)), ThrottleDecision::Run);
//! assert_eq!(throttle.offer(ms(10)), ThrottleDecision::Schedule(ms(40)));
//! assert_eq!(throttle.offer(ms(20)), ThrottleDecision::Coalesced);
//! assert!(throttle.fire_trailing(ms(50)));
//! ```

use std::time::Duration;

/// What the caller should do with an offered invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    /// Run the handler now.
    Run,
    /// Skip now; schedule one trailing run after the given delay.
    Schedule(Duration),
    /// Skip; a trailing run is already scheduled.
    Coalesced,
}

/// Leading-edge throttle with a single trailing run.
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last_run: Option<Duration>,
    trailing: bool,
}

impl Throttle {
    /// Create a throttle with the given minimum spacing between runs.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_run: None,
            trailing: false,
        }
    }

    /// Minimum spacing between runs.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Whether a trailing run is scheduled.
    #[must_use]
    pub const fn has_trailing(&self) -> bool {
        self.trailing
    }

    /// Offer an invocation at monotonic time `now`.
    pub fn offer(&mut self, now: Duration) -> ThrottleDecision {
        if let Some(last) = self.last_run {
            let elapsed = now.saturating_sub(last);
            if elapsed < self.interval {
                if self.trailing {
                    return ThrottleDecision::Coalesced;
                }
                self.trailing = true;
                return ThrottleDecision::Schedule(self.interval - elapsed);
            }
        }
        self.last_run = Some(now);
        self.trailing = false;
        ThrottleDecision::Run
    }

    /// The scheduled trailing timer fired. Returns `true` if the handler should run.
    ///
    /// Returns `false` when a leading run already absorbed the pending call.
    pub fn fire_trailing(&mut self, now: Duration) -> bool {
        if !self.trailing {
            return false;
        }
        self.trailing = false;
        self.last_run = Some(now);
        true
    }

    /// Forget all history.
    pub fn reset(&mut self) {
        self.last_run = None;
        self.trailing = false;
    }
}
