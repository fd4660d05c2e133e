#![forbid(unsafe_code)]

//! Repeating advance timer with a suspend flag.
//!
//! While cycling is on there is exactly one interval per instance. Stopping
//! does not cancel it; a tick that fires while stopped is simply ignored.
//! [`AutoAdvance::reset`] cancels and re-arms, which restarts the period
//! after manual navigation.

use std::time::Duration;

use domkit_core::host::{NodeId, TimerHost, TimerId};

/// Default cycle period.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(5000);

/// Timer state for one carousel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoAdvance {
    period: Duration,
    cycling: bool,
    stopped: bool,
    timer: Option<TimerId>,
}

impl AutoAdvance {
    /// `cycling` off means no timer is ever scheduled.
    #[must_use]
    pub const fn new(period: Duration, cycling: bool) -> Self {
        Self {
            period,
            cycling,
            stopped: false,
            timer: None,
        }
    }

    /// Cycle period.
    #[must_use]
    pub const fn period(&self) -> Duration {
        self.period
    }

    /// Whether ticks are being ignored.
    #[must_use]
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The live interval, if any.
    #[must_use]
    pub const fn timer(&self) -> Option<TimerId> {
        self.timer
    }

    /// Ignore ticks until [`start`](Self::start).
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Resume acting on ticks.
    pub fn start(&mut self) {
        self.stopped = false;
    }

    /// Cancel the current interval and schedule a fresh one.
    pub fn reset<T: TimerHost + ?Sized>(&mut self, timers: &mut T, owner: NodeId) {
        if !self.cycling {
            return;
        }
        if let Some(id) = self.timer.take() {
            timers.clear_timer(id);
        }
        self.timer = Some(timers.set_interval(owner, self.period));
    }

    /// Cancel the interval for good.
    pub fn cancel<T: TimerHost + ?Sized>(&mut self, timers: &mut T) {
        if let Some(id) = self.timer.take() {
            timers.clear_timer(id);
        }
    }

    /// Whether `id` is this instance's interval.
    #[must_use]
    pub fn owns(&self, id: TimerId) -> bool {
        self.timer == Some(id)
    }

    /// A timer fired. Returns `true` when the carousel should advance.
    #[must_use]
    pub fn tick(&self, id: TimerId) -> bool {
        self.owns(id) && !self.stopped
    }
}
