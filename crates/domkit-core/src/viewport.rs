#![forbid(unsafe_code)]

//! Throttled sampling of window scroll position and size.

use std::time::Duration;

use crate::geometry::Size;
use crate::host::Window;
use crate::throttle::{Throttle, ThrottleDecision};

/// Which window signal is being sampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleKind {
    /// `scroll` events.
    Scroll,
    /// `resize` events.
    Resize,
}

/// One reading of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportSample {
    /// Vertical scroll offset.
    pub scroll_top: i32,
    /// Window size.
    pub viewport: Size,
    /// Monotonic time of the reading.
    pub at: Duration,
}

/// Samples the window at a bounded cadence.
///
/// Scroll and resize are throttled independently with the same interval, so
/// a resize burst never starves scroll handling or the other way around.
#[derive(Debug, Clone)]
pub struct ViewportTracker {
    scroll: Throttle,
    resize: Throttle,
    last: Option<ViewportSample>,
}

impl ViewportTracker {
    /// Create a tracker with the given throttle interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            scroll: Throttle::new(interval),
            resize: Throttle::new(interval),
            last: None,
        }
    }

    /// Throttle interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.scroll.interval()
    }

    /// Offer an event of `kind` at `now`.
    pub fn offer(&mut self, kind: SampleKind, now: Duration) -> ThrottleDecision {
        self.throttle_mut(kind).offer(now)
    }

    /// The trailing timer for `kind` fired. Returns `true` if a sample should be taken.
    pub fn fire_trailing(&mut self, kind: SampleKind, now: Duration) -> bool {
        self.throttle_mut(kind).fire_trailing(now)
    }

    /// Read the window and remember the reading.
    pub fn sample<W: Window + ?Sized>(&mut self, window: &W) -> ViewportSample {
        let sample = ViewportSample {
            scroll_top: window.scroll_top(),
            viewport: window.viewport(),
            at: window.now(),
        };
        self.last = Some(sample);
        sample
    }

    /// Most recent reading.
    #[must_use]
    pub const fn last(&self) -> Option<ViewportSample> {
        self.last
    }

    /// Drop throttle history and the last reading.
    pub fn reset(&mut self) {
        self.scroll.reset();
        self.resize.reset();
        self.last = None;
    }

    fn throttle_mut(&mut self, kind: SampleKind) -> &mut Throttle {
        match kind {
            SampleKind::Scroll => &mut self.scroll,
            SampleKind::Resize => &mut self.resize,
        }
    }
}
