#![forbid(unsafe_code)]

//! Timer queue backing [`TimerHost`](domkit_core::host::TimerHost).
//!
//! The queue never reads a clock itself: callers pass `now` when scheduling
//! and when popping. An interval fires at most once per [`pop_due`] call, so
//! a host that wants every period delivered walks time forward with
//! [`next_due`] and pops at each instant.
//!
//! # Invariants
//!
//! 1. Ids are never reused within one queue.
//! 2. Timers due at the same instant fire in scheduling order.
//! 3. A cancelled timer never fires, even if it was due.
//!
//! [`pop_due`]: TimerQueue::pop_due
//! [`next_due`]: TimerQueue::next_due

use std::time::Duration;

use domkit_core::host::{NodeId, TimerId};

/// Shortest interval accepted; zero periods would fire forever at one instant.
const MIN_PERIOD: Duration = Duration::from_millis(1);

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// The timer.
    pub id: TimerId,
    /// Element of the instance that owns it.
    pub owner: NodeId,
    /// Instant it was due.
    pub at: Duration,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    owner: NodeId,
    due: Duration,
    period: Option<Duration>,
}

/// Repeating and one-shot timers.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TimerQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire every `period` starting at `now + period`.
    pub fn schedule_interval(&mut self, owner: NodeId, period: Duration, now: Duration) -> TimerId {
        let period = period.max(MIN_PERIOD);
        self.push(owner, now.saturating_add(period), Some(period))
    }

    /// Fire once at `now + delay`.
    pub fn schedule_timeout(&mut self, owner: NodeId, delay: Duration, now: Duration) -> TimerId {
        self.push(owner, now.saturating_add(delay), None)
    }

    /// Cancel a timer. Returns `false` if it was unknown or already spent.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            tracing::trace!(timer = id.0, "timer cancelled");
        }
        removed
    }

    /// Cancel every timer owned by `owner`. Returns how many were removed.
    pub fn cancel_owner(&mut self, owner: NodeId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.owner != owner);
        before - self.entries.len()
    }

    /// Whether the timer is still scheduled.
    #[must_use]
    pub fn is_active(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of scheduled timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest due instant.
    #[must_use]
    pub fn next_due(&self) -> Option<Duration> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Pop every timer due at or before `now`.
    ///
    /// One-shot timers are removed; intervals are re-armed one period after
    /// the instant they were due.
    pub fn pop_due(&mut self, now: Duration) -> Vec<FiredTimer> {
        let mut fired: Vec<FiredTimer> = self
            .entries
            .iter()
            .filter(|e| e.due <= now)
            .map(|e| FiredTimer {
                id: e.id,
                owner: e.owner,
                at: e.due,
            })
            .collect();
        fired.sort_by_key(|f| (f.at, f.id));

        self.entries.retain_mut(|e| {
            if e.due > now {
                return true;
            }
            match e.period {
                Some(period) => {
                    e.due = e.due.saturating_add(period);
                    true
                }
                None => false,
            }
        });

        if !fired.is_empty() {
            tracing::trace!(count = fired.len(), now_ms = now.as_millis() as u64, "timers fired");
        }
        fired
    }

    fn push(&mut self, owner: NodeId, due: Duration, period: Option<Duration>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            owner,
            due,
            period,
        });
        tracing::trace!(
            timer = id.0,
            owner = owner.0,
            due_ms = due.as_millis() as u64,
            repeating = period.is_some(),
            "timer scheduled"
        );
        id
    }
}
