#![forbid(unsafe_code)]

//! Bounded index with a boundary policy.
//!
//! A [`Navigator`] owns the single authoritative selection among `len`
//! ordered items. Requests outside `[0, len)` are resolved by its
//! [`Boundary`]: carousels wrap around, tabs reject.
//!
//! # Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | `current < len` whenever `len > 0` | constructors clamp, [`Navigator::jump`] resolves first |
//! | `previous` differs from `current` after any move | updated only when the index changes |
//! | `len == 0` has no state | every operation returns `None` |
//!
//! ```
//! use domkit_widgets::navigator::{Boundary, Navigator};
//!
//! let mut nav = Navigator::new(3, Boundary::Wrap);
//! assert_eq!(nav.jump(-1).map(|t| t.to), Some(2));
//! assert_eq!(nav.next().map(|t| t.to), Some(0));
//! assert_eq!(nav.previous(), Some(2));
//! ```

/// What happens to a request outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Boundary {
    /// `>= len` goes to the first item, `< 0` goes to the last.
    Wrap,
    /// Out-of-range requests are ignored.
    Clamp,
}

/// A resolved move from one index to another.
///
/// `from == to` when the current item was requested again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    /// Index active before the move.
    pub from: usize,
    /// Index active after the move.
    pub to: usize,
}

impl Transition {
    /// Whether the request targeted the already-current item.
    #[must_use]
    pub const fn is_reselect(&self) -> bool {
        self.from == self.to
    }
}

/// Snapshot of a navigator with at least one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NavigationState {
    /// Active index.
    pub current: usize,
    /// Last distinct index before the most recent move, if there was one.
    pub previous: Option<usize>,
    /// Item count.
    pub len: usize,
}

/// Current/previous index tracking over `len` items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigator {
    boundary: Boundary,
    len: usize,
    current: usize,
    previous: Option<usize>,
}

impl Navigator {
    /// Navigator over `len` items starting at index 0.
    #[must_use]
    pub const fn new(len: usize, boundary: Boundary) -> Self {
        Self {
            boundary,
            len,
            current: 0,
            previous: None,
        }
    }

    /// Navigator starting at `start`, or 0 if `start` is out of range.
    #[must_use]
    pub const fn starting_at(len: usize, boundary: Boundary, start: usize) -> Self {
        let current = if start < len { start } else { 0 };
        Self {
            boundary,
            len,
            current,
            previous: None,
        }
    }

    /// Boundary policy.
    #[must_use]
    pub const fn boundary(&self) -> Boundary {
        self.boundary
    }

    /// Item count.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether there are no items.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Active index.
    #[must_use]
    pub const fn current(&self) -> Option<usize> {
        if self.len == 0 {
            None
        } else {
            Some(self.current)
        }
    }

    /// Last distinct index before the most recent move.
    #[must_use]
    pub const fn previous(&self) -> Option<usize> {
        if self.len == 0 { None } else { self.previous }
    }

    /// Full state, `None` when empty.
    #[must_use]
    pub const fn state(&self) -> Option<NavigationState> {
        if self.len == 0 {
            return None;
        }
        Some(NavigationState {
            current: self.current,
            previous: self.previous,
            len: self.len,
        })
    }

    /// Where a request for `target` lands under the boundary policy.
    #[must_use]
    pub fn resolve(&self, target: isize) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        match usize::try_from(target) {
            Ok(index) if index < self.len => Some(index),
            Ok(_) => match self.boundary {
                Boundary::Wrap => Some(0),
                Boundary::Clamp => None,
            },
            Err(_) => match self.boundary {
                Boundary::Wrap => Some(self.len - 1),
                Boundary::Clamp => None,
            },
        }
    }

    /// Move to `target`.
    ///
    /// Returns `None` when nothing was resolved (empty, or rejected by
    /// [`Boundary::Clamp`]); the state is unchanged in that case.
    pub fn jump(&mut self, target: isize) -> Option<Transition> {
        let to = self.resolve(target)?;
        let from = self.current;
        if to != from {
            self.previous = Some(from);
            self.current = to;
        }
        Some(Transition { from, to })
    }

    /// Move to `index` given as an unsigned position.
    pub fn select(&mut self, index: usize) -> Option<Transition> {
        self.jump(isize::try_from(index).unwrap_or(isize::MAX))
    }

    /// Move forward one item.
    pub fn next(&mut self) -> Option<Transition> {
        self.jump(self.offset(1))
    }

    /// Move back one item.
    pub fn prev(&mut self) -> Option<Transition> {
        self.jump(self.offset(-1))
    }

    fn offset(&self, delta: isize) -> isize {
        isize::try_from(self.current)
            .unwrap_or(isize::MAX)
            .saturating_add(delta)
    }
}
