#![forbid(unsafe_code)]

//! Panel visibility and one-time remote content.
//!
//! [`ContentActivator`] turns a [`Transition`] into reveal/conceal calls on
//! an ordered list of panels. [`LazyContent`] fills a panel from a remote
//! source the first time it is activated and remembers which sources have
//! been fetched in a [`FetchCache`].
//!
//! # Fetch lifecycle
//!
//! | State | Entered by | Panel |
//! |-------|------------|-------|
//! | absent | start, or a failed fetch | untouched |
//! | in flight | [`LazyContent::begin`] | loading template, `is-loading` |
//! | fetched | successful completion | response body |
//!
//! A failed fetch returns the source to absent, so the next activation
//! tries again. A fetched source is never requested again.

use std::collections::BTreeMap;

use domkit_core::host::{Dom, FetchCompletion, FetchHost, FetchOutcome, FetchTicket, NodeId};

use crate::classes;
use crate::navigator::Transition;

/// Ordered panels, one per navigable item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentActivator {
    panels: Vec<NodeId>,
}

impl ContentActivator {
    /// Wrap the panels in item order.
    #[must_use]
    pub fn new(panels: Vec<NodeId>) -> Self {
        Self { panels }
    }

    /// Panel for `index`.
    #[must_use]
    pub fn panel(&self, index: usize) -> Option<NodeId> {
        self.panels.get(index).copied()
    }

    /// All panels.
    #[must_use]
    pub fn panels(&self) -> &[NodeId] {
        &self.panels
    }

    /// Number of panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Whether there are no panels.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Deactivate `from` when it differs, then activate `to`.
    pub fn apply<D: Dom + ?Sized>(&self, dom: &mut D, transition: Transition) {
        if !transition.is_reselect() {
            self.deactivate(dom, transition.from);
        }
        self.activate(dom, transition.to);
    }

    /// Reveal one panel.
    pub fn activate<D: Dom + ?Sized>(&self, dom: &mut D, index: usize) {
        if let Some(panel) = self.panel(index) {
            dom.reveal(panel);
        }
    }

    /// Conceal one panel.
    pub fn deactivate<D: Dom + ?Sized>(&self, dom: &mut D, index: usize) {
        if let Some(panel) = self.panel(index) {
            dom.conceal(panel);
        }
    }

    /// Flip one panel. Returns whether it is now shown.
    pub fn toggle<D: Dom + ?Sized>(&self, dom: &mut D, index: usize) -> bool {
        if self.is_shown(dom, index) {
            self.deactivate(dom, index);
            false
        } else {
            self.activate(dom, index);
            true
        }
    }

    /// Whether the panel is revealed.
    #[must_use]
    pub fn is_shown<D: Dom + ?Sized>(&self, dom: &D, index: usize) -> bool {
        self.panel(index).is_some_and(|panel| dom.is_shown(panel))
    }

    /// Conceal every panel.
    pub fn conceal_all<D: Dom + ?Sized>(&self, dom: &mut D) {
        for &panel in &self.panels {
            dom.conceal(panel);
        }
    }
}

/// Per-source fetch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    InFlight(FetchTicket),
    Fetched,
}

/// Which sources have been requested or fetched.
#[derive(Debug, Clone, Default)]
pub struct FetchCache {
    entries: BTreeMap<String, Entry>,
}

impl FetchCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `source` needs a request: never fetched and not in flight.
    #[must_use]
    pub fn needs_request(&self, source: &str) -> bool {
        !self.entries.contains_key(source)
    }

    /// Whether `source` has been fetched successfully.
    #[must_use]
    pub fn is_fetched(&self, source: &str) -> bool {
        matches!(self.entries.get(source), Some(Entry::Fetched))
    }

    /// Ticket of the outstanding request for `source`.
    #[must_use]
    pub fn in_flight(&self, source: &str) -> Option<FetchTicket> {
        match self.entries.get(source) {
            Some(Entry::InFlight(ticket)) => Some(*ticket),
            _ => None,
        }
    }

    /// Record a request.
    pub fn begin(&mut self, source: &str, ticket: FetchTicket) {
        self.entries
            .insert(source.to_owned(), Entry::InFlight(ticket));
    }

    /// Record a success.
    pub fn mark_fetched(&mut self, source: &str) {
        self.entries.insert(source.to_owned(), Entry::Fetched);
    }

    /// Record a failure so the next activation retries.
    pub fn forget(&mut self, source: &str) {
        self.entries.remove(source);
    }

    /// Number of sources in flight or fetched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was requested yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// What a completion did to its panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadResult {
    /// The panel now holds `content`.
    Loaded {
        /// Item index.
        index: usize,
        /// Response body.
        content: String,
    },
    /// The panel shows the error template.
    Failed {
        /// Item index.
        index: usize,
        /// Failure reason.
        reason: String,
    },
}

#[derive(Debug, Clone)]
struct Pending {
    source: String,
    index: usize,
    panel: NodeId,
}

/// One-time remote fill of panels.
#[derive(Debug, Clone)]
pub struct LazyContent {
    cache: FetchCache,
    pending: BTreeMap<FetchTicket, Pending>,
    loading_template: String,
    error_template: String,
}

impl LazyContent {
    /// Loader with the markup shown while waiting and after a failure.
    #[must_use]
    pub fn new(loading_template: impl Into<String>, error_template: impl Into<String>) -> Self {
        Self {
            cache: FetchCache::new(),
            pending: BTreeMap::new(),
            loading_template: loading_template.into(),
            error_template: error_template.into(),
        }
    }

    /// Source cache.
    #[must_use]
    pub fn cache(&self) -> &FetchCache {
        &self.cache
    }

    /// Number of outstanding requests.
    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Request `source` into `panel` unless it was fetched or is in flight.
    ///
    /// Returns the ticket of a newly issued request.
    pub fn begin<H: Dom + FetchHost + ?Sized>(
        &mut self,
        host: &mut H,
        owner: NodeId,
        index: usize,
        panel: NodeId,
        source: &str,
    ) -> Option<FetchTicket> {
        if !self.cache.needs_request(source) {
            domkit_core::trace!(source, "source cached or in flight");
            return None;
        }
        host.set_html(panel, &self.loading_template);
        host.add_class(panel, classes::LOADING);
        let ticket = host.request(owner, source);
        domkit_core::debug!(source, index, ticket = ticket.0, "content requested");
        self.cache.begin(source, ticket);
        self.pending.insert(
            ticket,
            Pending {
                source: source.to_owned(),
                index,
                panel,
            },
        );
        Some(ticket)
    }

    /// Apply a completion. `None` for tickets this loader did not issue.
    pub fn complete<D: Dom + ?Sized>(
        &mut self,
        dom: &mut D,
        completion: &FetchCompletion,
    ) -> Option<LoadResult> {
        let pending = self.pending.remove(&completion.ticket)?;
        dom.remove_class(pending.panel, classes::LOADING);
        match &completion.outcome {
            FetchOutcome::Success(body) => {
                self.cache.mark_fetched(&pending.source);
                dom.set_html(pending.panel, body);
                dom.remove_class(pending.panel, classes::FAILED);
                Some(LoadResult::Loaded {
                    index: pending.index,
                    content: body.clone(),
                })
            }
            FetchOutcome::Failure(reason) => {
                self.cache.forget(&pending.source);
                dom.set_html(pending.panel, &self.error_template);
                dom.add_class(pending.panel, classes::FAILED);
                domkit_core::warn!(source = pending.source.as_str(), reason = reason.as_str(), "content fetch failed");
                Some(LoadResult::Failed {
                    index: pending.index,
                    reason: reason.clone(),
                })
            }
        }
    }

    /// Forget outstanding requests; their completions will be ignored.
    pub fn abandon(&mut self) {
        for pending in std::mem::take(&mut self.pending).into_values() {
            self.cache.forget(&pending.source);
        }
    }
}
