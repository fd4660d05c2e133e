#![forbid(unsafe_code)]

//! Headless host for driving domkit widgets without a browser.
//!
//! [`HeadlessHost`] implements every capability trait of `domkit-core` over
//! an in-memory [`DomTree`] and the deterministic services of
//! `domkit-runtime`. Time only moves when the test says so, timers fire in a
//! reproducible order, and content fetches stay in flight until the test
//! resolves them.
//!
//! # Quick Start
//!
//! ```
//! use domkit_harness::{ElementSpec, HeadlessHost};
//! use std::time::Duration;
//!
//! let mut host = HeadlessHost::new();
//! let root = host.dom().root();
//! let panel = host.dom_mut().append(root, ElementSpec::new("div").size(300, 120));
//! host.scroll_to(40);
//! while let Some(events) = host.step_until(Duration::from_millis(500)) {
//!     // hand each timer event to the binding manager
//!     drop(events);
//! }
//! assert_eq!(host.elapsed(), Duration::from_millis(500));
//! # let _ = panel;
//! ```

pub mod dom;
pub mod selector;

use std::time::Duration;

use domkit_core::css::CssValue;
use domkit_core::event::DomEvent;
use domkit_core::geometry::Size;
use domkit_core::host::{
    Cookie, CookieJar, Dom, FetchHost, FetchOutcome, FetchTicket, NodeId, StorageError, TimerHost,
    TimerId, Window,
};
use domkit_runtime::{DeterministicClock, FetchChannel, FetchRequest, MemoryCookieJar, TimerQueue};

pub use dom::{DomTree, ElementSpec};
pub use selector::Selector;

/// Class added by [`Dom::reveal`].
pub const SHOW_CLASS: &str = "show";
/// Class added by [`Dom::conceal`].
pub const HIDE_CLASS: &str = "hide";

/// In-memory host.
#[derive(Debug)]
pub struct HeadlessHost {
    dom: DomTree,
    clock: DeterministicClock,
    timers: TimerQueue,
    cookies: MemoryCookieJar,
    fetch: FetchChannel,
    fetch_log: Vec<(NodeId, String)>,
    scroll_top: i32,
    viewport: Size,
    hash: Option<String>,
}

impl Default for HeadlessHost {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessHost {
    /// A 1280×800 window at scroll offset 0 and time 0.
    #[must_use]
    pub fn new() -> Self {
        Self {
            dom: DomTree::new(),
            clock: DeterministicClock::new(),
            timers: TimerQueue::new(),
            cookies: MemoryCookieJar::new(),
            fetch: FetchChannel::new(),
            fetch_log: Vec::new(),
            scroll_top: 0,
            viewport: Size::new(1280, 800),
            hash: None,
        }
    }

    /// The document.
    #[must_use]
    pub fn dom(&self) -> &DomTree {
        &self.dom
    }

    /// The document, mutably.
    pub fn dom_mut(&mut self) -> &mut DomTree {
        &mut self.dom
    }

    /// Scroll the window.
    pub fn scroll_to(&mut self, top: i32) {
        self.scroll_top = top;
    }

    /// Resize the window.
    pub fn set_viewport(&mut self, size: Size) {
        self.viewport = size;
    }

    /// Set or clear the URL fragment (include the `#`).
    pub fn set_location_hash(&mut self, hash: Option<&str>) {
        self.hash = hash.map(str::to_owned);
    }

    /// Current host time.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.clock.now()
    }

    /// Move time forward without firing anything.
    ///
    /// Timers that come due are delivered by the next [`step_until`](Self::step_until).
    pub fn advance_clock(&mut self, dt: Duration) {
        self.clock.advance(dt);
    }

    /// Scheduled timers.
    #[must_use]
    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Advance to the next timer due at or before `target` and return its events.
    ///
    /// When nothing is due by `target` the clock moves to `target` and `None`
    /// is returned, ending a `while let` loop.
    pub fn step_until(&mut self, target: Duration) -> Option<Vec<DomEvent>> {
        match self.timers.next_due() {
            Some(due) if due <= target => {
                self.clock.set(due);
                let now = self.clock.now();
                let fired = self.timers.pop_due(now);
                Some(
                    fired
                        .into_iter()
                        .map(|f| DomEvent::Timer {
                            owner: f.owner,
                            id: f.id,
                        })
                        .collect(),
                )
            }
            _ => {
                self.clock.set(target);
                None
            }
        }
    }

    /// Requests waiting for [`resolve_fetch`](Self::resolve_fetch).
    #[must_use]
    pub fn pending_fetches(&self) -> Vec<FetchRequest> {
        self.fetch.in_flight().cloned().collect()
    }

    /// Every request ever issued, in order.
    #[must_use]
    pub fn fetch_log(&self) -> &[(NodeId, String)] {
        &self.fetch_log
    }

    /// Complete a request.
    pub fn resolve_fetch(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> bool {
        self.fetch.resolve(ticket, outcome)
    }

    /// Completed fetches as events, ready for dispatch.
    pub fn fetch_events(&mut self) -> Vec<DomEvent> {
        self.fetch
            .drain()
            .into_iter()
            .map(DomEvent::Fetched)
            .collect()
    }

    /// Cookie storage.
    #[must_use]
    pub fn cookies(&self) -> &MemoryCookieJar {
        &self.cookies
    }

    /// Live value of a cookie.
    #[must_use]
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.peek(name, self.clock.now())
    }

    /// Store a cookie as if set by an earlier session.
    pub fn seed_cookie(&mut self, name: &str, value: &str) {
        let now = self.clock.now();
        if let Err(err) = self.cookies.write(Cookie::site_wide(name, value, 30), now) {
            tracing::warn!(%err, "seed cookie rejected");
        }
    }
}

impl Dom for HeadlessHost {
    fn find(&self, scope: NodeId, selector: &str) -> Vec<NodeId> {
        self.dom.find(scope, selector)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.dom.parent(node)
    }

    fn closest(&self, node: NodeId, selector: Option<&str>) -> Option<NodeId> {
        self.dom.closest(node, selector)
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.dom.contains(ancestor, node)
    }

    fn attr(&self, node: NodeId, name: &str) -> Option<String> {
        self.dom.attr(node, name).map(str::to_owned)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        self.dom.add_class(node, class);
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.dom.remove_class(node, class);
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.dom.has_class(node, class)
    }

    fn css_px(&self, node: NodeId, property: &str) -> Option<i32> {
        self.dom.css_px(node, property)
    }

    fn set_css(&mut self, node: NodeId, property: &str, value: CssValue) {
        self.dom.set_inline_style(node, property, value);
    }

    fn clear_inline_style(&mut self, node: NodeId) {
        self.dom.clear_inline_style(node);
    }

    fn reveal(&mut self, node: NodeId) {
        self.dom.remove_class(node, HIDE_CLASS);
        self.dom.add_class(node, SHOW_CLASS);
    }

    fn conceal(&mut self, node: NodeId) {
        self.dom.remove_class(node, SHOW_CLASS);
        self.dom.add_class(node, HIDE_CLASS);
    }

    fn is_shown(&self, node: NodeId) -> bool {
        self.dom.has_class(node, SHOW_CLASS)
    }

    fn is_hidden(&self, node: NodeId) -> bool {
        self.dom.is_hidden(node)
    }

    fn set_html(&mut self, node: NodeId, html: &str) {
        self.dom.set_html(node, html);
    }

    fn outer_size(&self, node: NodeId) -> Size {
        self.dom.size(node)
    }

    fn offset_top(&self, node: NodeId) -> i32 {
        self.dom.offset_top(node)
    }
}

impl Window for HeadlessHost {
    fn scroll_top(&self) -> i32 {
        self.scroll_top
    }

    fn viewport(&self) -> Size {
        self.viewport
    }

    fn location_hash(&self) -> Option<String> {
        self.hash.clone()
    }

    fn now(&self) -> Duration {
        self.clock.now()
    }
}

impl TimerHost for HeadlessHost {
    fn set_interval(&mut self, owner: NodeId, period: Duration) -> TimerId {
        self.timers
            .schedule_interval(owner, period, self.clock.now())
    }

    fn set_timeout(&mut self, owner: NodeId, delay: Duration) -> TimerId {
        self.timers.schedule_timeout(owner, delay, self.clock.now())
    }

    fn clear_timer(&mut self, id: TimerId) {
        self.timers.cancel(id);
    }
}

impl FetchHost for HeadlessHost {
    fn request(&mut self, owner: NodeId, url: &str) -> FetchTicket {
        self.fetch_log.push((owner, url.to_owned()));
        self.fetch.issue(owner, url)
    }
}

impl CookieJar for HeadlessHost {
    fn read_cookie(&self, name: &str) -> Option<String> {
        self.cookie(name).map(str::to_owned)
    }

    fn write_cookie(&mut self, cookie: Cookie) -> Result<(), StorageError> {
        let now = self.clock.now();
        self.cookies.write(cookie, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn step_until_walks_each_due_instant() {
        let mut host = HeadlessHost::new();
        let owner = NodeId(7);
        host.set_interval(owner, ms(100));
        let mut seen = Vec::new();
        while let Some(events) = host.step_until(ms(350)) {
            seen.push((host.elapsed(), events.len()));
        }
        assert_eq!(seen, vec![(ms(100), 1), (ms(200), 1), (ms(300), 1)]);
        assert_eq!(host.elapsed(), ms(350));
    }

    #[test]
    fn timer_events_carry_owner() {
        let mut host = HeadlessHost::new();
        let id = host.set_timeout(NodeId(2), ms(0));
        let events = host.step_until(ms(0)).unwrap();
        assert_eq!(events, vec![DomEvent::Timer { owner: NodeId(2), id }]);
        assert!(host.step_until(ms(0)).is_none());
    }

    #[test]
    fn fetch_roundtrip() {
        let mut host = HeadlessHost::new();
        let t = host.request(NodeId(1), "/a");
        assert_eq!(host.pending_fetches().len(), 1);
        assert!(host.resolve_fetch(t, FetchOutcome::Success("A".into())));
        let events = host.fetch_events();
        assert_eq!(events.len(), 1);
        assert!(host.pending_fetches().is_empty());
        assert_eq!(host.fetch_log(), [(NodeId(1), "/a".to_owned())]);
    }

    #[test]
    fn reveal_conceal_toggle_classes() {
        let mut host = HeadlessHost::new();
        let root = host.dom().root();
        let n = host.dom_mut().append(root, ElementSpec::new("section"));
        host.reveal(n);
        assert!(host.is_shown(n));
        assert!(!host.has_class(n, HIDE_CLASS));
        host.conceal(n);
        assert!(!host.is_shown(n));
        assert!(host.has_class(n, HIDE_CLASS));
    }

    #[test]
    fn cookies_expire_with_host_clock() {
        let mut host = HeadlessHost::new();
        host.write_cookie(Cookie::site_wide("k", "v", 1)).unwrap();
        assert_eq!(host.read_cookie("k").as_deref(), Some("v"));
        host.advance_clock(Duration::from_secs(86_400));
        assert_eq!(host.read_cookie("k"), None);
    }
}
