#![forbid(unsafe_code)]

//! Capabilities the embedding environment supplies to widgets.
//!
//! A browser binding implements these over the real document; the headless
//! host in `domkit-harness` implements them over an in-memory tree. Widgets
//! receive the whole bundle as `&mut dyn Host`.
//!
//! # Failure Modes
//!
//! | Capability | Failure | Widget behavior |
//! |------------|---------|-----------------|
//! | [`Dom`] | node missing / selector matches nothing | empty result, widget degrades |
//! | [`FetchHost`] | transport error | [`FetchOutcome::Failure`], error panel |
//! | [`CookieJar`] | write rejected | [`StorageError`], logged and ignored |

use std::fmt;
use std::time::Duration;

use crate::css::CssValue;
use crate::geometry::Size;

/// Opaque handle to a node in the host document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Handle to a timer registered with a [`TimerHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

/// Handle to an outstanding [`FetchHost::request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(pub u64);

/// Element lookup, classes, inline styles, and measurement.
pub trait Dom {
    /// Descendants of `scope` matching `selector`, in document order.
    fn find(&self, scope: NodeId, selector: &str) -> Vec<NodeId>;

    /// Direct parent of `node`.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Nearest ancestor of `node` matching `selector`, or the direct parent
    /// when `selector` is `None`.
    fn closest(&self, node: NodeId, selector: Option<&str>) -> Option<NodeId>;

    /// Whether `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    /// Attribute value.
    fn attr(&self, node: NodeId, name: &str) -> Option<String>;

    /// Add a class.
    fn add_class(&mut self, node: NodeId, class: &str);

    /// Remove a class.
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Check for a class.
    fn has_class(&self, node: NodeId, class: &str) -> bool;

    /// A style property parsed as whole pixels (`parseInt` semantics).
    fn css_px(&self, node: NodeId, property: &str) -> Option<i32>;

    /// Set an inline style property.
    fn set_css(&mut self, node: NodeId, property: &str, value: CssValue);

    /// Drop every inline style, reverting to the stylesheet layout.
    fn clear_inline_style(&mut self, node: NodeId);

    /// Show a node through the host's reveal transition.
    fn reveal(&mut self, node: NodeId);

    /// Hide a node through the host's conceal transition.
    fn conceal(&mut self, node: NodeId);

    /// Whether the node is currently revealed.
    fn is_shown(&self, node: NodeId) -> bool;

    /// Whether the node takes no space in the layout (`:hidden`).
    fn is_hidden(&self, node: NodeId) -> bool;

    /// Replace the node's content with markup.
    fn set_html(&mut self, node: NodeId, html: &str);

    /// Outer size including padding and border.
    fn outer_size(&self, node: NodeId) -> Size;

    /// Document offset of the node's top edge.
    fn offset_top(&self, node: NodeId) -> i32;
}

/// The window the document lives in.
pub trait Window {
    /// Vertical scroll offset.
    fn scroll_top(&self) -> i32;

    /// Inner window size.
    fn viewport(&self) -> Size;

    /// URL fragment including the leading `#`, if any.
    fn location_hash(&self) -> Option<String>;

    /// Monotonic time.
    fn now(&self) -> Duration;
}

/// Repeating and one-shot timers.
///
/// Fired timers come back as [`DomEvent::Timer`](crate::event::DomEvent::Timer)
/// addressed to `owner`.
pub trait TimerHost {
    /// Fire every `period` until cleared.
    fn set_interval(&mut self, owner: NodeId, period: Duration) -> TimerId;

    /// Fire once after `delay`.
    fn set_timeout(&mut self, owner: NodeId, delay: Duration) -> TimerId;

    /// Cancel a timer. Unknown ids are ignored.
    fn clear_timer(&mut self, id: TimerId);
}

/// Asynchronous content fetch.
///
/// The host answers every request exactly once with a
/// [`DomEvent::Fetched`](crate::event::DomEvent::Fetched) addressed to `owner`.
pub trait FetchHost {
    /// Start fetching `url`.
    fn request(&mut self, owner: NodeId, url: &str) -> FetchTicket;
}

/// Small durable key-value storage with expiry and path scope.
pub trait CookieJar {
    /// Current value of a cookie.
    fn read_cookie(&self, name: &str) -> Option<String>;

    /// Create or replace a cookie.
    fn write_cookie(&mut self, cookie: Cookie) -> Result<(), StorageError>;
}

/// Everything a widget may call.
pub trait Host: Dom + Window + TimerHost + FetchHost + CookieJar {}

impl<T: Dom + Window + TimerHost + FetchHost + CookieJar + ?Sized> Host for T {}

/// Result of a content fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Response body.
    Success(String),
    /// Transport or status failure.
    Failure(String),
}

impl FetchOutcome {
    /// Whether the fetch succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Completion of a [`FetchHost::request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCompletion {
    /// Ticket returned by the request.
    pub ticket: FetchTicket,
    /// Element of the widget that asked.
    pub owner: NodeId,
    /// Requested source.
    pub url: String,
    /// What happened.
    pub outcome: FetchOutcome,
}

/// A cookie write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
    /// Cookie name.
    pub name: String,
    /// Raw (unencoded) value.
    pub value: String,
    /// Lifetime from the time of the write.
    pub max_age: Duration,
    /// Path scope.
    pub path: String,
}

impl Cookie {
    /// A site-wide cookie living `days` days.
    #[must_use]
    pub fn site_wide(name: impl Into<String>, value: impl Into<String>, days: u32) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            max_age: Duration::from_secs(u64::from(days) * 24 * 60 * 60),
            path: "/".to_owned(),
        }
    }
}

/// Errors from a [`CookieJar`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The name is empty or contains characters a cookie name cannot carry.
    InvalidName(String),
    /// The host refused the write (storage disabled, quota, ...).
    Rejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid cookie name: {name:?}"),
            Self::Rejected(msg) => write!(f, "cookie write rejected: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {}
