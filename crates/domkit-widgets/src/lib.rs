#![forbid(unsafe_code)]

//! Interactive widgets for domkit.
//!
//! Three widgets share two small cores:
//!
//! - [`Pin`] keeps an element in view while its container scrolls past,
//!   using the pure [`positioning`] engine;
//! - [`Tabs`] and [`Carousel`] both own a [`Navigator`] and reflect its
//!   transitions into the document through [`content`].
//!
//! Widgets are plain state machines. They never hold the host; every
//! operation that touches the document borrows it as `&mut dyn Host`. The
//! [`BindingManager`] owns instances by element and routes host events to
//! them.

pub mod auto_advance;
pub mod binding;
pub mod carousel;
pub mod config;
pub mod content;
pub mod emitter;
pub mod navigator;
pub mod pin;
pub mod positioning;
pub mod tabs;

use std::any::Any;

use bitflags::bitflags;
use domkit_core::event::{DomEvent, Listeners};
use domkit_core::host::{Host, NodeId};

pub use auto_advance::AutoAdvance;
pub use binding::{BindError, BindingManager};
pub use carousel::{Animation, Carousel, CarouselOptions};
pub use config::ConfigError;
pub use content::{ContentActivator, FetchCache, LazyContent, LoadResult};
pub use emitter::{Emitter, SubscriptionId};
pub use navigator::{Boundary, NavigationState, Navigator, Transition};
pub use pin::{Pin, PinOptions, PinPhase};
pub use positioning::{PinPlacement, PinState, Positioning, PositioningEngine, Side};
pub use tabs::{Tabs, TabsMode, TabsOptions};

/// Class names widgets write.
pub mod classes {
    /// Active tab item, carousel tab.
    pub const ACTIVE: &str = "is-active";
    /// Pinned element once scroll tracking starts.
    pub const PINNED: &str = "is-pinned";
    /// Section waiting for remote content.
    pub const LOADING: &str = "is-loading";
    /// Section whose remote content failed.
    pub const FAILED: &str = "has-failed";
    /// Carousel with cycling suspended.
    pub const STOPPED: &str = "is-stopped";
    /// Every element bound as a pin.
    pub const PIN: &str = "pin";
    /// Revealed state; fade carousels strip it from every item.
    pub const SHOW: &str = "show";
}

/// Which widget an instance is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    /// [`Pin`].
    Pin,
    /// [`Tabs`].
    Tabs,
    /// [`Carousel`].
    Carousel,
}

impl WidgetKind {
    /// Lowercase name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pin => "pin",
            Self::Tabs => "tabs",
            Self::Carousel => "carousel",
        }
    }
}

/// Lifecycle notifications delivered to an instance's subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// Construction finished.
    Init,
    /// The item at `index` became active.
    Show {
        /// Newly active index.
        index: usize,
    },
    /// Every section was concealed.
    Hide,
    /// Remote content arrived for the section at `index`.
    Load {
        /// Section index.
        index: usize,
        /// Response body.
        content: String,
    },
    /// Geometry was recomputed.
    Resize,
    /// The pinned position was updated.
    Scroll,
}

bitflags! {
    /// What the host should do with the native event after a widget handled it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EventOutcome: u8 {
        /// Suppress the browser's default action (link navigation).
        const PREVENT_DEFAULT  = 0b01;
        /// Do not deliver the event to enclosing instances.
        const STOP_PROPAGATION = 0b10;
    }
}

/// A widget instance bound to one element.
///
/// Instances are `'static` so the [`BindingManager`] can hand back typed
/// references through [`Any`].
pub trait Widget: Any {
    /// Which widget this is.
    fn kind(&self) -> WidgetKind;

    /// The bound element.
    fn element(&self) -> NodeId;

    /// Event kinds this instance wants.
    fn listeners(&self) -> Listeners;

    /// React to a routed host event.
    fn handle_event(&mut self, event: &DomEvent, host: &mut dyn Host) -> EventOutcome;

    /// Release timers and subscribers. The instance is inert afterwards.
    fn teardown(&mut self, host: &mut dyn Host);

    /// Lifecycle subscribers.
    fn events(&mut self) -> &mut Emitter<WidgetEvent>;

    /// Upcast for typed access.
    fn as_any(&self) -> &dyn Any;

    /// Upcast for typed mutable access.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// First match of `selector` below `scope`.
pub(crate) fn find_first<H: Host + ?Sized>(host: &H, scope: NodeId, selector: &str) -> Option<NodeId> {
    host.find(scope, selector).into_iter().next()
}

/// Index of the node in `nodes` that is `target` or contains it.
pub(crate) fn position_containing<H: Host + ?Sized>(
    host: &H,
    nodes: &[NodeId],
    target: NodeId,
) -> Option<usize> {
    nodes.iter().position(|&node| host.contains(node, target))
}
