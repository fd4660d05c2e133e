#![forbid(unsafe_code)]

//! Scroll pinning inside a container.
//!
//! A [`Pin`] keeps its element in view while the window scrolls through
//! the element's container, and stops at the container's bottom edge.
//!
//! # State machine
//!
//! ```text
//!            resize: container fits           scroll >= container top
//!  Disabled ─────────────────────────▶ Unpinned ─────────────────────▶ Pinned
//!     ▲        resize: too small / gone  ◀───────────────────────────────┘
//!     └──────────────────────────────────        scroll < container top
//! ```
//!
//! Scroll and resize are throttled per instance. A call landing inside the
//! throttle window schedules one trailing run through a one-shot timer
//! owned by the element; further calls in the same window are coalesced.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | no container matches `context` | disabled |
//! | zero-height container, or shorter than the element | disabled |
//! | element hidden | scroll ticks ignored |

use std::time::Duration;

use domkit_core::event::{DomEvent, Listeners};
use domkit_core::geometry::GeometrySnapshot;
use domkit_core::host::{Host, NodeId, TimerId};
use domkit_core::throttle::ThrottleDecision;
use domkit_core::viewport::{SampleKind, ViewportTracker};

use crate::config::nonzero_or;
#[cfg(feature = "serde")]
use crate::config::ConfigError;
use crate::emitter::Emitter;
use crate::positioning::{PinState, PositioningEngine, Side};
use crate::{EventOutcome, Widget, WidgetEvent, WidgetKind, classes};

/// Default throttle window for scroll and resize.
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(50);

/// Options for [`Pin`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PinOptions {
    /// Extra classes added to the element at bind time.
    pub animation: String,
    /// Edge the horizontal offset is measured from.
    pub location: Side,
    /// Horizontal offset in pixels.
    pub x_offset: i32,
    /// Vertical offset added while tracking.
    pub y_offset: i32,
    /// Minimum spacing between scroll or resize runs.
    #[cfg_attr(feature = "serde", serde(with = "crate::config::millis"))]
    pub throttle: Duration,
    /// Flip between `fixed` and bottom-anchored `absolute`.
    pub fixed: bool,
    /// Re-measure geometry on every scroll tick.
    pub calculate: bool,
    /// Selector of the containing ancestor; the direct parent when unset.
    pub context: Option<String>,
}

impl Default for PinOptions {
    fn default() -> Self {
        Self {
            animation: String::new(),
            location: Side::Right,
            x_offset: 0,
            y_offset: 0,
            throttle: DEFAULT_THROTTLE,
            fixed: false,
            calculate: false,
            context: None,
        }
    }
}

impl PinOptions {
    /// Set the animation classes.
    #[must_use]
    pub fn animation(mut self, classes: impl Into<String>) -> Self {
        self.animation = classes.into();
        self
    }

    /// Set the horizontal edge.
    #[must_use]
    pub fn location(mut self, side: Side) -> Self {
        self.location = side;
        self
    }

    /// Set the horizontal offset.
    #[must_use]
    pub fn x_offset(mut self, px: i32) -> Self {
        self.x_offset = px;
        self
    }

    /// Set the vertical offset.
    #[must_use]
    pub fn y_offset(mut self, px: i32) -> Self {
        self.y_offset = px;
        self
    }

    /// Set the throttle window.
    #[must_use]
    pub fn throttle(mut self, interval: Duration) -> Self {
        self.throttle = interval;
        self
    }

    /// Enable fixed/absolute switching.
    #[must_use]
    pub fn fixed(mut self, fixed: bool) -> Self {
        self.fixed = fixed;
        self
    }

    /// Re-measure on every scroll tick.
    #[must_use]
    pub fn calculate(mut self, calculate: bool) -> Self {
        self.calculate = calculate;
        self
    }

    /// Set the container selector.
    #[must_use]
    pub fn context(mut self, selector: impl Into<String>) -> Self {
        self.context = Some(selector.into());
        self
    }

    /// Replace unusable values with defaults.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.throttle = nonzero_or(self.throttle, DEFAULT_THROTTLE, "pin.throttle");
        self
    }

    /// Defaults overridden by a JSON object.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        crate::config::from_json(json)
    }
}

/// Observable state of a [`Pin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PinPhase {
    /// Not measured yet, or the container cannot hold the element.
    Disabled,
    /// Enabled, natural layout.
    Unpinned,
    /// Enabled, tracking scroll.
    Pinned,
}

/// Scroll-pinning behavior bound to one element.
#[derive(Debug)]
pub struct Pin {
    element: NodeId,
    options: PinOptions,
    engine: PositioningEngine,
    container: Option<NodeId>,
    original_top: Option<i32>,
    geometry: GeometrySnapshot,
    tracker: ViewportTracker,
    trailing_scroll: Option<TimerId>,
    trailing_resize: Option<TimerId>,
    enabled: bool,
    state: PinState,
    events: Emitter<WidgetEvent>,
}

impl Pin {
    /// Bind to `element`.
    pub fn new(element: NodeId, options: PinOptions, host: &mut dyn Host) -> Self {
        Self::with_events(element, options, Emitter::new(), host)
    }

    /// Bind with subscribers that should observe `Init`.
    pub fn with_events(
        element: NodeId,
        options: PinOptions,
        events: Emitter<WidgetEvent>,
        host: &mut dyn Host,
    ) -> Self {
        let options = options.validated();
        host.add_class(element, classes::PIN);
        for class in options.animation.split_whitespace() {
            host.add_class(element, class);
        }
        let original_top = host.css_px(element, "top");

        let mut pin = Self {
            element,
            engine: PositioningEngine {
                fixed: options.fixed,
                side: options.location,
                x_offset: options.x_offset,
                y_offset: options.y_offset,
            },
            container: None,
            original_top,
            geometry: GeometrySnapshot::default(),
            tracker: ViewportTracker::new(options.throttle),
            trailing_scroll: None,
            trailing_resize: None,
            enabled: false,
            state: PinState::Unpinned,
            events,
            options,
        };
        domkit_core::debug!(element = element.0, ?original_top, "pin bound");
        pin.events.emit(&WidgetEvent::Init);
        pin
    }

    /// Options after validation.
    #[must_use]
    pub fn options(&self) -> &PinOptions {
        &self.options
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> PinPhase {
        match (self.enabled, self.state) {
            (false, _) => PinPhase::Disabled,
            (true, PinState::Unpinned) => PinPhase::Unpinned,
            (true, PinState::Pinned(_)) => PinPhase::Pinned,
        }
    }

    /// Result of the last scroll pass.
    #[must_use]
    pub fn state(&self) -> PinState {
        self.state
    }

    /// Geometry from the last measurement.
    #[must_use]
    pub fn geometry(&self) -> GeometrySnapshot {
        self.geometry
    }

    /// Container found by the last measurement.
    #[must_use]
    pub fn container(&self) -> Option<NodeId> {
        self.container
    }

    /// Whether scroll ticks are acted on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Act on scroll ticks.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Ignore scroll ticks.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Re-measure the element, its container and the window.
    pub fn calculate(&mut self, host: &mut dyn Host) {
        self.container = host.closest(self.element, self.options.context.as_deref());
        let (container_height, container_top) = match self.container {
            Some(container) => (host.outer_size(container).height, host.offset_top(container)),
            None => (0, 0),
        };
        self.geometry = GeometrySnapshot {
            viewport: host.viewport(),
            element_height: host.outer_size(self.element).height,
            element_top: self.original_top,
            container_height,
            container_top,
        };
    }

    /// Measure and decide whether pinning can work.
    pub fn resize(&mut self, host: &mut dyn Host) {
        self.calculate(host);
        let fits = self.container.is_some() && self.geometry.container_fits_element();
        if fits {
            self.enable();
        } else {
            self.disable();
        }
        domkit_core::debug!(
            element = self.element.0,
            container_height = self.geometry.container_height,
            element_height = self.geometry.element_height,
            enabled = fits,
            "pin resized"
        );
        self.events.emit(&WidgetEvent::Resize);
    }

    /// Position the element for the current scroll offset.
    pub fn scroll(&mut self, host: &mut dyn Host) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("pin_scroll", element = self.element.0).entered();

        if self.options.calculate {
            self.calculate(host);
        }
        if !self.enabled || host.is_hidden(self.element) {
            return;
        }

        let sample = self.tracker.sample(&*host);
        let state = self.engine.compute(&self.geometry, sample.scroll_top);
        self.state = state;
        match state {
            PinState::Unpinned => {
                host.clear_inline_style(self.element);
                // Class stays as a tracking hook even in natural layout.
                host.add_class(self.element, classes::PINNED);
            }
            PinState::Pinned(placement) => {
                for (property, value) in placement.styles() {
                    host.set_css(self.element, property, value);
                }
                host.add_class(self.element, classes::PINNED);
                domkit_core::trace!(
                    element = self.element.0,
                    scroll_top = sample.scroll_top,
                    y = ?placement.y(),
                    "pin placed"
                );
                self.events.emit(&WidgetEvent::Scroll);
            }
        }
    }

    fn run(&mut self, kind: SampleKind, host: &mut dyn Host) {
        match kind {
            SampleKind::Scroll => self.scroll(host),
            SampleKind::Resize => self.resize(host),
        }
    }

    fn throttled(&mut self, kind: SampleKind, host: &mut dyn Host) {
        match self.tracker.offer(kind, host.now()) {
            ThrottleDecision::Run => self.run(kind, host),
            ThrottleDecision::Schedule(delay) => {
                let id = host.set_timeout(self.element, delay);
                *self.trailing_slot(kind) = Some(id);
            }
            ThrottleDecision::Coalesced => {}
        }
    }

    fn on_timer(&mut self, id: TimerId, host: &mut dyn Host) {
        for kind in [SampleKind::Scroll, SampleKind::Resize] {
            let slot = self.trailing_slot(kind);
            if *slot != Some(id) {
                continue;
            }
            *slot = None;
            if self.tracker.fire_trailing(kind, host.now()) {
                self.run(kind, host);
            }
        }
    }

    fn trailing_slot(&mut self, kind: SampleKind) -> &mut Option<TimerId> {
        match kind {
            SampleKind::Scroll => &mut self.trailing_scroll,
            SampleKind::Resize => &mut self.trailing_resize,
        }
    }
}

impl Widget for Pin {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Pin
    }

    fn element(&self) -> NodeId {
        self.element
    }

    fn listeners(&self) -> Listeners {
        Listeners::READY | Listeners::SCROLL | Listeners::RESIZE | Listeners::TIMER
    }

    fn handle_event(&mut self, event: &DomEvent, host: &mut dyn Host) -> EventOutcome {
        match event {
            DomEvent::Ready => self.resize(host),
            DomEvent::Scroll => self.throttled(SampleKind::Scroll, host),
            DomEvent::Resize => self.throttled(SampleKind::Resize, host),
            DomEvent::Timer { id, .. } => self.on_timer(*id, host),
            _ => {}
        }
        EventOutcome::empty()
    }

    fn teardown(&mut self, host: &mut dyn Host) {
        for id in [self.trailing_scroll.take(), self.trailing_resize.take()]
            .into_iter()
            .flatten()
        {
            host.clear_timer(id);
        }
        self.tracker.reset();
        self.enabled = false;
        self.events.clear();
    }

    fn events(&mut self) -> &mut Emitter<WidgetEvent> {
        &mut self.events
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
