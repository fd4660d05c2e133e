#![forbid(unsafe_code)]

//! Cycling slideshow.
//!
//! Markup: an items wrapper (`items_element`) holding the items
//! (`item_element`), an optional tabs wrapper (`tabs_element`) holding one
//! tab per item (`tab_element`), and optional next/prev buttons.
//!
//! Navigation wraps in both directions. While `auto_cycle` is on, one
//! repeating timer advances the carousel every `duration`; any jump
//! restarts the period. Hovering the element suspends cycling when
//! `stop_on_hover` is set. Arrow keys navigate while the carousel is bound:
//!
//! | Key | Action |
//! |-----|--------|
//! | Up | first item |
//! | Down | last item |
//! | Left | previous |
//! | Right | next |
//!
//! A carousel with one item or fewer hides its tabs and buttons and
//! never listens for anything.

use std::time::Duration;

use domkit_core::css::CssValue;
use domkit_core::event::{DomEvent, KeyCode, Listeners};
use domkit_core::geometry::Size;
use domkit_core::host::{Host, NodeId};

use crate::auto_advance::{AutoAdvance, DEFAULT_PERIOD};
use crate::config::nonzero_or;
#[cfg(feature = "serde")]
use crate::config::ConfigError;
use crate::emitter::Emitter;
use crate::navigator::{Boundary, Navigator, Transition};
use crate::{EventOutcome, Widget, WidgetEvent, WidgetKind, classes, find_first, position_containing};

/// How the carousel moves between items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Animation {
    /// Horizontal strip moved by percentage.
    #[default]
    Slide,
    /// Vertical strip moved by item height.
    SlideUp,
    /// Items stacked; only the active one is revealed.
    Fade,
}

/// Options for [`Carousel`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CarouselOptions {
    /// Extra classes added to the element at bind time.
    pub class_name: String,
    /// Transition style.
    pub animation: Animation,
    /// Cycle period.
    #[cfg_attr(feature = "serde", serde(with = "crate::config::millis"))]
    pub duration: Duration,
    /// Advance automatically.
    pub auto_cycle: bool,
    /// Suspend cycling while the pointer is over the element.
    pub stop_on_hover: bool,
    /// Selector of the items wrapper.
    pub items_element: String,
    /// Selector of items inside the wrapper.
    pub item_element: String,
    /// Selector of the tabs wrapper.
    pub tabs_element: String,
    /// Selector of tabs inside their wrapper.
    pub tab_element: String,
    /// Selector of next buttons.
    pub next_element: String,
    /// Selector of previous buttons.
    pub prev_element: String,
}

impl Default for CarouselOptions {
    fn default() -> Self {
        Self {
            class_name: String::new(),
            animation: Animation::Slide,
            duration: DEFAULT_PERIOD,
            auto_cycle: true,
            stop_on_hover: true,
            items_element: ".carousel-items".to_owned(),
            item_element: "li".to_owned(),
            tabs_element: ".carousel-tabs".to_owned(),
            tab_element: "a".to_owned(),
            next_element: ".carousel-next".to_owned(),
            prev_element: ".carousel-prev".to_owned(),
        }
    }
}

impl CarouselOptions {
    /// Set extra element classes.
    #[must_use]
    pub fn class_name(mut self, classes: impl Into<String>) -> Self {
        self.class_name = classes.into();
        self
    }

    /// Set the transition style.
    #[must_use]
    pub fn animation(mut self, animation: Animation) -> Self {
        self.animation = animation;
        self
    }

    /// Set the cycle period.
    #[must_use]
    pub fn duration(mut self, period: Duration) -> Self {
        self.duration = period;
        self
    }

    /// Toggle automatic cycling.
    #[must_use]
    pub fn auto_cycle(mut self, on: bool) -> Self {
        self.auto_cycle = on;
        self
    }

    /// Toggle hover suspension.
    #[must_use]
    pub fn stop_on_hover(mut self, on: bool) -> Self {
        self.stop_on_hover = on;
        self
    }

    /// Set the items wrapper selector.
    #[must_use]
    pub fn items_element(mut self, selector: impl Into<String>) -> Self {
        self.items_element = selector.into();
        self
    }

    /// Set the item selector.
    #[must_use]
    pub fn item_element(mut self, selector: impl Into<String>) -> Self {
        self.item_element = selector.into();
        self
    }

    /// Set the tabs wrapper selector.
    #[must_use]
    pub fn tabs_element(mut self, selector: impl Into<String>) -> Self {
        self.tabs_element = selector.into();
        self
    }

    /// Set the tab selector.
    #[must_use]
    pub fn tab_element(mut self, selector: impl Into<String>) -> Self {
        self.tab_element = selector.into();
        self
    }

    /// Set the next button selector.
    #[must_use]
    pub fn next_element(mut self, selector: impl Into<String>) -> Self {
        self.next_element = selector.into();
        self
    }

    /// Set the previous button selector.
    #[must_use]
    pub fn prev_element(mut self, selector: impl Into<String>) -> Self {
        self.prev_element = selector.into();
        self
    }

    /// Replace unusable values with defaults.
    #[must_use]
    pub fn validated(mut self) -> Self {
        self.duration = nonzero_or(self.duration, DEFAULT_PERIOD, "carousel.duration");
        self
    }

    /// Defaults overridden by a JSON object.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        crate::config::from_json(json)
    }
}

/// Carousel controller bound to one element.
#[derive(Debug)]
pub struct Carousel {
    element: NodeId,
    options: CarouselOptions,
    items_wrapper: Option<NodeId>,
    items: Vec<NodeId>,
    tabs: Vec<NodeId>,
    next_buttons: Vec<NodeId>,
    prev_buttons: Vec<NodeId>,
    navigator: Navigator,
    timer: AutoAdvance,
    item_size: Size,
    enabled: bool,
    inert: bool,
    events: Emitter<WidgetEvent>,
}

impl Carousel {
    /// Bind to `element` and start cycling.
    pub fn new(element: NodeId, options: CarouselOptions, host: &mut dyn Host) -> Self {
        Self::with_events(element, options, Emitter::new(), host)
    }

    /// Bind with subscribers that should observe `Init`.
    pub fn with_events(
        element: NodeId,
        options: CarouselOptions,
        events: Emitter<WidgetEvent>,
        host: &mut dyn Host,
    ) -> Self {
        let options = options.validated();
        for class in options.class_name.split_whitespace() {
            host.add_class(element, class);
        }

        let items_wrapper = find_first(&*host, element, &options.items_element);
        let items = items_wrapper.map_or_else(Vec::new, |w| host.find(w, &options.item_element));
        let tabs_wrapper = find_first(&*host, element, &options.tabs_element);
        let tabs = tabs_wrapper.map_or_else(Vec::new, |w| host.find(w, &options.tab_element));
        let next_buttons = host.find(element, &options.next_element);
        let prev_buttons = host.find(element, &options.prev_element);

        let inert = items.len() <= 1;
        let mut carousel = Self {
            element,
            items_wrapper,
            navigator: Navigator::new(items.len(), Boundary::Wrap),
            items,
            tabs,
            next_buttons,
            prev_buttons,
            timer: AutoAdvance::new(options.duration, options.auto_cycle),
            item_size: Size::ZERO,
            enabled: false,
            inert,
            events,
            options,
        };

        if inert {
            let hidden = tabs_wrapper
                .into_iter()
                .chain(carousel.next_buttons.iter().copied())
                .chain(carousel.prev_buttons.iter().copied());
            for node in hidden {
                host.set_css(node, "display", CssValue::Keyword("none"));
            }
            domkit_core::debug!(element = element.0, items = carousel.items.len(), "carousel inert");
        } else {
            carousel.prepare_layout(host);
            carousel.disable(host);
            carousel.enable(host);
            domkit_core::debug!(
                element = element.0,
                items = carousel.items.len(),
                tabs = carousel.tabs.len(),
                "carousel bound"
            );
        }
        carousel.events.emit(&WidgetEvent::Init);
        carousel
    }

    /// Options after validation.
    #[must_use]
    pub fn options(&self) -> &CarouselOptions {
        &self.options
    }

    /// Items in order.
    #[must_use]
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    /// Tabs in order.
    #[must_use]
    pub fn tabs(&self) -> &[NodeId] {
        &self.tabs
    }

    /// Index state.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Active item.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.navigator.current()
    }

    /// Last distinct item before the active one.
    #[must_use]
    pub fn previous(&self) -> Option<usize> {
        self.navigator.previous()
    }

    /// Cached size of the first item.
    #[must_use]
    pub fn item_size(&self) -> Size {
        self.item_size
    }

    /// Cycle timer state.
    #[must_use]
    pub fn timer(&self) -> &AutoAdvance {
        &self.timer
    }

    /// Whether cycling is suspended.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.timer.is_stopped()
    }

    /// Whether tab, button, and hover events are acted on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the carousel has too few items to do anything.
    #[must_use]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Act on tab, button, and hover events; resume cycling.
    pub fn enable(&mut self, host: &mut dyn Host) {
        if self.inert {
            return;
        }
        self.enabled = true;
        self.start(host);
        self.timer.reset(host, self.element);
    }

    /// Ignore tab, button, and hover events; suspend cycling.
    pub fn disable(&mut self, host: &mut dyn Host) {
        if self.inert {
            return;
        }
        self.enabled = false;
        self.stop(host);
        self.timer.reset(host, self.element);
    }

    /// Resume cycling.
    pub fn start(&mut self, host: &mut dyn Host) {
        host.remove_class(self.element, classes::STOPPED);
        self.timer.start();
    }

    /// Suspend cycling; the timer keeps running but its ticks do nothing.
    pub fn stop(&mut self, host: &mut dyn Host) {
        host.add_class(self.element, classes::STOPPED);
        self.timer.stop();
    }

    /// Go to `index`; `>= len` wraps to the first item, negative to the last.
    pub fn jump(&mut self, index: isize, host: &mut dyn Host) {
        if self.inert {
            return;
        }
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("carousel_jump", element = self.element.0, index).entered();

        let Some(transition) = self.navigator.jump(index) else {
            return;
        };
        self.apply(transition, host);
        self.timer.reset(host, self.element);
        self.events.emit(&WidgetEvent::Show {
            index: transition.to,
        });
    }

    /// Go to the next item.
    pub fn next(&mut self, host: &mut dyn Host) {
        let index = self.offset(1);
        self.jump(index, host);
    }

    /// Go to the previous item.
    pub fn prev(&mut self, host: &mut dyn Host) {
        let index = self.offset(-1);
        self.jump(index, host);
    }

    /// Cache the first item's size and pin the wrapper height for stacked layouts.
    pub fn resize(&mut self, host: &mut dyn Host) {
        let Some(&first) = self.items.first() else {
            return;
        };
        self.item_size = host.outer_size(first);
        if self.options.animation != Animation::Slide {
            if let Some(wrapper) = self.items_wrapper {
                host.set_css(wrapper, "height", CssValue::Px(self.item_size.height));
            }
        }
        self.events.emit(&WidgetEvent::Resize);
    }

    fn offset(&self, delta: isize) -> isize {
        let current = self.navigator.current().unwrap_or(0);
        isize::try_from(current)
            .unwrap_or(isize::MAX)
            .saturating_add(delta)
    }

    fn prepare_layout(&mut self, host: &mut dyn Host) {
        match self.options.animation {
            Animation::Fade => {
                if let Some(&first) = self.items.first() {
                    host.reveal(first);
                }
            }
            Animation::Slide => {
                let count = self.items.len() as f64;
                if let Some(wrapper) = self.items_wrapper {
                    host.set_css(wrapper, "width", CssValue::Percent(count * 100.0));
                }
                for &item in &self.items {
                    host.set_css(item, "width", CssValue::Percent(100.0 / count));
                }
            }
            Animation::SlideUp => {}
        }
    }

    fn apply(&mut self, transition: Transition, host: &mut dyn Host) {
        let to = transition.to;
        if !self.tabs.is_empty() {
            for &tab in &self.tabs {
                host.remove_class(tab, classes::ACTIVE);
            }
            if let Some(&tab) = self.tabs.get(to) {
                host.add_class(tab, classes::ACTIVE);
            }
        }

        match self.options.animation {
            Animation::Fade => {
                // Strip `show` rather than conceal every item.
                for &item in &self.items {
                    host.remove_class(item, classes::SHOW);
                }
                if let Some(&item) = self.items.get(to) {
                    host.reveal(item);
                }
            }
            Animation::SlideUp => {
                if self.item_size.height == 0 {
                    self.resize(host);
                }
                let offset = (to as i32).saturating_mul(self.item_size.height);
                if let Some(wrapper) = self.items_wrapper {
                    host.set_css(wrapper, "top", CssValue::Px(-offset));
                }
            }
            Animation::Slide => {
                if let Some(wrapper) = self.items_wrapper {
                    host.set_css(wrapper, "left", CssValue::Percent(0.0 - to as f64 * 100.0));
                }
            }
        }
        domkit_core::trace!(element = self.element.0, from = transition.from, to, "carousel moved");
    }

    fn cycle(&mut self, host: &mut dyn Host) {
        if self.item_size.width == 0 || self.item_size.height == 0 {
            self.resize(host);
        }
        if !self.timer.is_stopped() {
            self.next(host);
        }
    }

    fn on_key(&mut self, key: KeyCode, host: &mut dyn Host) {
        match key {
            KeyCode::Up => self.jump(0, host),
            KeyCode::Down => self.jump(-1, host),
            KeyCode::Left => self.prev(host),
            KeyCode::Right => self.next(host),
            _ => {}
        }
    }

    fn on_click(&mut self, target: NodeId, host: &mut dyn Host) -> EventOutcome {
        if !self.enabled {
            return EventOutcome::empty();
        }
        if let Some(index) = position_containing(&*host, &self.tabs, target) {
            self.jump(isize::try_from(index).unwrap_or(0), host);
            return EventOutcome::PREVENT_DEFAULT | EventOutcome::STOP_PROPAGATION;
        }
        if position_containing(&*host, &self.next_buttons, target).is_some() {
            self.next(host);
        } else if position_containing(&*host, &self.prev_buttons, target).is_some() {
            self.prev(host);
        }
        EventOutcome::empty()
    }
}

impl Widget for Carousel {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Carousel
    }

    fn element(&self) -> NodeId {
        self.element
    }

    fn listeners(&self) -> Listeners {
        if self.inert {
            return Listeners::empty();
        }
        Listeners::KEYDOWN | Listeners::RESIZE | Listeners::TIMER | Listeners::HOVER | Listeners::CLICK
    }

    fn handle_event(&mut self, event: &DomEvent, host: &mut dyn Host) -> EventOutcome {
        if self.inert {
            return EventOutcome::empty();
        }
        match event {
            DomEvent::Key(key) => self.on_key(*key, host),
            DomEvent::Resize => self.resize(host),
            DomEvent::Timer { id, .. } => {
                if self.timer.owns(*id) {
                    self.cycle(host);
                }
            }
            DomEvent::MouseEnter { target } => {
                if *target == self.element && self.enabled && self.options.stop_on_hover {
                    self.stop(host);
                }
            }
            DomEvent::MouseLeave { target } => {
                if *target == self.element && self.enabled && self.options.stop_on_hover {
                    self.start(host);
                }
            }
            DomEvent::Click { target } => return self.on_click(*target, host),
            _ => {}
        }
        EventOutcome::empty()
    }

    fn teardown(&mut self, host: &mut dyn Host) {
        self.timer.cancel(host);
        self.enabled = false;
        self.inert = true;
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
