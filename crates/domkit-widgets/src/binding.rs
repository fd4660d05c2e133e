#![forbid(unsafe_code)]

//! Element → instance ownership and event routing.
//!
//! The [`BindingManager`] is the only owner of widget instances. Binding an
//! element that already has an instance returns the existing one, so a
//! widget is never constructed twice for the same element.
//!
//! # Routing
//!
//! | Scope | Delivered to |
//! |-------|--------------|
//! | window (`ready`, `scroll`, `resize`, `keydown`) | every instance listening, in element order |
//! | element (`click`, `mouseover`, hover) | instances on the target and its ancestors, innermost first, until one stops propagation |
//! | owner (timers, fetches) | the instance bound to the owning element |
//!
//! An instance only sees kinds in its [`Widget::listeners`].

use std::collections::BTreeMap;
use std::fmt;

use domkit_core::event::{DomEvent, EventScope};
use domkit_core::host::{Host, NodeId};

use crate::carousel::{Carousel, CarouselOptions};
use crate::pin::{Pin, PinOptions};
use crate::tabs::{Tabs, TabsOptions};
use crate::{EventOutcome, Widget, WidgetKind};

/// Errors from [`BindingManager`] lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindError {
    /// No instance is bound to the element.
    NotBound(NodeId),
    /// The bound instance is a different widget.
    WrongKind {
        /// The element.
        element: NodeId,
        /// What is actually bound.
        found: WidgetKind,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBound(element) => write!(f, "no widget bound to node {}", element.0),
            Self::WrongKind { element, found } => {
                write!(f, "node {} is bound to a {} widget", element.0, found.name())
            }
        }
    }
}

impl std::error::Error for BindError {}

/// Owner of every bound instance.
#[derive(Default)]
pub struct BindingManager {
    instances: BTreeMap<NodeId, Box<dyn Widget>>,
}

impl fmt::Debug for BindingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (element, widget) in &self.instances {
            map.entry(&element.0, &widget.kind().name());
        }
        map.finish()
    }
}

impl BindingManager {
    /// Create an empty manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the instance built by `make`, or return the one already bound.
    ///
    /// `make` is not called when `element` is already bound.
    pub fn bind<W, F>(&mut self, element: NodeId, host: &mut dyn Host, make: F) -> Result<&mut W, BindError>
    where
        W: Widget,
        F: FnOnce(&mut dyn Host) -> W,
    {
        if !self.instances.contains_key(&element) {
            let widget = make(host);
            domkit_core::debug!(element = element.0, kind = widget.kind().name(), "widget bound");
            self.instances.insert(element, Box::new(widget));
        }
        self.get_mut(element)
    }

    /// Bind a [`Pin`].
    pub fn bind_pin(
        &mut self,
        element: NodeId,
        options: PinOptions,
        host: &mut dyn Host,
    ) -> Result<&mut Pin, BindError> {
        self.bind(element, host, |host| Pin::new(element, options, host))
    }

    /// Bind a [`Tabs`].
    pub fn bind_tabs(
        &mut self,
        element: NodeId,
        options: TabsOptions,
        host: &mut dyn Host,
    ) -> Result<&mut Tabs, BindError> {
        self.bind(element, host, |host| Tabs::new(element, options, host))
    }

    /// Bind a [`Carousel`].
    pub fn bind_carousel(
        &mut self,
        element: NodeId,
        options: CarouselOptions,
        host: &mut dyn Host,
    ) -> Result<&mut Carousel, BindError> {
        self.bind(element, host, |host| Carousel::new(element, options, host))
    }

    /// Tear down and drop the instance on `element`.
    pub fn unbind(&mut self, element: NodeId, host: &mut dyn Host) -> Result<(), BindError> {
        let mut widget = self
            .instances
            .remove(&element)
            .ok_or(BindError::NotBound(element))?;
        widget.teardown(host);
        domkit_core::debug!(element = element.0, kind = widget.kind().name(), "widget unbound");
        Ok(())
    }

    /// Tear down every instance.
    pub fn unbind_all(&mut self, host: &mut dyn Host) {
        for (_, mut widget) in std::mem::take(&mut self.instances) {
            widget.teardown(host);
        }
    }

    /// Whether `element` has an instance.
    #[must_use]
    pub fn is_bound(&self, element: NodeId) -> bool {
        self.instances.contains_key(&element)
    }

    /// Number of instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Bound elements in order.
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.instances.keys().copied()
    }

    /// The instance on `element`, untyped.
    pub fn widget_mut(&mut self, element: NodeId) -> Result<&mut dyn Widget, BindError> {
        self.instances
            .get_mut(&element)
            .map(|w| &mut **w as &mut dyn Widget)
            .ok_or(BindError::NotBound(element))
    }

    /// The instance on `element` as a `W`.
    pub fn get<W: Widget>(&self, element: NodeId) -> Result<&W, BindError> {
        let widget = self
            .instances
            .get(&element)
            .ok_or(BindError::NotBound(element))?;
        let found = widget.kind();
        widget
            .as_any()
            .downcast_ref::<W>()
            .ok_or(BindError::WrongKind { element, found })
    }

    /// The instance on `element` as a mutable `W`.
    pub fn get_mut<W: Widget>(&mut self, element: NodeId) -> Result<&mut W, BindError> {
        let widget = self
            .instances
            .get_mut(&element)
            .ok_or(BindError::NotBound(element))?;
        let found = widget.kind();
        widget
            .as_any_mut()
            .downcast_mut::<W>()
            .ok_or(BindError::WrongKind { element, found })
    }

    /// Route one host event. Outcomes of every handler are combined.
    pub fn dispatch(&mut self, event: &DomEvent, host: &mut dyn Host) -> EventOutcome {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("dispatch", kind = ?event.kind()).entered();

        let kind = event.kind();
        let mut outcome = EventOutcome::empty();
        match event.scope() {
            EventScope::Window => {
                for widget in self.instances.values_mut() {
                    if widget.listeners().contains(kind) {
                        outcome |= widget.handle_event(event, host);
                    }
                }
            }
            EventScope::Element(target) => {
                let mut cursor = Some(target);
                while let Some(node) = cursor {
                    if let Some(widget) = self.instances.get_mut(&node) {
                        if widget.listeners().contains(kind) {
                            outcome |= widget.handle_event(event, host);
                            if outcome.contains(EventOutcome::STOP_PROPAGATION) {
                                break;
                            }
                        }
                    }
                    cursor = host.parent(node);
                }
            }
            EventScope::Owner(owner) => match self.instances.get_mut(&owner) {
                Some(widget) if widget.listeners().contains(kind) => {
                    outcome |= widget.handle_event(event, host);
                }
                Some(_) => {}
                None => {
                    domkit_core::trace!(owner = owner.0, "event for unbound owner dropped");
                }
            },
        }
        outcome
    }

    /// Route events in order, returning each outcome.
    pub fn dispatch_all(&mut self, events: &[DomEvent], host: &mut dyn Host) -> Vec<EventOutcome> {
        events.iter().map(|event| self.dispatch(event, host)).collect()
    }
}
