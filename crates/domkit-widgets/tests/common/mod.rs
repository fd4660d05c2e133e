//! Shared markup builders for widget integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use domkit_core::event::DomEvent;
use domkit_core::host::NodeId;
use domkit_harness::{ElementSpec, HeadlessHost};
use domkit_widgets::{BindingManager, Emitter, WidgetEvent};

/// Lifecycle events captured by a subscriber.
pub type Recorded = Rc<RefCell<Vec<WidgetEvent>>>;

/// An emitter whose only subscriber appends to the returned log.
pub fn recorder() -> (Emitter<WidgetEvent>, Recorded) {
    let log: Recorded = Rc::new(RefCell::new(Vec::new()));
    let mut emitter = Emitter::new();
    let sink = Rc::clone(&log);
    emitter.subscribe(move |event: &WidgetEvent| sink.borrow_mut().push(event.clone()));
    (emitter, log)
}

/// A pinned aside inside a section.
pub struct PinMarkup {
    pub container: NodeId,
    pub element: NodeId,
}

/// Container at document offset 100, 500px tall, holding a 200px element.
pub fn pin_markup(host: &mut HeadlessHost) -> PinMarkup {
    pin_markup_sized(host, 500, 200)
}

pub fn pin_markup_sized(host: &mut HeadlessHost, container_height: i32, element_height: i32) -> PinMarkup {
    let root = host.dom().root();
    let container = host.dom_mut().append(
        root,
        ElementSpec::new("section")
            .class("content")
            .size(960, container_height)
            .offset_top(100),
    );
    let element = host.dom_mut().append(
        container,
        ElementSpec::new("aside").size(240, element_height).offset_top(100),
    );
    PinMarkup { container, element }
}

/// A tab container with its navigation and sections.
pub struct TabsMarkup {
    pub element: NodeId,
    pub items: Vec<NodeId>,
    pub anchors: Vec<NodeId>,
    pub sections: Vec<NodeId>,
}

/// One tab per `href`, `#id` on the container.
pub fn tabs_markup(host: &mut HeadlessHost, id: &str, hrefs: &[&str]) -> TabsMarkup {
    let root = host.dom().root();
    let element = host
        .dom_mut()
        .append(root, ElementSpec::new("div").id(id).class("tabs"));
    let nav = host
        .dom_mut()
        .append(element, ElementSpec::new("div").class("tabs-nav"));
    let list = host.dom_mut().append(nav, ElementSpec::new("ul"));

    let mut items = Vec::new();
    let mut anchors = Vec::new();
    for href in hrefs {
        let item = host.dom_mut().append(list, ElementSpec::new("li"));
        let anchor = host
            .dom_mut()
            .append(item, ElementSpec::new("a").attr("href", href));
        items.push(item);
        anchors.push(anchor);
    }

    let sections = hrefs
        .iter()
        .map(|_| {
            host.dom_mut()
                .append(element, ElementSpec::new("div").class("tabs-section"))
        })
        .collect();

    TabsMarkup {
        element,
        items,
        anchors,
        sections,
    }
}

/// A carousel with its wrapper, items, tabs, and buttons.
pub struct CarouselMarkup {
    pub element: NodeId,
    pub wrapper: NodeId,
    pub items: Vec<NodeId>,
    pub tabs_wrapper: NodeId,
    pub tabs: Vec<NodeId>,
    pub next: NodeId,
    pub prev: NodeId,
}

/// `count` items of 600x300.
pub fn carousel_markup(host: &mut HeadlessHost, count: usize) -> CarouselMarkup {
    let root = host.dom().root();
    carousel_markup_in(host, root, count)
}

/// [`carousel_markup`] under an arbitrary parent.
pub fn carousel_markup_in(host: &mut HeadlessHost, parent: NodeId, count: usize) -> CarouselMarkup {
    let element = host
        .dom_mut()
        .append(parent, ElementSpec::new("div").class("carousel").size(600, 300));
    let wrapper = host
        .dom_mut()
        .append(element, ElementSpec::new("ul").class("carousel-items"));
    let items = (0..count)
        .map(|_| host.dom_mut().append(wrapper, ElementSpec::new("li").size(600, 300)))
        .collect();
    let tabs_wrapper = host
        .dom_mut()
        .append(element, ElementSpec::new("div").class("carousel-tabs"));
    let tabs = (0..count)
        .map(|i| {
            host.dom_mut()
                .append(tabs_wrapper, ElementSpec::new("a").attr("href", &format!("#slide-{i}")))
        })
        .collect();
    let prev = host
        .dom_mut()
        .append(element, ElementSpec::new("a").class("carousel-prev"));
    let next = host
        .dom_mut()
        .append(element, ElementSpec::new("a").class("carousel-next"));
    CarouselMarkup {
        element,
        wrapper,
        items,
        tabs_wrapper,
        tabs,
        next,
        prev,
    }
}

/// Fire every timer due up to `target`, dispatching each through `widgets`.
pub fn run_until(widgets: &mut BindingManager, host: &mut HeadlessHost, target: Duration) {
    while let Some(events) = host.step_until(target) {
        widgets.dispatch_all(&events, host);
    }
}

/// Deliver every resolved fetch through `widgets`.
pub fn deliver_fetches(widgets: &mut BindingManager, host: &mut HeadlessHost) {
    let events: Vec<DomEvent> = host.fetch_events();
    widgets.dispatch_all(&events, host);
}

pub fn ms(millis: u64) -> Duration {
    Duration::from_millis(millis)
}
