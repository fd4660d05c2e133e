#![forbid(unsafe_code)]

//! Tabbed panels with lazy remote content and cookie persistence.
//!
//! Markup: a navigation block (`nav_element`) holding `ul > li > a` tabs
//! and one section (`sections_element`) per tab, in the same order. Tabs
//! whose source (the `get_url` attribute) is not a `#fragment` are filled
//! from the remote source the first time they are shown.
//!
//! The initial tab is, in order of preference: the persisted index, the
//! tab whose `href` matches the URL fragment, `default_index`, then 0. Any
//! candidate without a tab is skipped.

use domkit_core::event::{DomEvent, Listeners};
use domkit_core::host::{Cookie, FetchCompletion, Host, NodeId};

#[cfg(feature = "serde")]
use crate::config::ConfigError;
use crate::content::{ContentActivator, LazyContent, LoadResult};
use crate::emitter::Emitter;
use crate::navigator::{Boundary, Navigator};
use crate::{EventOutcome, Widget, WidgetEvent, WidgetKind, classes, find_first, position_containing};

/// Prefix of persisted-state cookie names.
pub const COOKIE_PREFIX: &str = "domkit.tabs.";

/// Selector of tab anchors inside the navigation block.
const TAB_SELECTOR: &str = "ul > li > a";
/// Selector of tab items inside the navigation block.
const ITEM_SELECTOR: &str = "ul > li";

/// Event that shows a tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TabsMode {
    /// Clicking a tab shows it.
    #[default]
    Click,
    /// Pointing at a tab shows it.
    Hover,
}

/// Options for [`Tabs`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TabsOptions {
    /// Activation event.
    pub mode: TabsMode,
    /// Load non-fragment sources remotely.
    pub ajax: bool,
    /// Showing the active tab again toggles its section.
    pub collapsible: bool,
    /// Tab shown when nothing else decides.
    pub default_index: usize,
    /// Remember the active tab in a cookie.
    pub persist_state: bool,
    /// Suppress link navigation on tab clicks.
    pub prevent_default: bool,
    /// Pick the initial tab from the URL fragment.
    pub load_fragment: bool,
    /// Cookie key; the element's `id` when unset.
    pub cookie: Option<String>,
    /// Cookie lifetime in days.
    pub cookie_duration: u32,
    /// Attribute holding a tab's content source.
    pub get_url: String,
    /// Selector of the navigation block.
    pub nav_element: String,
    /// Selector of the sections.
    pub sections_element: String,
    /// Markup shown while a section loads.
    pub loading_template: String,
    /// Markup shown when a section fails to load.
    pub error_template: String,
}

impl Default for TabsOptions {
    fn default() -> Self {
        Self {
            mode: TabsMode::Click,
            ajax: true,
            collapsible: false,
            default_index: 0,
            persist_state: false,
            prevent_default: true,
            load_fragment: true,
            cookie: None,
            cookie_duration: 30,
            get_url: "href".to_owned(),
            nav_element: ".tabs-nav".to_owned(),
            sections_element: ".tabs-section".to_owned(),
            loading_template: "<div class=\"loading\">Loading...</div>".to_owned(),
            error_template: "<div class=\"error\">Failed to load content.</div>".to_owned(),
        }
    }
}

impl TabsOptions {
    /// Set the activation event.
    #[must_use]
    pub fn mode(mut self, mode: TabsMode) -> Self {
        self.mode = mode;
        self
    }

    /// Toggle remote loading.
    #[must_use]
    pub fn ajax(mut self, ajax: bool) -> Self {
        self.ajax = ajax;
        self
    }

    /// Toggle collapsible sections.
    #[must_use]
    pub fn collapsible(mut self, collapsible: bool) -> Self {
        self.collapsible = collapsible;
        self
    }

    /// Set the fallback tab.
    #[must_use]
    pub fn default_index(mut self, index: usize) -> Self {
        self.default_index = index;
        self
    }

    /// Toggle cookie persistence.
    #[must_use]
    pub fn persist_state(mut self, persist: bool) -> Self {
        self.persist_state = persist;
        self
    }

    /// Toggle default-action suppression.
    #[must_use]
    pub fn prevent_default(mut self, prevent: bool) -> Self {
        self.prevent_default = prevent;
        self
    }

    /// Toggle fragment lookup.
    #[must_use]
    pub fn load_fragment(mut self, load: bool) -> Self {
        self.load_fragment = load;
        self
    }

    /// Set the cookie key.
    #[must_use]
    pub fn cookie(mut self, key: impl Into<String>) -> Self {
        self.cookie = Some(key.into());
        self
    }

    /// Set the cookie lifetime in days.
    #[must_use]
    pub fn cookie_duration(mut self, days: u32) -> Self {
        self.cookie_duration = days;
        self
    }

    /// Set the source attribute.
    #[must_use]
    pub fn get_url(mut self, attribute: impl Into<String>) -> Self {
        self.get_url = attribute.into();
        self
    }

    /// Set the navigation selector.
    #[must_use]
    pub fn nav_element(mut self, selector: impl Into<String>) -> Self {
        self.nav_element = selector.into();
        self
    }

    /// Set the sections selector.
    #[must_use]
    pub fn sections_element(mut self, selector: impl Into<String>) -> Self {
        self.sections_element = selector.into();
        self
    }

    /// Set the loading markup.
    #[must_use]
    pub fn loading_template(mut self, html: impl Into<String>) -> Self {
        self.loading_template = html.into();
        self
    }

    /// Set the error markup.
    #[must_use]
    pub fn error_template(mut self, html: impl Into<String>) -> Self {
        self.error_template = html.into();
        self
    }

    /// Replace unusable values with defaults.
    #[must_use]
    pub fn validated(mut self) -> Self {
        if self.cookie_duration == 0 {
            domkit_core::warn!(field = "tabs.cookie_duration", "zero duration replaced with default");
            self.cookie_duration = Self::default().cookie_duration;
        }
        if self.get_url.is_empty() {
            self.get_url = Self::default().get_url;
        }
        self
    }

    /// Defaults overridden by a JSON object.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        crate::config::from_json(json)
    }
}

/// Tabbed-panel controller bound to one element.
#[derive(Debug)]
pub struct Tabs {
    element: NodeId,
    options: TabsOptions,
    cookie_name: Option<String>,
    nav: Option<NodeId>,
    tabs: Vec<NodeId>,
    items: Vec<NodeId>,
    sections: ContentActivator,
    navigator: Navigator,
    remote: LazyContent,
    enabled: bool,
    events: Emitter<WidgetEvent>,
}

impl Tabs {
    /// Bind to `element` and show the initial tab.
    pub fn new(element: NodeId, options: TabsOptions, host: &mut dyn Host) -> Self {
        Self::with_events(element, options, Emitter::new(), host)
    }

    /// Bind with subscribers that should observe `Init` and the first `Show`.
    pub fn with_events(
        element: NodeId,
        options: TabsOptions,
        events: Emitter<WidgetEvent>,
        host: &mut dyn Host,
    ) -> Self {
        let options = options.validated();
        let cookie_name = options
            .cookie
            .clone()
            .or_else(|| host.attr(element, "id"))
            .filter(|key| !key.is_empty())
            .map(|key| format!("{COOKIE_PREFIX}{key}"));

        let nav = find_first(&*host, element, &options.nav_element);
        let (tabs, items) = match nav {
            Some(nav) => (host.find(nav, TAB_SELECTOR), host.find(nav, ITEM_SELECTOR)),
            None => (Vec::new(), Vec::new()),
        };
        for &tab in &tabs {
            host.remove_class(tab, classes::ACTIVE);
        }

        let sections = ContentActivator::new(host.find(element, &options.sections_element));
        sections.conceal_all(host);

        let mut widget = Self {
            element,
            cookie_name,
            nav,
            navigator: Navigator::new(tabs.len(), Boundary::Clamp),
            tabs,
            items,
            sections,
            remote: LazyContent::new(
                options.loading_template.clone(),
                options.error_template.clone(),
            ),
            enabled: true,
            events,
            options,
        };
        domkit_core::debug!(
            element = element.0,
            tabs = widget.tabs.len(),
            sections = widget.sections.len(),
            "tabs bound"
        );
        widget.events.emit(&WidgetEvent::Init);

        let initial = widget.initial_index(host);
        widget.show(initial, host);
        widget
    }

    /// Options after validation.
    #[must_use]
    pub fn options(&self) -> &TabsOptions {
        &self.options
    }

    /// Full persisted-state cookie name, if there is a key.
    #[must_use]
    pub fn cookie_name(&self) -> Option<&str> {
        self.cookie_name.as_deref()
    }

    /// Navigation block.
    #[must_use]
    pub fn nav(&self) -> Option<NodeId> {
        self.nav
    }

    /// Tab anchors in order.
    #[must_use]
    pub fn tabs(&self) -> &[NodeId] {
        &self.tabs
    }

    /// Sections in order.
    #[must_use]
    pub fn sections(&self) -> &[NodeId] {
        self.sections.panels()
    }

    /// Index state.
    #[must_use]
    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Active tab.
    #[must_use]
    pub fn current(&self) -> Option<usize> {
        self.navigator.current()
    }

    /// Last distinct tab before the active one.
    #[must_use]
    pub fn previous(&self) -> Option<usize> {
        self.navigator.previous()
    }

    /// Remote content state.
    #[must_use]
    pub fn remote(&self) -> &LazyContent {
        &self.remote
    }

    /// Whether tab events are acted on.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Act on tab events.
    pub fn enable(&mut self) {
        self.enabled = true;
    }

    /// Ignore tab events. Programmatic calls still work.
    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Show the tab at `index`; negative or missing indices are ignored.
    pub fn jump(&mut self, index: isize, host: &mut dyn Host) {
        if let Ok(index) = usize::try_from(index) {
            self.show(index, host);
        }
    }

    /// Show the tab at `index`.
    pub fn show(&mut self, index: usize, host: &mut dyn Host) {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("tabs_show", element = self.element.0, index).entered();

        let Some(transition) = self.navigator.select(index) else {
            domkit_core::trace!(element = self.element.0, index, "no such tab");
            return;
        };
        let to = transition.to;
        let Some(&tab) = self.tabs.get(to) else {
            return;
        };

        if self.options.ajax {
            if let (Some(source), Some(panel)) = (self.source_of(&*host, tab), self.sections.panel(to)) {
                if !is_fragment(&source) {
                    self.remote.begin(host, self.element, to, panel, &source);
                }
            }
        }

        for &item in &self.items {
            host.remove_class(item, classes::ACTIVE);
        }
        let item = host.parent(tab);

        let shown = if transition.is_reselect() && self.options.collapsible {
            self.sections.toggle(host, to)
        } else {
            self.sections.apply(host, transition);
            true
        };
        if shown {
            if let Some(item) = item {
                host.add_class(item, classes::ACTIVE);
            }
        }

        self.persist(to, host);
        domkit_core::debug!(element = self.element.0, from = transition.from, to, shown, "tab shown");
        self.events.emit(&WidgetEvent::Show { index: to });
    }

    /// Conceal every section.
    pub fn hide(&mut self, host: &mut dyn Host) {
        self.sections.conceal_all(host);
        self.events.emit(&WidgetEvent::Hide);
    }

    fn initial_index(&self, host: &dyn Host) -> usize {
        let len = self.tabs.len();
        if self.options.persist_state {
            let persisted = self
                .cookie_name
                .as_deref()
                .and_then(|name| host.read_cookie(name))
                .and_then(|value| value.trim().parse::<usize>().ok())
                .filter(|index| *index < len);
            if let Some(index) = persisted {
                return index;
            }
        }
        if self.options.load_fragment {
            let hash = host.location_hash().filter(|hash| hash.len() > 1);
            if let Some(hash) = hash {
                let matched = self
                    .tabs
                    .iter()
                    .position(|&tab| host.attr(tab, "href").as_deref() == Some(hash.as_str()));
                if let Some(index) = matched {
                    return index;
                }
            }
        }
        if self.options.default_index < len {
            self.options.default_index
        } else {
            0
        }
    }

    fn persist(&self, index: usize, host: &mut dyn Host) {
        if !self.options.persist_state {
            return;
        }
        let Some(name) = self.cookie_name.clone() else {
            domkit_core::debug!(element = self.element.0, "no cookie key; state not persisted");
            return;
        };
        let cookie = Cookie::site_wide(name, index.to_string(), self.options.cookie_duration);
        if let Err(err) = host.write_cookie(cookie) {
            domkit_core::warn!(element = self.element.0, %err, "tab state not persisted");
        }
    }

    fn source_of(&self, host: &dyn Host, tab: NodeId) -> Option<String> {
        host.attr(tab, &self.options.get_url)
            .filter(|source| !source.is_empty())
    }

    fn on_tab_event(&mut self, target: NodeId, activates: bool, host: &mut dyn Host) -> EventOutcome {
        let Some(index) = position_containing(&*host, &self.tabs, target) else {
            return EventOutcome::empty();
        };
        let tab = self.tabs[index];
        let remote = self
            .source_of(&*host, tab)
            .is_some_and(|source| !is_fragment(&source));

        let mut outcome = EventOutcome::empty();
        match self.options.mode {
            TabsMode::Click => {
                if self.options.prevent_default || (self.options.ajax && remote) {
                    outcome |= EventOutcome::PREVENT_DEFAULT;
                }
            }
            TabsMode::Hover => {
                if !activates && self.options.prevent_default {
                    outcome |= EventOutcome::PREVENT_DEFAULT;
                }
            }
        }

        if activates && self.enabled {
            self.show(index, host);
        }
        outcome
    }

    fn on_fetched(&mut self, completion: &FetchCompletion, host: &mut dyn Host) {
        match self.remote.complete(host, completion) {
            Some(LoadResult::Loaded { index, content }) => {
                self.events.emit(&WidgetEvent::Load { index, content });
            }
            Some(LoadResult::Failed { .. }) | None => {}
        }
    }
}

fn is_fragment(source: &str) -> bool {
    source.starts_with('#')
}

impl Widget for Tabs {
    fn kind(&self) -> WidgetKind {
        WidgetKind::Tabs
    }

    fn element(&self) -> NodeId {
        self.element
    }

    fn listeners(&self) -> Listeners {
        let mut listeners = Listeners::CLICK | Listeners::FETCH;
        if self.options.mode == TabsMode::Hover {
            listeners |= Listeners::MOUSEOVER;
        }
        listeners
    }

    fn handle_event(&mut self, event: &DomEvent, host: &mut dyn Host) -> EventOutcome {
        match (event, self.options.mode) {
            (DomEvent::Click { target }, mode) => {
                self.on_tab_event(*target, mode == TabsMode::Click, host)
            }
            (DomEvent::MouseOver { target }, TabsMode::Hover) => {
                self.on_tab_event(*target, true, host)
            }
            (DomEvent::Fetched(completion), _) => {
                self.on_fetched(completion, host);
                EventOutcome::empty()
            }
            _ => EventOutcome::empty(),
        }
    }

    fn teardown(&mut self, _host: &mut dyn Host) {
        self.remote.abandon();
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
