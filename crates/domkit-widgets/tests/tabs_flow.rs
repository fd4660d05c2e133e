#![forbid(unsafe_code)]

//! Tabs behavior driven through the headless host.

mod common;

use std::time::Duration;

use common::{TabsMarkup, deliver_fetches, recorder, tabs_markup};
use domkit_core::event::DomEvent;
use domkit_core::host::FetchOutcome;
use domkit_harness::HeadlessHost;
use domkit_widgets::{BindingManager, EventOutcome, Tabs, TabsMode, TabsOptions, WidgetEvent, classes};
use pretty_assertions::assert_eq;

const FRAGMENTS: [&str; 3] = ["#one", "#two", "#three"];
const MIXED: [&str; 3] = ["#one", "/remote/two.html", "#three"];

fn bind(host: &mut HeadlessHost, hrefs: &[&str], options: TabsOptions) -> (BindingManager, TabsMarkup) {
    let markup = tabs_markup(host, "main", hrefs);
    let mut widgets = BindingManager::new();
    widgets.bind_tabs(markup.element, options, host).unwrap();
    (widgets, markup)
}

fn current(widgets: &BindingManager, markup: &TabsMarkup) -> Option<usize> {
    widgets.get::<Tabs>(markup.element).unwrap().current()
}

fn click(widgets: &mut BindingManager, host: &mut HeadlessHost, markup: &TabsMarkup, index: usize) -> EventOutcome {
    widgets.dispatch(
        &DomEvent::Click {
            target: markup.anchors[index],
        },
        host,
    )
}

fn shown(host: &HeadlessHost, markup: &TabsMarkup) -> Vec<bool> {
    markup
        .sections
        .iter()
        .map(|&section| host.dom().has_class(section, "show"))
        .collect()
}

#[test]
fn shows_first_tab_on_bind() {
    let mut host = HeadlessHost::new();
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    assert_eq!(current(&widgets, &markup), Some(0));
    assert_eq!(shown(&host, &markup), vec![true, false, false]);
    assert!(host.dom().has_class(markup.items[0], classes::ACTIVE));
    assert!(!host.dom().has_class(markup.items[1], classes::ACTIVE));
    assert!(host.dom().has_class(markup.sections[1], "hide"));
}

#[test]
fn init_and_first_show_reach_subscribers() {
    let mut host = HeadlessHost::new();
    let markup = tabs_markup(&mut host, "main", &FRAGMENTS);
    let (events, log) = recorder();
    let mut widgets = BindingManager::new();
    widgets
        .bind(markup.element, &mut host, |host| {
            Tabs::with_events(markup.element, TabsOptions::default(), events, host)
        })
        .unwrap();
    click(&mut widgets, &mut host, &markup, 2);
    assert_eq!(
        *log.borrow(),
        vec![
            WidgetEvent::Init,
            WidgetEvent::Show { index: 0 },
            WidgetEvent::Show { index: 2 },
        ]
    );
}

#[test]
fn fragment_selects_initial_tab() {
    let mut host = HeadlessHost::new();
    host.set_location_hash(Some("#three"));
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    assert_eq!(current(&widgets, &markup), Some(2));
    assert_eq!(shown(&host, &markup), vec![false, false, true]);
}

#[test]
fn fragment_ignored_when_disabled_or_unmatched() {
    let mut host = HeadlessHost::new();
    host.set_location_hash(Some("#three"));
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().load_fragment(false));
    assert_eq!(current(&widgets, &markup), Some(0));

    let mut host = HeadlessHost::new();
    host.set_location_hash(Some("#missing"));
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().default_index(1));
    assert_eq!(current(&widgets, &markup), Some(1));
}

#[test]
fn persisted_index_wins() {
    let mut host = HeadlessHost::new();
    host.seed_cookie("domkit.tabs.main", "1");
    host.set_location_hash(Some("#three"));
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().persist_state(true));
    assert_eq!(current(&widgets, &markup), Some(1));
}

#[test]
fn unusable_persisted_index_falls_through() {
    let mut host = HeadlessHost::new();
    host.seed_cookie("domkit.tabs.main", "7");
    host.set_location_hash(Some("#three"));
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().persist_state(true));
    assert_eq!(current(&widgets, &markup), Some(2));

    let mut host = HeadlessHost::new();
    host.seed_cookie("domkit.tabs.main", "first");
    let (widgets, markup) = bind(
        &mut host,
        &FRAGMENTS,
        TabsOptions::default().persist_state(true).default_index(1),
    );
    assert_eq!(current(&widgets, &markup), Some(1));
}

#[test]
fn out_of_range_default_falls_back_to_zero() {
    let mut host = HeadlessHost::new();
    let (widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().default_index(9));
    assert_eq!(current(&widgets, &markup), Some(0));
}

#[test]
fn click_switches_sections() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    let outcome = click(&mut widgets, &mut host, &markup, 2);
    assert_eq!(outcome, EventOutcome::PREVENT_DEFAULT);

    let tabs = widgets.get::<Tabs>(markup.element).unwrap();
    assert_eq!(tabs.current(), Some(2));
    assert_eq!(tabs.previous(), Some(0));
    assert_eq!(shown(&host, &markup), vec![false, false, true]);
    assert!(host.dom().has_class(markup.items[2], classes::ACTIVE));
    assert!(!host.dom().has_class(markup.items[0], classes::ACTIVE));
}

#[test]
fn click_outside_tabs_is_ignored() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    let outcome = widgets.dispatch(
        &DomEvent::Click {
            target: markup.sections[1],
        },
        &mut host,
    );
    assert_eq!(outcome, EventOutcome::empty());
    assert_eq!(current(&widgets, &markup), Some(0));
}

#[test]
fn default_action_kept_only_for_local_tabs() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &MIXED, TabsOptions::default().prevent_default(false));
    assert_eq!(click(&mut widgets, &mut host, &markup, 2), EventOutcome::empty());
    assert_eq!(click(&mut widgets, &mut host, &markup, 1), EventOutcome::PREVENT_DEFAULT);
}

#[test]
fn remote_section_loads_once() {
    let mut host = HeadlessHost::new();
    let markup = tabs_markup(&mut host, "main", &MIXED);
    let (events, log) = recorder();
    let mut widgets = BindingManager::new();
    widgets
        .bind(markup.element, &mut host, |host| {
            Tabs::with_events(markup.element, TabsOptions::default(), events, host)
        })
        .unwrap();
    assert!(host.fetch_log().is_empty());

    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(
        host.fetch_log(),
        &[(markup.element, "/remote/two.html".to_owned())]
    );
    let section = markup.sections[1];
    assert!(host.dom().has_class(section, classes::LOADING));
    assert_eq!(host.dom().html(section), TabsOptions::default().loading_template);

    // In flight: switching away and back does not re-request.
    click(&mut widgets, &mut host, &markup, 0);
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(host.fetch_log().len(), 1);

    let pending = host.pending_fetches();
    assert_eq!(pending.len(), 1);
    assert!(host.resolve_fetch(pending[0].ticket, FetchOutcome::Success("<p>two</p>".to_owned())));
    deliver_fetches(&mut widgets, &mut host);
    assert_eq!(host.dom().html(section), "<p>two</p>");
    assert!(!host.dom().has_class(section, classes::LOADING));
    assert!(log.borrow().contains(&WidgetEvent::Load {
        index: 1,
        content: "<p>two</p>".to_owned(),
    }));

    click(&mut widgets, &mut host, &markup, 0);
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(host.fetch_log().len(), 1);
    assert!(widgets.get::<Tabs>(markup.element).unwrap().remote().cache().is_fetched("/remote/two.html"));
}

#[test]
fn failed_load_shows_error_and_retries() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &MIXED, TabsOptions::default().error_template("<p>oops</p>"));
    let section = markup.sections[1];

    click(&mut widgets, &mut host, &markup, 1);
    let ticket = host.pending_fetches()[0].ticket;
    host.resolve_fetch(ticket, FetchOutcome::Failure("503".to_owned()));
    deliver_fetches(&mut widgets, &mut host);
    assert_eq!(host.dom().html(section), "<p>oops</p>");
    assert!(host.dom().has_class(section, classes::FAILED));
    assert!(!host.dom().has_class(section, classes::LOADING));

    click(&mut widgets, &mut host, &markup, 0);
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(host.fetch_log().len(), 2);
    let ticket = host.pending_fetches()[0].ticket;
    host.resolve_fetch(ticket, FetchOutcome::Success("<p>two</p>".to_owned()));
    deliver_fetches(&mut widgets, &mut host);
    assert_eq!(host.dom().html(section), "<p>two</p>");
    assert!(!host.dom().has_class(section, classes::FAILED));
}

#[test]
fn ajax_off_never_fetches() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &MIXED, TabsOptions::default().ajax(false));
    click(&mut widgets, &mut host, &markup, 1);
    assert!(host.fetch_log().is_empty());
    assert_eq!(current(&widgets, &markup), Some(1));
}

#[test]
fn custom_source_attribute() {
    let mut host = HeadlessHost::new();
    let markup = tabs_markup(&mut host, "main", &FRAGMENTS);
    host.dom_mut().set_attr(markup.anchors[1], "data-src", "/fragments/b.html");
    let mut widgets = BindingManager::new();
    widgets
        .bind_tabs(markup.element, TabsOptions::default().get_url("data-src"), &mut host)
        .unwrap();
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(host.fetch_log().len(), 1);
    assert_eq!(host.fetch_log()[0].1, "/fragments/b.html");
}

#[test]
fn collapsible_reselect_toggles() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().collapsible(true));
    assert_eq!(shown(&host, &markup), vec![true, false, false]);

    click(&mut widgets, &mut host, &markup, 0);
    assert_eq!(shown(&host, &markup), vec![false, false, false]);
    assert!(!host.dom().has_class(markup.items[0], classes::ACTIVE));
    assert_eq!(current(&widgets, &markup), Some(0));

    click(&mut widgets, &mut host, &markup, 0);
    assert_eq!(shown(&host, &markup), vec![true, false, false]);
    assert!(host.dom().has_class(markup.items[0], classes::ACTIVE));
}

#[test]
fn reselect_without_collapsible_keeps_section() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    click(&mut widgets, &mut host, &markup, 0);
    click(&mut widgets, &mut host, &markup, 0);
    assert_eq!(shown(&host, &markup), vec![true, false, false]);
    assert!(host.dom().has_class(markup.items[0], classes::ACTIVE));
}

#[test]
fn state_persists_in_cookie() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(
        &mut host,
        &FRAGMENTS,
        TabsOptions::default().persist_state(true).cookie_duration(1),
    );
    assert_eq!(
        widgets.get::<Tabs>(markup.element).unwrap().cookie_name(),
        Some("domkit.tabs.main")
    );
    assert_eq!(host.cookie("domkit.tabs.main"), Some("0"));

    click(&mut widgets, &mut host, &markup, 2);
    assert_eq!(host.cookie("domkit.tabs.main"), Some("2"));
    assert_eq!(host.cookies().path_of("domkit.tabs.main"), Some("/"));

    host.advance_clock(Duration::from_secs(2 * 24 * 60 * 60));
    assert_eq!(host.cookie("domkit.tabs.main"), None);
}

#[test]
fn explicit_cookie_key_overrides_id() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(
        &mut host,
        &FRAGMENTS,
        TabsOptions::default().persist_state(true).cookie("sidebar"),
    );
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(host.cookie("domkit.tabs.sidebar"), Some("1"));
    assert_eq!(host.cookie("domkit.tabs.main"), None);
}

#[test]
fn rejected_cookie_write_is_not_fatal() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(
        &mut host,
        &FRAGMENTS,
        TabsOptions::default().persist_state(true).cookie("bad key"),
    );
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(current(&widgets, &markup), Some(1));
    assert!(host.cookies().is_empty());
}

#[test]
fn no_cookie_without_persist_state() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    click(&mut widgets, &mut host, &markup, 1);
    assert!(host.cookies().is_empty());
}

#[test]
fn hover_mode_shows_on_mouseover() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default().mode(TabsMode::Hover));
    widgets.dispatch(
        &DomEvent::MouseOver {
            target: markup.anchors[1],
        },
        &mut host,
    );
    assert_eq!(current(&widgets, &markup), Some(1));

    // Clicks only suppress navigation.
    assert_eq!(click(&mut widgets, &mut host, &markup, 2), EventOutcome::PREVENT_DEFAULT);
    assert_eq!(current(&widgets, &markup), Some(1));
}

#[test]
fn click_mode_ignores_mouseover() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    widgets.dispatch(
        &DomEvent::MouseOver {
            target: markup.anchors[1],
        },
        &mut host,
    );
    assert_eq!(current(&widgets, &markup), Some(0));
}

#[test]
fn disabled_tabs_ignore_events_but_not_calls() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    widgets.get_mut::<Tabs>(markup.element).unwrap().disable();

    assert_eq!(click(&mut widgets, &mut host, &markup, 2), EventOutcome::PREVENT_DEFAULT);
    assert_eq!(current(&widgets, &markup), Some(0));

    widgets.get_mut::<Tabs>(markup.element).unwrap().show(2, &mut host);
    assert_eq!(current(&widgets, &markup), Some(2));

    widgets.get_mut::<Tabs>(markup.element).unwrap().enable();
    click(&mut widgets, &mut host, &markup, 1);
    assert_eq!(current(&widgets, &markup), Some(1));
}

#[test]
fn invalid_indices_are_ignored() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &FRAGMENTS, TabsOptions::default());
    let tabs = widgets.get_mut::<Tabs>(markup.element).unwrap();
    tabs.jump(-1, &mut host);
    tabs.show(7, &mut host);
    assert_eq!(tabs.current(), Some(0));
    tabs.jump(1, &mut host);
    assert_eq!(tabs.current(), Some(1));
}

#[test]
fn hide_conceals_everything() {
    let mut host = HeadlessHost::new();
    let markup = tabs_markup(&mut host, "main", &FRAGMENTS);
    let (events, log) = recorder();
    let mut widgets = BindingManager::new();
    widgets
        .bind(markup.element, &mut host, |host| {
            Tabs::with_events(markup.element, TabsOptions::default(), events, host)
        })
        .unwrap()
        .hide(&mut host);
    assert_eq!(shown(&host, &markup), vec![false, false, false]);
    assert_eq!(log.borrow().last(), Some(&WidgetEvent::Hide));
}

#[test]
fn empty_navigation_is_harmless() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &[], TabsOptions::default());
    assert_eq!(current(&widgets, &markup), None);
    widgets.get_mut::<Tabs>(markup.element).unwrap().show(0, &mut host);
    assert_eq!(current(&widgets, &markup), None);
}

#[test]
fn unbind_ignores_late_completions() {
    let mut host = HeadlessHost::new();
    let (mut widgets, markup) = bind(&mut host, &MIXED, TabsOptions::default());
    click(&mut widgets, &mut host, &markup, 1);
    let ticket = host.pending_fetches()[0].ticket;
    widgets.unbind(markup.element, &mut host).unwrap();

    host.resolve_fetch(ticket, FetchOutcome::Success("<p>late</p>".to_owned()));
    deliver_fetches(&mut widgets, &mut host);
    assert_eq!(host.dom().html(markup.sections[1]), TabsOptions::default().loading_template);
}
