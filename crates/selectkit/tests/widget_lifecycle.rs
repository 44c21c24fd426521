//! Widget behavior driven through the document
//!
//! Mount/unmount leaks, outside-click handling and the end-to-end
//! selection scenarios, all through real click dispatch.

use selectkit::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

fn labelled() -> Vec<DropdownOption> {
    options_from_labels(["First", "Second", "Third"])
}

fn input(doc: &Document) -> NodeId {
    doc.find_by_class(class::INPUT)[0]
}

fn available(doc: &Document, label: &str) -> NodeId {
    doc.find_by_class(class::AVAILABLE_OPTION)
        .into_iter()
        .find(|id| doc.text_content(*id) == label)
        .unwrap()
}

fn selected_labels(doc: &Document) -> Vec<String> {
    doc.find_by_class(class::SELECTED_OPTION)
        .into_iter()
        .map(|id| doc.text_content(id))
        .collect()
}

fn pick(doc: &mut Document, label: &str) {
    doc.click(input(doc)).unwrap();
    let target = available(doc, label);
    doc.click(target).unwrap();
}

// ===== listener lifecycle =====

#[test]
fn test_repeated_mount_unmount_leaves_no_listeners() {
    let mut doc = Document::new();
    let body = doc.body();
    for _ in 0..25 {
        let widget = Dropdown::builder()
            .options(labelled())
            .build()
            .mount(&mut doc, body)
            .unwrap();
        assert_eq!(doc.window_listener_count(), 1);
        widget.unmount(&mut doc).unwrap();
    }
    assert_eq!(doc.window_listener_count(), 0);
    assert_eq!(doc.live_node_count(), 1);
}

#[test]
fn test_clicks_after_unmount_are_harmless() {
    let mut doc = Document::new();
    let body = doc.body();
    let other = doc.append_child(body, Element::new("button")).unwrap();
    let calls = Rc::new(RefCell::new(0_usize));
    let counter = Rc::clone(&calls);
    let widget = Dropdown::builder()
        .options(labelled())
        .on_change(move |_| *counter.borrow_mut() += 1)
        .build()
        .mount(&mut doc, body)
        .unwrap();
    widget.unmount(&mut doc).unwrap();

    let outcome = doc.click(other).unwrap();
    assert_eq!(outcome.window_listeners, 0);
    assert_eq!(*calls.borrow(), 0);
}

#[test]
fn test_rerenders_reuse_arena_slots() {
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::builder()
        .options(labelled())
        .build()
        .mount(&mut doc, body)
        .unwrap();
    let collapsed = doc.live_node_count();
    doc.click(input(&doc)).unwrap();
    doc.click(input(&doc)).unwrap();
    let capacity = doc.arena_capacity();

    for _ in 0..1000 {
        doc.click(input(&doc)).unwrap();
    }
    assert_eq!(doc.live_node_count(), collapsed);
    assert_eq!(doc.arena_capacity(), capacity);
    assert_eq!(doc.dispatch_count(), 1002);

    let fresh = doc.append_child(body, Element::new("div")).unwrap();
    assert!(doc.exists(fresh));
    assert!(doc.exists(widget.root()));
    widget.unmount(&mut doc).unwrap();
}

// ===== outside clicks =====

#[test]
fn test_outside_click_collapses_open_panel() {
    let mut doc = Document::new();
    let body = doc.body();
    let other = doc.append_child(body, Element::new("p")).unwrap();
    let widget = Dropdown::new(DropdownConfig::new(labelled()))
        .mount(&mut doc, body)
        .unwrap();

    doc.click(input(&doc)).unwrap();
    assert!(widget.visibility().is_expanded());

    doc.click(other).unwrap();
    assert_eq!(widget.visibility(), Visibility::Collapsed);
    assert!(doc.find_by_class(class::AVAILABLE_OPTIONS).is_empty());
}

#[test]
fn test_outside_click_on_collapsed_widget_is_noop() {
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::new(DropdownConfig::new(labelled()))
        .mount(&mut doc, body)
        .unwrap();
    let before = widget.state();
    doc.click(body).unwrap();
    assert_eq!(widget.state(), before);
}

#[test]
fn test_click_on_body_outside_nested_mount() {
    let mut doc = Document::new();
    let body = doc.body();
    let host = doc
        .append_child(body, Element::new("section").with_class("host"))
        .unwrap();
    let widget = Dropdown::new(DropdownConfig::new(labelled()))
        .mount(&mut doc, host)
        .unwrap();

    doc.click(input(&doc)).unwrap();
    doc.click(host).unwrap();
    assert_eq!(widget.visibility(), Visibility::Collapsed);
}

// ===== deselect =====

#[test]
fn test_deselect_control_consumes_click() {
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::builder()
        .options(labelled())
        .allow_multiple(true)
        .build()
        .mount(&mut doc, body)
        .unwrap();
    pick(&mut doc, "First");
    pick(&mut doc, "Second");

    let control = doc.find_by_class(class::DESELECT_OPTION)[0];
    let outcome = doc.click(control).unwrap();
    assert!(outcome.propagation_stopped);
    assert_eq!(outcome.window_listeners, 0);
    assert_eq!(widget.visibility(), Visibility::Collapsed);
    assert_eq!(selected_labels(&doc), vec!["Second"]);
}

#[test]
fn test_single_mode_renders_no_deselect_controls() {
    let mut doc = Document::new();
    let body = doc.body();
    let _widget = Dropdown::new(DropdownConfig::new(labelled()))
        .mount(&mut doc, body)
        .unwrap();
    pick(&mut doc, "Third");
    assert_eq!(selected_labels(&doc), vec!["Third"]);
    assert!(doc.find_by_class(class::DESELECT_OPTION).is_empty());
}

// ===== end-to-end scenarios =====

#[test]
fn test_scenario_multi_select_then_deselect() {
    let log: Rc<RefCell<Vec<Vec<String>>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::builder()
        .options(labelled())
        .allow_multiple(true)
        .on_change(move |selected| {
            sink.borrow_mut()
                .push(selected.iter().map(|o| o.label.clone()).collect());
        })
        .build()
        .mount(&mut doc, body)
        .unwrap();

    pick(&mut doc, "First");
    pick(&mut doc, "Third");
    assert_eq!(selected_labels(&doc), vec!["First", "Third"]);

    let controls = doc.find_by_class(class::DESELECT_OPTION);
    doc.click(controls[0]).unwrap();

    assert_eq!(widget.selection().labels(), vec!["Third"]);
    assert_eq!(
        *log.borrow(),
        vec![
            vec!["First".to_string()],
            vec!["First".to_string(), "Third".to_string()],
            vec!["Third".to_string()],
        ]
    );
}

#[test]
fn test_scenario_reselect_toggles_off() {
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::builder()
        .options(labelled())
        .allow_multiple(true)
        .build()
        .mount(&mut doc, body)
        .unwrap();

    pick(&mut doc, "Second");
    doc.click(input(&doc)).unwrap();
    assert!(doc
        .element(available(&doc, "Second"))
        .unwrap()
        .has_class(class::SELECTED));
    let second = available(&doc, "Second");
    doc.click(second).unwrap();

    assert!(widget.selection().is_empty());
    assert_eq!(doc.find_by_class(class::PLACEHOLDER).len(), 1);
}

#[test]
fn test_scenario_single_select_replaces() {
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::builder()
        .placeholder("Pick a number")
        .options(labelled())
        .build()
        .mount(&mut doc, body)
        .unwrap();

    let placeholder = doc.find_by_class(class::PLACEHOLDER)[0];
    assert_eq!(doc.text_content(placeholder), "Pick a number");

    pick(&mut doc, "First");
    pick(&mut doc, "Second");
    assert_eq!(widget.selection().labels(), vec!["Second"]);
    assert_eq!(selected_labels(&doc), vec!["Second"]);
}

#[test]
fn test_rendered_option_values_match_config() {
    let mut doc = Document::new();
    let body = doc.body();
    let widget = Dropdown::builder()
        .option("a", "Alpha")
        .option("b", "Beta")
        .build()
        .mount(&mut doc, body)
        .unwrap();
    doc.click(input(&doc)).unwrap();

    let values: Vec<String> = doc
        .find_by_class(class::AVAILABLE_OPTION)
        .into_iter()
        .filter_map(|id| doc.element(id).and_then(|e| e.attr("data-value")).map(str::to_string))
        .collect();
    assert_eq!(values, vec!["a", "b"]);
    assert_eq!(
        doc.element(widget.root()).unwrap().attr("data-component"),
        Some("dropdown")
    );
}
