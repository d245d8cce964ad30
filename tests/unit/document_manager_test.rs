//! Unit tests for the in-memory page document.

use learning_assistant::managers::document_manager::{DocumentManager, DocumentManagerTrait};
use learning_assistant::types::dom::Selector;
use learning_assistant::types::errors::DomError;

fn watch_doc() -> DocumentManager {
    DocumentManager::new("https://www.youtube.com/watch?v=abc", "A Video - YouTube")
}

#[test]
fn test_detached_nodes_are_invisible_to_lookups() {
    let mut doc = watch_doc();
    let node = doc.create_element("div");
    if let Some(el) = doc.get_element_mut(node) {
        el.id = Some("floating".into());
    }
    assert!(doc.get_element_by_id("floating").is_none());
    assert!(!doc.is_attached(node));

    let body = doc.body();
    doc.append_child(body, node).unwrap();
    assert_eq!(doc.get_element_by_id("floating"), Some(node));
}

#[test]
fn test_query_selector_compound() {
    let mut doc = watch_doc();
    let body = doc.body();
    doc.append_new(body, "h1", None, &["title"], "Plain").unwrap();
    let specific = doc
        .append_new(
            body,
            "h1",
            None,
            &["title", "style-scope", "ytd-video-primary-info-renderer"],
            "Specific",
        )
        .unwrap();

    assert_eq!(
        doc.query_selector("h1.title.style-scope.ytd-video-primary-info-renderer"),
        Some(specific)
    );
    assert_eq!(doc.query_selector_all("h1.title").len(), 2);
    assert_eq!(doc.query_selector("h1.title a"), None);
}

#[test]
fn test_query_selector_by_tag_and_id() {
    let mut doc = watch_doc();
    let body = doc.body();
    let area = doc.append_new(body, "div", Some("placeholder-area"), &[], "").unwrap();
    doc.append_new(body, "span", Some("other"), &[], "").unwrap();
    assert_eq!(doc.query_selector("div#placeholder-area"), Some(area));
    assert_eq!(doc.query_selector("span#placeholder-area"), None);
}

#[test]
fn test_selector_parse_rejects_garbage() {
    assert!(Selector::parse("").is_none());
    assert!(Selector::parse("div p").is_none());
    assert!(Selector::parse("div..x").is_none());
    let sel = Selector::parse("DIV#a.b").unwrap();
    assert_eq!(sel.tag.as_deref(), Some("div"));
    assert_eq!(sel.id.as_deref(), Some("a"));
    assert_eq!(sel.classes, vec!["b".to_string()]);
}

#[test]
fn test_skeleton_nodes_cannot_be_removed() {
    let mut doc = watch_doc();
    let head = doc.head();
    let body = doc.body();
    assert_eq!(doc.remove_node(head), Err(DomError::HierarchyError(head.0)));
    assert_eq!(doc.remove_node(body), Err(DomError::HierarchyError(body.0)));
}

#[test]
fn test_remove_twice_reports_missing() {
    let mut doc = watch_doc();
    let body = doc.body();
    let node = doc.append_new(body, "div", None, &[], "").unwrap();
    doc.remove_node(node).unwrap();
    assert_eq!(doc.remove_node(node), Err(DomError::NodeNotFound(node.0)));
}

#[test]
fn test_append_child_moves_node() {
    let mut doc = watch_doc();
    let body = doc.body();
    let a = doc.append_new(body, "div", None, &[], "").unwrap();
    let b = doc.append_new(body, "div", None, &[], "").unwrap();
    let leaf = doc.append_new(a, "span", None, &[], "").unwrap();

    doc.append_child(b, leaf).unwrap();
    assert!(doc.contains(b, leaf));
    assert!(!doc.contains(a, leaf));
    assert!(doc.get_element(a).unwrap().children.is_empty());
}

#[test]
fn test_click_listeners() {
    let mut doc = watch_doc();
    let first = doc.add_click_listener();
    let second = doc.add_click_listener();
    assert_ne!(first, second);
    assert_eq!(doc.click_listener_count(), 2);
    assert!(doc.remove_click_listener(first));
    assert!(!doc.remove_click_listener(first));
    assert!(!doc.has_click_listener(first));
    assert!(doc.has_click_listener(second));
}

#[test]
fn test_activate_requires_attached_node() {
    let mut doc = watch_doc();
    let loose = doc.create_element("div");
    assert!(doc.activate(loose).is_err());

    let body = doc.body();
    let input = doc.append_new(body, "div", Some("placeholder-area"), &[], "").unwrap();
    doc.activate(input).unwrap();
    assert_eq!(doc.last_activated(), Some(input));

    doc.remove_node(input).unwrap();
    assert_eq!(doc.last_activated(), None);
}
