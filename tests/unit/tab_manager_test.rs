//! Unit tests for tab bookkeeping and page-agent delivery.

use learning_assistant::managers::document_manager::DocumentManager;
use learning_assistant::managers::tab_manager::{PageChannel, TabManager, TabManagerTrait};
use learning_assistant::services::clipboard::MemoryClipboard;
use learning_assistant::services::page_agent::PageAgent;
use learning_assistant::types::errors::{DeliveryError, TabError};
use learning_assistant::types::messages::{PageMessage, PageResponse};
use learning_assistant::types::tab::LoadStatus;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=abc123";

fn agent_for(url: &str, title: &str) -> PageAgent {
    PageAgent::attach(
        DocumentManager::new(url, title),
        Box::new(MemoryClipboard::new()),
        false,
    )
}

#[test]
fn test_first_tab_becomes_active_even_if_not_requested() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(Some(WATCH_URL), false);
    assert_eq!(tm.get_active_tab().map(|t| t.id.clone()), Some(id));
}

#[test]
fn test_new_tab_defaults() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(None, true);
    let tab = tm.get_tab(&id).unwrap();
    assert_eq!(tab.url, "about:blank");
    assert_eq!(tab.title, "New Tab");
    assert_eq!(tab.status, LoadStatus::Loading);
}

#[test]
fn test_close_last_tab_opens_blank() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(Some(WATCH_URL), true);
    tm.close_tab(&id).unwrap();
    assert_eq!(tm.tab_count(), 1);
    let active = tm.get_active_tab().unwrap();
    assert_ne!(active.id, id);
    assert_eq!(active.url, "about:blank");
}

#[test]
fn test_close_active_switches_to_neighbor() {
    let mut tm = TabManager::new();
    let a = tm.create_tab(None, true);
    let b = tm.create_tab(None, true);
    let c = tm.create_tab(None, false);
    tm.close_tab(&b).unwrap();
    assert_eq!(tm.get_active_tab().unwrap().id, c);
    tm.close_tab(&c).unwrap();
    assert_eq!(tm.get_active_tab().unwrap().id, a);
}

#[test]
fn test_unknown_tab_operations_fail() {
    let mut tm = TabManager::new();
    assert_eq!(tm.switch_tab("nope"), Err(TabError::NotFound("nope".into())));
    assert_eq!(tm.close_tab("nope"), Err(TabError::NotFound("nope".into())));
    assert!(tm.navigate("nope", WATCH_URL).is_err());
    assert!(tm.attach_agent("nope", agent_for(WATCH_URL, "T")).is_err());
}

#[test]
fn test_navigate_then_complete_reports_updates() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(None, true);

    let loading = tm.navigate(&id, WATCH_URL).unwrap();
    assert_eq!(loading.status, LoadStatus::Loading);
    assert_eq!(loading.url.as_deref(), Some(WATCH_URL));

    let complete = tm.complete_load(&id).unwrap();
    assert_eq!(complete.status, LoadStatus::Complete);
    assert_eq!(complete.url.as_deref(), Some(WATCH_URL));
    assert_eq!(tm.get_tab(&id).unwrap().status, LoadStatus::Complete);
}

#[test]
fn test_send_without_agent_is_no_receiver() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(Some(WATCH_URL), true);
    assert_eq!(
        tm.send_to_tab(&id, PageMessage::GetVideoInfo),
        Err(DeliveryError::NoReceiver(id.clone()))
    );
    assert_eq!(
        tm.send_to_tab("missing", PageMessage::GetVideoInfo),
        Err(DeliveryError::TabNotFound("missing".into()))
    );
}

#[test]
fn test_send_reaches_attached_agent() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(Some(WATCH_URL), true);
    tm.attach_agent(&id, agent_for(WATCH_URL, "Rust Ownership - YouTube")).unwrap();

    match tm.send_to_tab(&id, PageMessage::GetVideoInfo).unwrap() {
        PageResponse::VideoInfo(info) => {
            assert_eq!(info.title, "Rust Ownership");
            assert_eq!(info.url, WATCH_URL);
        }
        other => panic!("unexpected response: {:?}", other),
    }
}

#[test]
fn test_navigation_drops_agent() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(Some(WATCH_URL), true);
    tm.attach_agent(&id, agent_for(WATCH_URL, "T")).unwrap();
    assert!(tm.agent(&id).is_some());

    tm.navigate(&id, "https://www.youtube.com/watch?v=other").unwrap();
    assert!(tm.agent(&id).is_none());
    assert!(tm.agent_tab_ids().is_empty());
}

#[test]
fn test_agent_tab_ids_follow_tab_order() {
    let mut tm = TabManager::new();
    let a = tm.create_tab(Some(WATCH_URL), true);
    let _plain = tm.create_tab(Some("https://example.com"), false);
    let c = tm.create_tab(Some(WATCH_URL), false);
    tm.attach_agent(&c, agent_for(WATCH_URL, "T")).unwrap();
    tm.attach_agent(&a, agent_for(WATCH_URL, "T")).unwrap();
    assert_eq!(tm.agent_tab_ids(), vec![a, c]);
}

#[test]
fn test_take_page_events_tags_tab() {
    let mut tm = TabManager::new();
    let id = tm.create_tab(Some(WATCH_URL), true);
    tm.attach_agent(&id, agent_for(WATCH_URL, "T")).unwrap();

    let agent = tm.agent_mut(&id).unwrap();
    agent.show_comment_dialog(&["one".to_string()]).unwrap();
    let refresh = agent.dialog_refresh_button().unwrap();
    agent.click(refresh);

    let events = tm.take_page_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, id);
    assert!(tm.take_page_events().is_empty());
}
