//! Property-based tests for focus mode on a page agent.
//!
//! For any sequence of toggles and clock advances the page holds exactly one
//! override style while focus mode is on and none while it is off, and at
//! most one indicator is ever present.

use std::time::Duration;

use learning_assistant::app::App;
use learning_assistant::database::kv_store::FOCUS_MODE_KEY;
use learning_assistant::managers::document_manager::{DocumentManager, DocumentManagerTrait};
use learning_assistant::services::clipboard::MemoryClipboard;
use learning_assistant::services::page_agent::{PageAgent, FOCUS_INDICATOR_ID, FOCUS_STYLE_ID};
use learning_assistant::types::config::AssistantConfig;
use proptest::prelude::*;

const WATCH_URL: &str = "https://www.youtube.com/watch?v=abc123";

#[derive(Debug, Clone)]
enum FocusOp {
    Set(bool),
    Advance(u64),
}

fn arb_focus_ops() -> impl Strategy<Value = Vec<FocusOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => any::<bool>().prop_map(FocusOp::Set),
            2 => (0u64..5000).prop_map(FocusOp::Advance),
        ],
        1..50,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn override_present_iff_active(ops in arb_focus_ops(), initial in any::<bool>()) {
        let doc = DocumentManager::new(WATCH_URL, "Video - YouTube");
        let mut agent = PageAgent::attach(doc, Box::new(MemoryClipboard::new()), initial);
        let mut expected = initial;

        for op in &ops {
            match op {
                FocusOp::Set(value) => {
                    let changed = agent.toggle_focus_mode(*value).unwrap();
                    prop_assert_eq!(changed, *value != expected);
                    expected = *value;
                }
                FocusOp::Advance(ms) => agent.advance(Duration::from_millis(*ms)),
            }

            let doc = agent.document();
            let styles = doc.query_selector_all(&format!("style#{}", FOCUS_STYLE_ID)).len();
            let indicators = doc.query_selector_all(&format!("div#{}", FOCUS_INDICATOR_ID)).len();
            prop_assert_eq!(agent.is_focus_mode_active(), expected);
            prop_assert_eq!(styles, usize::from(expected));
            prop_assert!(indicators <= usize::from(expected));
        }
    }

    #[test]
    fn popup_toggles_track_persisted_flag(toggles in 1usize..8) {
        let app = App::in_memory(AssistantConfig::default()).unwrap();
        let tab_id = app.open_page(DocumentManager::new(WATCH_URL, "Video - YouTube")).unwrap();
        let mut popup = app.open_popup();

        for i in 0..toggles {
            let enabled = popup.toggle_focus_mode().unwrap();
            prop_assert_eq!(enabled, i % 2 == 0);
        }

        let expected = toggles % 2 == 1;
        prop_assert_eq!(app.store.get::<bool>(FOCUS_MODE_KEY).unwrap(), Some(expected));
        prop_assert_eq!(popup.focus_mode(), expected);
        prop_assert_eq!(app.tabs().agent(&tab_id).unwrap().is_focus_mode_active(), expected);
    }
}
