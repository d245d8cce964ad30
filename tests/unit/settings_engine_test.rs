//! Unit tests for the settings engine over the key-value store.

use learning_assistant::database::kv_store::SETTINGS_KEY;
use learning_assistant::database::KvStore;
use learning_assistant::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use learning_assistant::types::errors::SettingsError;
use learning_assistant::types::settings::{Language, Settings};
use serde_json::json;

#[test]
fn test_defaults_when_nothing_saved() {
    let store = KvStore::in_memory().unwrap();
    let mut engine = SettingsEngine::new(&store);
    let settings = engine.load().unwrap();
    assert_eq!(settings.api_key, "");
    assert!(settings.use_text_to_speech);
    assert!(settings.use_dark_mode);
    assert_eq!(settings.preferred_language, Language::Auto);
}

#[test]
fn test_partial_stored_document_fills_defaults() {
    let store = KvStore::in_memory().unwrap();
    store.set(SETTINGS_KEY, &json!({ "useDarkMode": false })).unwrap();

    let mut engine = SettingsEngine::new(&store);
    let settings = engine.load().unwrap();
    assert!(!settings.use_dark_mode);
    assert!(settings.use_text_to_speech);
    assert_eq!(settings.preferred_language, Language::Auto);
}

#[test]
fn test_reset_restores_defaults_and_persists() {
    let store = KvStore::in_memory().unwrap();
    let mut engine = SettingsEngine::new(&store);
    engine.set_value("apiKey", json!("sk-test")).unwrap();
    engine.set_value("useTextToSpeech", json!(false)).unwrap();
    engine.set_value("preferredLanguage", json!("de")).unwrap();

    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), Settings::default());

    let stored: serde_json::Value = store.get(SETTINGS_KEY).unwrap().unwrap();
    assert_eq!(
        stored,
        json!({
            "apiKey": "",
            "useTextToSpeech": true,
            "useDarkMode": true,
            "preferredLanguage": "auto"
        })
    );
}

#[test]
fn test_empty_key_rejected() {
    let store = KvStore::in_memory().unwrap();
    let mut engine = SettingsEngine::new(&store);
    assert!(matches!(
        engine.set_value("", json!(true)),
        Err(SettingsError::InvalidKey(_))
    ));
}

#[test]
fn test_failed_set_leaves_settings_untouched() {
    let store = KvStore::in_memory().unwrap();
    let mut engine = SettingsEngine::new(&store);
    engine.load().unwrap();
    let _ = engine.set_value("useDarkMode", json!(42));
    assert_eq!(*engine.get_settings(), Settings::default());
}

#[test]
fn test_debug_output_redacts_api_key() {
    let settings = Settings {
        api_key: "sk-very-secret".to_string(),
        ..Settings::default()
    };
    let rendered = format!("{:?}", settings);
    assert!(!rendered.contains("sk-very-secret"));
}
