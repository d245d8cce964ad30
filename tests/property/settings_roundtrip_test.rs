//! Property-based tests for settings persistence.
//!
//! Whatever settings are saved come back unchanged from a fresh engine, and
//! keys outside the stored layout are always rejected without side effects.

use learning_assistant::database::KvStore;
use learning_assistant::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use learning_assistant::types::errors::SettingsError;
use learning_assistant::types::settings::{Language, Settings};
use proptest::prelude::*;
use serde_json::json;

fn arb_language() -> impl Strategy<Value = Language> {
    prop_oneof![
        Just(Language::Auto),
        Just(Language::En),
        Just(Language::Hi),
        Just(Language::Es),
        Just(Language::Fr),
        Just(Language::De),
    ]
}

fn arb_settings() -> impl Strategy<Value = Settings> {
    (".{0,40}", any::<bool>(), any::<bool>(), arb_language()).prop_map(
        |(api_key, use_text_to_speech, use_dark_mode, preferred_language)| Settings {
            api_key,
            use_text_to_speech,
            use_dark_mode,
            preferred_language,
        },
    )
}

const KNOWN_KEYS: [&str; 4] = ["apiKey", "useTextToSpeech", "useDarkMode", "preferredLanguage"];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(30))]

    #[test]
    fn saved_settings_survive_reload(settings in arb_settings()) {
        let store = KvStore::in_memory().unwrap();
        let mut engine = SettingsEngine::new(&store);
        engine.replace(settings.clone());
        engine.save().unwrap();

        let mut fresh = SettingsEngine::new(&store);
        prop_assert_eq!(fresh.load().unwrap(), settings);
    }

    #[test]
    fn unknown_keys_are_rejected(key in "[a-zA-Z]{1,16}", value in any::<bool>()) {
        prop_assume!(!KNOWN_KEYS.contains(&key.as_str()));
        let store = KvStore::in_memory().unwrap();
        let mut engine = SettingsEngine::new(&store);

        let result = engine.set_value(&key, json!(value));
        prop_assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
        prop_assert_eq!(engine.get_settings(), &Settings::default());
        prop_assert!(store.get::<Settings>("settings").unwrap().is_none());
    }

    #[test]
    fn boolean_flags_set_individually(tts in any::<bool>(), dark in any::<bool>()) {
        let store = KvStore::in_memory().unwrap();
        let mut engine = SettingsEngine::new(&store);
        engine.set_value("useTextToSpeech", json!(tts)).unwrap();
        engine.set_value("useDarkMode", json!(dark)).unwrap();

        let mut fresh = SettingsEngine::new(&store);
        let loaded = fresh.load().unwrap();
        prop_assert_eq!(loaded.use_text_to_speech, tts);
        prop_assert_eq!(loaded.use_dark_mode, dark);
        prop_assert_eq!(loaded.preferred_language, Language::Auto);
    }
}
