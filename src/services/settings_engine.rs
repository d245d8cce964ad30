// Learning Assistant Settings Engine
// Manages user settings: loading, saving, updating individual values, and resetting to defaults.
// Settings are stored as one JSON document under the `settings` key of the shared store.

use serde_json::Value;
use tracing::debug;

use crate::database::kv_store::{KvStore, SETTINGS_KEY};
use crate::types::errors::SettingsError;
use crate::types::settings::Settings;

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<Settings, SettingsError>;
    fn save(&self) -> Result<(), SettingsError>;
    fn get_settings(&self) -> &Settings;
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError>;
    fn reset(&mut self) -> Result<(), SettingsError>;
}

/// Settings engine persisting through the key-value store.
pub struct SettingsEngine<'a> {
    store: &'a KvStore,
    settings: Settings,
}

impl<'a> SettingsEngine<'a> {
    pub fn new(store: &'a KvStore) -> Self {
        Self {
            store,
            settings: Settings::default(),
        }
    }

    /// Updates one setting in memory without persisting it.
    ///
    /// Keys are the stored field names (`apiKey`, `useTextToSpeech`,
    /// `useDarkMode`, `preferredLanguage`). The value must deserialize into
    /// the field's type.
    pub fn apply_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let mut json_value = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::StorageError(format!("Failed to serialize settings: {}", e)))?;

        match &mut json_value {
            Value::Object(map) => {
                if !map.contains_key(key) {
                    return Err(SettingsError::InvalidKey(format!(
                        "Key '{}' not found in settings",
                        key
                    )));
                }
                map.insert(key.to_string(), value);
            }
            _ => {
                return Err(SettingsError::StorageError(
                    "Settings did not serialize to an object".to_string(),
                ))
            }
        }

        // Deserialize back to validate the new value
        let new_settings: Settings = serde_json::from_value(json_value).map_err(|e| {
            SettingsError::InvalidValue(format!("Invalid value for key '{}': {}", key, e))
        })?;

        self.settings = new_settings;
        Ok(())
    }

    /// Replaces the in-memory settings wholesale, without persisting.
    pub fn replace(&mut self, settings: Settings) {
        self.settings = settings;
    }
}

impl SettingsEngineTrait for SettingsEngine<'_> {
    /// Loads settings from the store, falling back to defaults when none are saved.
    fn load(&mut self) -> Result<Settings, SettingsError> {
        self.settings = self.store.get(SETTINGS_KEY)?.unwrap_or_default();
        Ok(self.settings.clone())
    }

    fn save(&self) -> Result<(), SettingsError> {
        self.store.set(SETTINGS_KEY, &self.settings)?;
        debug!(settings = ?self.settings, "settings saved");
        Ok(())
    }

    fn get_settings(&self) -> &Settings {
        &self.settings
    }

    /// Updates one setting and persists the result.
    fn set_value(&mut self, key: &str, value: Value) -> Result<(), SettingsError> {
        self.apply_value(key, value)?;
        self.save()
    }

    /// Resets all settings to defaults and saves them.
    fn reset(&mut self) -> Result<(), SettingsError> {
        self.settings = Settings::default();
        self.save()
    }
}
