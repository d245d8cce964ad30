use std::fmt;

use serde::{Deserialize, Serialize};

/// User preferences shown on the settings tab.
///
/// Field names on the wire follow the popup's storage layout
/// (`apiKey`, `useTextToSpeech`, ...).
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Secret key for the user's own AI account; empty when unset.
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_true")]
    pub use_text_to_speech: bool,
    #[serde(default = "default_true")]
    pub use_dark_mode: bool,
    #[serde(default)]
    pub preferred_language: Language,
}

fn default_true() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            use_text_to_speech: true,
            use_dark_mode: true,
            preferred_language: Language::Auto,
        }
    }
}

impl Settings {
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

// The api key never reaches logs.
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("api_key", &if self.has_api_key() { "<redacted>" } else { "" })
            .field("use_text_to_speech", &self.use_text_to_speech)
            .field("use_dark_mode", &self.use_dark_mode)
            .field("preferred_language", &self.preferred_language)
            .finish()
    }
}

/// Output language for generated content.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Follow the video's own language.
    #[default]
    Auto,
    En,
    Hi,
    Es,
    Fr,
    De,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::Auto | Language::En => "English",
            Language::Hi => "Hindi",
            Language::Es => "Spanish",
            Language::Fr => "French",
            Language::De => "German",
        }
    }
}
