use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::errors::ConfigError;

/// Top-level assistant configuration, read from `config.json` in the data directory.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AssistantConfig {
    #[serde(default)]
    pub host: HostConfig,
    #[serde(default)]
    pub delays: ResponseDelays,
    #[serde(default)]
    pub links: ExternalLinks,
}

impl AssistantConfig {
    /// Loads the config from `path`.
    ///
    /// A missing file yields defaults; a file that exists but cannot be
    /// parsed is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("Failed to parse config file: {}", e)))
    }
}

/// Which pages of the host site count as watch pages.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostConfig {
    /// Registrable domain; subdomains such as `www.` and `m.` also match.
    pub domain: String,
    pub watch_path: String,
    pub video_param: String,
    pub home_url: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            domain: "youtube.com".to_string(),
            watch_path: "/watch".to_string(),
            video_param: "v".to_string(),
            home_url: "https://www.youtube.com".to_string(),
        }
    }
}

/// Canned response delays of the built-in content service, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResponseDelays {
    pub summary_ms: u64,
    pub quiz_ms: u64,
    pub export_ms: u64,
    pub comments_ms: u64,
}

impl ResponseDelays {
    pub fn summary(&self) -> Duration {
        Duration::from_millis(self.summary_ms)
    }

    pub fn quiz(&self) -> Duration {
        Duration::from_millis(self.quiz_ms)
    }

    pub fn export(&self) -> Duration {
        Duration::from_millis(self.export_ms)
    }

    pub fn comments(&self) -> Duration {
        Duration::from_millis(self.comments_ms)
    }
}

impl Default for ResponseDelays {
    fn default() -> Self {
        Self {
            summary_ms: 2000,
            quiz_ms: 2000,
            export_ms: 2000,
            comments_ms: 1000,
        }
    }
}

/// URLs opened in new tabs by popup actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExternalLinks {
    pub chat_assistant_url: String,
    pub download_url: String,
}

impl Default for ExternalLinks {
    fn default() -> Self {
        Self {
            chat_assistant_url: "https://chat.openai.com/chat".to_string(),
            download_url: "https://example.com/download-mock".to_string(),
        }
    }
}
