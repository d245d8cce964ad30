// Learning Assistant data path for macOS
// Data: ~/Library/Application Support/LearningAssistant

use std::env;
use std::path::PathBuf;

/// `~/Library/Application Support/LearningAssistant`
pub fn get_data_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
        .join("Library")
        .join("Application Support")
        .join("LearningAssistant")
}
