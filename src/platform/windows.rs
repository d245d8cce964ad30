// Learning Assistant data path for Windows
// Data: %APPDATA%/LearningAssistant

use std::env;
use std::path::PathBuf;

/// `%APPDATA%/LearningAssistant`, falling back to the user profile.
pub fn get_data_dir() -> PathBuf {
    let base = env::var("APPDATA")
        .or_else(|_| env::var("USERPROFILE"))
        .unwrap_or_else(|_| String::from("C:\\"));
    PathBuf::from(base).join("LearningAssistant")
}
