// Learning Assistant platform abstraction
// Resolves where the key-value store and config.json live on Windows, macOS, and Linux.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific implementation at compile time.

use std::env;
use std::path::PathBuf;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "macos")]
mod macos;

#[cfg(target_os = "windows")]
mod windows;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "LEARNING_ASSISTANT_DATA_DIR";

/// Returns the data directory holding `config.json` and the SQLite store.
///
/// `LEARNING_ASSISTANT_DATA_DIR` wins when set and non-empty. Otherwise:
/// - **Linux**: `~/.local/share/learning-assistant` (or `$XDG_DATA_HOME/learning-assistant`)
/// - **macOS**: `~/Library/Application Support/LearningAssistant`
/// - **Windows**: `%APPDATA%/LearningAssistant`
pub fn get_data_dir() -> PathBuf {
    match env::var(DATA_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => platform_data_dir(),
    }
}

fn platform_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        linux::get_data_dir()
    }
    #[cfg(target_os = "macos")]
    {
        macos::get_data_dir()
    }
    #[cfg(target_os = "windows")]
    {
        windows::get_data_dir()
    }
}
