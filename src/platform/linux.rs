// Learning Assistant data path for Linux
// Data: ~/.local/share/learning-assistant

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "learning-assistant";

/// Uses `$XDG_DATA_HOME/learning-assistant` if set, otherwise `~/.local/share/learning-assistant`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join(APP_DIR)
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".local").join("share").join(APP_DIR)
    }
}
