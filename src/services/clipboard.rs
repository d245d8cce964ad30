//! Clipboard and speech sinks used by the page agent and the popup.

use std::sync::{Arc, Mutex, PoisonError};

/// Destination for copied text.
pub trait Clipboard: Send {
    fn write_text(&mut self, text: &str) -> Result<(), String>;
}

/// Clipboard kept in memory; clones share the same contents.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
    denied: bool,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A clipboard that refuses every write, like a page without clipboard permission.
    pub fn denied() -> Self {
        Self {
            contents: Arc::default(),
            denied: true,
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.contents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<(), String> {
        if self.denied {
            return Err("clipboard write not permitted".to_string());
        }
        *self.contents.lock().unwrap_or_else(PoisonError::into_inner) = Some(text.to_string());
        Ok(())
    }
}

/// Text-to-speech output.
pub trait SpeechSink {
    fn speak(&mut self, text: &str);
}

/// Speech sink that records utterances instead of voicing them.
#[derive(Default)]
pub struct RecordingSpeech {
    pub utterances: Vec<String>,
}

impl SpeechSink for RecordingSpeech {
    fn speak(&mut self, text: &str) {
        self.utterances.push(text.to_string());
    }
}
