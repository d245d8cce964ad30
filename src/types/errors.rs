use std::fmt;

// === StorageError ===

/// Errors raised by the persistent key-value store.
#[derive(Debug)]
pub enum StorageError {
    /// SQLite operation failed.
    DatabaseError(String),
    /// A value could not be encoded to or decoded from JSON.
    SerializationError(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DatabaseError(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::SerializationError(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(e: rusqlite::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::SerializationError(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to user settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// Reading or writing the `settings` entry failed.
    StorageError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::StorageError(msg) => write!(f, "Settings storage error: {}", msg),
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

impl From<StorageError> for SettingsError {
    fn from(e: StorageError) -> Self {
        SettingsError::StorageError(e.to_string())
    }
}

// === ConfigError ===

/// Errors raised while loading the assistant configuration file.
#[derive(Debug)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    IoError(String),
    /// The config file is not valid JSON for `AssistantConfig`.
    ParseError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "Config I/O error: {}", msg),
            ConfigError::ParseError(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// === TabError ===

/// Errors related to tab management operations.
#[derive(Debug, PartialEq)]
pub enum TabError {
    /// Tab with the given ID was not found.
    NotFound(String),
    /// There is no active tab.
    NoActiveTab,
}

impl fmt::Display for TabError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabError::NotFound(id) => write!(f, "Tab not found: {}", id),
            TabError::NoActiveTab => write!(f, "No active tab"),
        }
    }
}

impl std::error::Error for TabError {}

// === DomError ===

/// Errors raised by page document operations.
#[derive(Debug, PartialEq)]
pub enum DomError {
    /// The node handle does not refer to a live node.
    NodeNotFound(u64),
    /// The operation would make a node its own ancestor.
    HierarchyError(u64),
    /// An expected page element is missing.
    MissingElement(String),
}

impl fmt::Display for DomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomError::NodeNotFound(id) => write!(f, "Node not found: {}", id),
            DomError::HierarchyError(id) => write!(f, "Invalid node hierarchy at: {}", id),
            DomError::MissingElement(what) => write!(f, "Page element missing: {}", what),
        }
    }
}

impl std::error::Error for DomError {}

// === DeliveryError ===

/// Errors raised when a message cannot reach a page agent.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryError {
    /// The target tab does not exist.
    TabNotFound(String),
    /// The tab exists but no page agent is attached yet.
    NoReceiver(String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::TabNotFound(id) => write!(f, "Tab not found: {}", id),
            DeliveryError::NoReceiver(id) => {
                write!(f, "No page agent attached to tab: {}", id)
            }
        }
    }
}

impl std::error::Error for DeliveryError {}

// === ServiceError ===

/// Errors returned by the external content service.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceError {
    /// The service could not be reached or refused the request.
    Unavailable(String),
    /// The request was rejected as malformed.
    InvalidRequest(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Unavailable(msg) => write!(f, "Content service unavailable: {}", msg),
            ServiceError::InvalidRequest(msg) => write!(f, "Invalid service request: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

// === QuizError ===

/// Errors raised by quiz session transitions.
#[derive(Debug, PartialEq)]
pub enum QuizError {
    /// The session has been submitted and accepts no further input.
    AlreadySubmitted,
    /// Submit was attempted before every question was answered.
    Incomplete { answered: usize, total: usize },
    /// The option index is outside the question's options.
    OptionOutOfRange(usize),
    /// The quiz holds no questions.
    NoQuestions,
    /// A question's correct answer index is outside its options.
    InvalidQuestion(usize),
}

impl fmt::Display for QuizError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizError::AlreadySubmitted => write!(f, "Quiz already submitted"),
            QuizError::Incomplete { answered, total } => {
                write!(f, "Quiz incomplete: {} of {} answered", answered, total)
            }
            QuizError::OptionOutOfRange(index) => write!(f, "Option out of range: {}", index),
            QuizError::NoQuestions => write!(f, "Quiz has no questions"),
            QuizError::InvalidQuestion(index) => {
                write!(f, "Question {} has an invalid correct answer", index)
            }
        }
    }
}

impl std::error::Error for QuizError {}

// === PopupError ===

/// User-facing failures of popup actions.
#[derive(Debug)]
pub enum PopupError {
    /// The active tab is not a recognized watch page.
    NotApplicableContext,
    /// The action needs an artifact that has not been generated yet.
    MissingPrerequisite(String),
    /// The coordinator answered with an error.
    HandlerFailure(String),
    /// A page agent command could not be delivered.
    Delivery(DeliveryError),
    /// The page did not look the way the page agent expected.
    DomAssumption(String),
    /// The clipboard refused the write.
    Clipboard(String),
    /// Persistent storage failed.
    Storage(String),
    /// A quiz transition was rejected.
    Quiz(QuizError),
}

impl fmt::Display for PopupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PopupError::NotApplicableContext => {
                write!(f, "Please navigate to a YouTube video to use this extension.")
            }
            PopupError::MissingPrerequisite(msg) => write!(f, "{}", msg),
            PopupError::HandlerFailure(msg) => write!(f, "{}", msg),
            PopupError::Delivery(e) => write!(f, "Page command failed: {}", e),
            PopupError::DomAssumption(msg) => write!(f, "{}", msg),
            PopupError::Clipboard(msg) => write!(f, "Could not copy to clipboard: {}", msg),
            PopupError::Storage(msg) => write!(f, "Storage failed: {}", msg),
            PopupError::Quiz(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PopupError {}

impl From<DeliveryError> for PopupError {
    fn from(e: DeliveryError) -> Self {
        PopupError::Delivery(e)
    }
}

impl From<StorageError> for PopupError {
    fn from(e: StorageError) -> Self {
        PopupError::Storage(e.to_string())
    }
}

impl From<SettingsError> for PopupError {
    fn from(e: SettingsError) -> Self {
        PopupError::Storage(e.to_string())
    }
}

impl From<QuizError> for PopupError {
    fn from(e: QuizError) -> Self {
        PopupError::Quiz(e)
    }
}

// === EnvelopeError ===

/// Errors raised while decoding a message envelope.
#[derive(Debug, PartialEq)]
pub enum EnvelopeError {
    /// The `action` tag names no known action.
    UnknownAction(String),
    /// The envelope is not shaped like any known message.
    Malformed(String),
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EnvelopeError::UnknownAction(_) => write!(f, "Unknown action"),
            EnvelopeError::Malformed(msg) => write!(f, "Malformed message: {}", msg),
        }
    }
}

impl std::error::Error for EnvelopeError {}
