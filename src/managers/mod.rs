// Learning Assistant state managers
// Managers handle stateful operations: tabs, page documents, artifact cache, quiz sessions, timers.

pub mod artifact_cache;
pub mod document_manager;
pub mod quiz_session;
pub mod tab_manager;
pub mod timer_queue;
