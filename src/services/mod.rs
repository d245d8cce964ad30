// Learning Assistant services
// Services do the work behind each message: content generation, routing, page commands, settings.

pub mod clipboard;
pub mod content_service;
pub mod coordinator;
pub mod page_agent;
pub mod settings_engine;
