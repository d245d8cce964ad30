//! Learning Assistant: a learning overlay for video watch pages.
//!
//! Three components cooperate in one process: the popup interface
//! ([`ui::popup`]), page agents living in watch pages
//! ([`services::page_agent`]) and the coordinator routing action requests
//! to the content service ([`services::coordinator`]). Shared state lives in
//! [`app::App`].
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
pub mod ui;
