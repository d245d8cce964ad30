// Learning Assistant shared type definitions
// Each submodule defines types used across the application.

pub mod artifacts;
pub mod config;
pub mod dom;
pub mod errors;
pub mod messages;
pub mod notice;
pub mod settings;
pub mod tab;
pub mod video;
