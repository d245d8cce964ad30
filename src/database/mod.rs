//! Learning Assistant storage layer.
//!
//! Provides the SQLite connection, schema migrations and the process-wide
//! key-value store every component persists through.
//!
//! # Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use learning_assistant::database::{Database, KvStore};
//!
//! let db = Arc::new(Database::open_in_memory().expect("failed to open in-memory database"));
//! let store = KvStore::new(db);
//! store.set("focusMode", &true).expect("write failed");
//! ```

pub mod connection;
pub mod kv_store;
pub mod migrations;

pub use connection::Database;
pub use kv_store::KvStore;
