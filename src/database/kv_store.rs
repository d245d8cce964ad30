//! Process-wide key-value store.
//!
//! Every persisted value is a JSON document under a string key. Writers are
//! not coordinated; the last write to a key wins.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::database::connection::Database;
use crate::types::errors::StorageError;
use crate::types::video::VideoId;

pub const FOCUS_MODE_KEY: &str = "focusMode";
pub const SETTINGS_KEY: &str = "settings";
pub const SUMMARY_PREFIX: &str = "summary_";
pub const QUIZ_PREFIX: &str = "quiz_";

pub fn summary_key(video: &VideoId) -> String {
    format!("{}{}", SUMMARY_PREFIX, video)
}

pub fn quiz_key(video: &VideoId) -> String {
    format!("{}{}", QUIZ_PREFIX, video)
}

/// JSON values keyed by string, backed by the `kv_store` table.
pub struct KvStore {
    db: Arc<Database>,
}

impl KvStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Opens a store over a fresh in-memory database.
    pub fn in_memory() -> Result<Self, StorageError> {
        Ok(Self::new(Arc::new(Database::open_in_memory()?)))
    }

    fn now() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    /// Reads and decodes the value under `key`. Missing keys yield `None`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let raw: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;

        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value)?;
        self.db.connection().execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json, Self::now()],
        )?;
        Ok(())
    }

    /// Deletes `key`. Returns whether it existed.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let affected = self
            .db
            .connection()
            .execute("DELETE FROM kv_store WHERE key = ?1", params![key])?;
        Ok(affected > 0)
    }

    /// Lists keys starting with `prefix`, sorted.
    pub fn keys_with_prefix(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare("SELECT key FROM kv_store WHERE substr(key, 1, ?2) = ?1 ORDER BY key")?;
        let keys = stmt
            .query_map(params![prefix, prefix.chars().count() as i64], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
