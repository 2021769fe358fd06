//! Local durable key-value store.
//!
//! # Responsibility
//! - Persist the full serialized page array under one fixed key.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - Writes replace the whole value; there are no partial updates.
//! - Unparseable stored values decode as "no pages", never as an error that
//!   blocks startup.

use crate::db::{open_db, open_db_in_memory, DbError};
use crate::model::page::Page;
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type LocalStoreResult<T> = Result<T, LocalStoreError>;

#[derive(Debug)]
pub enum LocalStoreError {
    Db(DbError),
    Encode(serde_json::Error),
    /// The store refused the write (quota, read-only medium...).
    Unavailable(String),
}

impl Display for LocalStoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode pages: {err}"),
            Self::Unavailable(reason) => write!(f, "local store unavailable: {reason}"),
        }
    }
}

impl Error for LocalStoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for LocalStoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for LocalStoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for LocalStoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Key-value persistence used as the local fallback store.
pub trait LocalStore {
    fn get(&self, key: &str) -> LocalStoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> LocalStoreResult<()>;
}

/// Result of reading the page array back from the local store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalLoad {
    Pages(Vec<Page>),
    /// Nothing stored under the key yet.
    Empty,
    /// A value exists but cannot be decoded.
    Malformed,
}

impl LocalLoad {
    /// Pages to use; empty for both `Empty` and `Malformed`.
    pub fn into_pages(self) -> Vec<Page> {
        match self {
            Self::Pages(pages) => pages,
            Self::Empty | Self::Malformed => Vec::new(),
        }
    }
}

/// Serializes the full page array for the local store.
pub fn encode_pages(pages: &[Page]) -> Result<String, serde_json::Error> {
    serde_json::to_string(pages)
}

/// Decodes a stored page array, normalizing each page.
pub fn decode_pages(raw: &str) -> Result<Vec<Page>, serde_json::Error> {
    let mut pages: Vec<Page> = serde_json::from_str(raw)?;
    for page in &mut pages {
        page.normalize();
    }
    Ok(pages)
}

/// Reads and decodes the page array stored under `key`.
///
/// Read failures are logged and treated like an empty store.
pub fn load_pages(store: &dyn LocalStore, key: &str) -> LocalLoad {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return LocalLoad::Empty,
        Err(err) => {
            warn!("event=local_load module=store status=error error={err}");
            return LocalLoad::Empty;
        }
    };
    match decode_pages(&raw) {
        Ok(pages) if pages.is_empty() => LocalLoad::Empty,
        Ok(pages) => LocalLoad::Pages(pages),
        Err(err) => {
            warn!(
                "event=local_load module=store status=error error_code=malformed bytes={} error={}",
                raw.len(),
                err
            );
            LocalLoad::Malformed
        }
    }
}

/// Encodes and writes the full page array under `key`.
pub fn save_pages(store: &dyn LocalStore, key: &str, pages: &[Page]) -> LocalStoreResult<()> {
    let encoded = encode_pages(pages)?;
    store.set(key, &encoded)
}

/// SQLite-backed local store over the `kv_entries` table.
pub struct SqliteLocalStore {
    conn: Connection,
}

impl SqliteLocalStore {
    /// Opens (or creates) a store file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> LocalStoreResult<Self> {
        Ok(Self {
            conn: open_db(path)?,
        })
    }

    pub fn open_in_memory() -> LocalStoreResult<Self> {
        Ok(Self {
            conn: open_db_in_memory()?,
        })
    }
}

impl LocalStore for SqliteLocalStore {
    fn get(&self, key: &str) -> LocalStoreResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> LocalStoreResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory local store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    entries: RefCell<HashMap<String, String>>,
    fail_writes: Cell<bool>,
}

impl MemoryLocalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail with `Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl LocalStore for MemoryLocalStore {
    fn get(&self, key: &str) -> LocalStoreResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> LocalStoreResult<()> {
        if self.fail_writes.get() {
            return Err(LocalStoreError::Unavailable("writes disabled".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
