//! Raw string key-value backends.
//!
//! Backends know nothing about namespacing or JSON; [`crate::KvStore`]
//! layers both on top.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, OptionalExtension, params};

use crate::error::{Result, StoreError};
use crate::schema;

pub trait Backend: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// Every stored key, namespaced or not.
    fn keys(&self) -> Result<Vec<String>>;

    /// Bytes held by `key` + `value` over all entries.
    fn total_bytes(&self) -> Result<u64> {
        let mut total = 0u64;
        for key in self.keys()? {
            let len = self.get(&key)?.map(|v| v.len()).unwrap_or(0);
            total += (key.len() + len) as u64;
        }
        Ok(total)
    }
}

// --- SQLite ---

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Unavailable(format!("{}: {e}", parent.display())))?;
        }
        let conn = Connection::open(path)?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }
}

impl Backend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?1", [key])?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<_, _>>()?;
        Ok(keys)
    }

    fn total_bytes(&self) -> Result<u64> {
        let total: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(length(CAST(key AS BLOB)) + length(CAST(value AS BLOB))), 0) FROM kv",
            [],
            |row| row.get(0),
        )?;
        Ok(total as u64)
    }
}

// --- Memory ---

/// Process-local backend. Used for tests and when the database file cannot
/// be opened.
#[derive(Default)]
pub struct MemoryBackend {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| StoreError::Unavailable("memory backend poisoned".to_string()))
    }
}

impl Backend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(backend: &dyn Backend) {
        assert_eq!(backend.get("a").unwrap(), None);
        backend.set("a", "1").unwrap();
        backend.set("b", "22").unwrap();
        backend.set("a", "333").unwrap();
        assert_eq!(backend.get("a").unwrap().as_deref(), Some("333"));
        assert_eq!(backend.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(backend.total_bytes().unwrap(), (1 + 3 + 1 + 2) as u64);
        backend.remove("a").unwrap();
        backend.remove("missing").unwrap();
        assert_eq!(backend.keys().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_sqlite_backend() {
        exercise(&SqliteBackend::open_in_memory().unwrap());
    }

    #[test]
    fn test_memory_backend() {
        exercise(&MemoryBackend::new());
    }

    #[test]
    fn test_sqlite_persists_across_open() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("bliss.db");
        {
            let backend = SqliteBackend::open(&path).unwrap();
            backend.set("k", "v").unwrap();
        }
        let backend = SqliteBackend::open(&path).unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v"));
    }
}
