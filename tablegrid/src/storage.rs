use crate::error::{GridError, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A durable string-keyed slot store for persisted grid state.
pub trait KeyValueStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-process storage. Clones share the same map, so a test (or a second
/// grid) can observe what another handle wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|map| map.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.inner
            .lock()
            .map_err(|_| GridError::Storage("memory storage lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStorage {
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
}

/// SQLite-backed storage, one row per key.
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Open or create the storage database at the given path.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let storage = SqliteStorage { conn };
        storage.initialize_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let storage = SqliteStorage { conn };
        storage.initialize_tables()?;
        Ok(storage)
    }

    fn initialize_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS grid_storage (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM grid_storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut keys = Vec::new();
        for row in rows {
            keys.push(row?);
        }
        Ok(keys)
    }
}

impl KeyValueStore for SqliteStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let result = self
            .conn
            .query_row(
                "SELECT value FROM grid_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(result)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO grid_storage (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM grid_storage WHERE key = ?1", params![key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_shared_between_clones() {
        let storage = MemoryStorage::new();
        let other = storage.clone();

        storage.set("grid", "[]").unwrap();
        assert_eq!(other.get("grid").unwrap(), Some("[]".to_string()));

        other.remove("grid").unwrap();
        assert!(storage.get("grid").unwrap().is_none());
        assert!(storage.is_empty());
    }

    #[test]
    fn test_sqlite_set_get_remove() {
        let storage = SqliteStorage::open_in_memory().unwrap();

        assert!(storage.get("filters").unwrap().is_none());

        storage.set("filters", "[1]").unwrap();
        storage.set("filters", "[2]").unwrap();
        assert_eq!(storage.get("filters").unwrap(), Some("[2]".to_string()));
        assert_eq!(storage.keys().unwrap(), vec!["filters".to_string()]);

        storage.remove("filters").unwrap();
        assert!(storage.get("filters").unwrap().is_none());
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn test_sqlite_survives_reopen() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("grid.db");

        {
            let storage = SqliteStorage::open(&path).unwrap();
            storage.set("allocations", "[]").unwrap();
        }

        let storage = SqliteStorage::open(&path).unwrap();
        assert_eq!(storage.get("allocations").unwrap(), Some("[]".to_string()));
    }
}
