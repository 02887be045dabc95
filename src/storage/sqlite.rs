//! SQLite storage implementation

use std::path::Path;
use rusqlite::{Connection, params, OptionalExtension};
use serde::Serialize;
use crate::Result;
use super::schema;

/// SQLite-backed key/value storage
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    // ========== Key/Value Operations ==========

    /// Get the raw value stored under a key
    pub fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Insert or replace the value stored under a key
    pub fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r#"
            INSERT OR REPLACE INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            "#,
            params![key, value, chrono::Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Serialize a value as JSON and store it under a key
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.set_item(key, &json)
    }

    /// Delete a key. Missing keys are ignored.
    pub fn remove_item(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv_store WHERE key = ?1", [key])?;
        Ok(())
    }

    /// All stored keys, sorted
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT key FROM kv_store ORDER BY key")?;

        let keys: Vec<String> = stmt
            .query_map([], |row| row.get(0))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(keys)
    }

    /// Count stored keys
    pub fn count_keys(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM kv_store", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Total size of stored values in bytes
    pub fn total_bytes(&self) -> Result<usize> {
        let bytes: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(value)), 0) FROM kv_store",
            [],
            |row| row.get(0),
        )?;
        Ok(bytes as usize)
    }

    /// Last time any key was written
    pub fn last_write(&self) -> Result<Option<String>> {
        let last: Option<String> = self
            .conn
            .query_row("SELECT MAX(updated_at) FROM kv_store", [], |row| row.get(0))?;
        Ok(last)
    }

    // ========== Bulk Operations ==========

    /// Begin a transaction for bulk operations
    pub fn begin_transaction(&mut self) -> Result<()> {
        self.conn.execute("BEGIN TRANSACTION", [])?;
        Ok(())
    }

    /// Commit a transaction
    pub fn commit(&mut self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }

    /// Rollback a transaction
    pub fn rollback(&mut self) -> Result<()> {
        self.conn.execute("ROLLBACK", [])?;
        Ok(())
    }

    /// Get database statistics
    pub fn stats(&self) -> Result<StoreStats> {
        Ok(StoreStats {
            keys: self.count_keys()?,
            bytes: self.total_bytes()?,
            last_write: self.last_write()?,
        })
    }
}

/// Database statistics
#[derive(Debug, Clone, Serialize)]
pub struct StoreStats {
    pub keys: usize,
    pub bytes: usize,
    pub last_write: Option<String>,
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Storage Statistics:")?;
        writeln!(f, "  Keys: {}", self.keys)?;
        writeln!(f, "  Bytes: {}", self.bytes)?;
        writeln!(f, "  Last write: {}", self.last_write.as_deref().unwrap_or("never"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_crud() {
        let store = SqliteStore::open_in_memory().unwrap();

        assert!(store.get_item("rooms").unwrap().is_none());

        store.set_item("rooms", "[]").unwrap();
        assert_eq!(store.get_item("rooms").unwrap().as_deref(), Some("[]"));

        store.set_item("rooms", r#"[{"id":"r1"}]"#).unwrap();
        assert_eq!(store.get_item("rooms").unwrap().as_deref(), Some(r#"[{"id":"r1"}]"#));
        assert_eq!(store.count_keys().unwrap(), 1);

        store.remove_item("rooms").unwrap();
        assert!(store.get_item("rooms").unwrap().is_none());
        store.remove_item("rooms").unwrap();
    }

    #[test]
    fn test_keys_sorted() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set_json("rooms", &Vec::<String>::new()).unwrap();
        store.set_json("assets", &vec!["x"]).unwrap();

        assert_eq!(store.keys().unwrap(), vec!["assets".to_string(), "rooms".to_string()]);
        assert_eq!(store.get_item("assets").unwrap().as_deref(), Some(r#"["x"]"#));
    }

    #[test]
    fn test_rollback_discards_writes() {
        let mut store = SqliteStore::open_in_memory().unwrap();
        store.begin_transaction().unwrap();
        store.set_item("locations", "[]").unwrap();
        store.rollback().unwrap();
        assert!(store.get_item("locations").unwrap().is_none());
    }

    #[test]
    fn test_stats() {
        let store = SqliteStore::open_in_memory().unwrap();
        let empty = store.stats().unwrap();
        assert_eq!(empty.keys, 0);
        assert_eq!(empty.bytes, 0);
        assert!(empty.last_write.is_none());

        store.set_item("categories", r#"["Audio"]"#).unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.keys, 1);
        assert_eq!(stats.bytes, 9);
        assert!(stats.last_write.is_some());
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.db");

        {
            let store = SqliteStore::open(&path).unwrap();
            store.set_item("locations", r#"[{"id":"l1"}]"#).unwrap();
        }

        let reopened = SqliteStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("locations").unwrap().as_deref(), Some(r#"[{"id":"l1"}]"#));
    }
}
