mod memory;
mod record;
mod store;

pub use memory::MemoryBackend;
pub(crate) use record::merge_fields;
pub use record::{Collection, QuoteChild, Record, EXPORT_KEYS, SEEDED_KEY, SETTINGS_KEY};
pub use store::{DocumentStore, Rows};

use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::errors::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Flat key/value storage underneath the document store. Values are whole
/// serialized collections; every write overwrites the previous value.
pub trait KeyValueBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Writes several keys. Backends with transactions apply them atomically.
    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

const MIGRATIONS: &[(&str, &str)] = &[(
    "001_create_kv_entries.sql",
    "CREATE TABLE IF NOT EXISTS kv_entries (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    );",
)];

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    pub fn open(db_path: impl AsRef<Path>) -> StoreResult<Self> {
        let conn = Connection::open(db_path)?;
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> StoreResult<Self> {
        let mut backend = SqliteBackend { conn };
        backend.run_migrations()?;
        Ok(backend)
    }

    fn run_migrations(&mut self) -> StoreResult<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS schema_migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL
            );",
        )?;

        for (name, sql) in MIGRATIONS {
            let applied: Option<String> = self
                .conn
                .query_row(
                    "SELECT name FROM schema_migrations WHERE name = ?1",
                    params![name],
                    |row| row.get(0),
                )
                .optional()?;

            if applied.is_none() {
                let tx = self.conn.transaction()?;
                tx.execute_batch(sql)?;
                tx.execute(
                    "INSERT INTO schema_migrations (name, applied_at) VALUES (?1, datetime('now'))",
                    params![name],
                )?;
                tx.commit()?;
                tracing::debug!(migration = %name, "applied migration");
            }
        }

        Ok(())
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv_entries WHERE key = ?1")?;
        Ok(stmt.query_row(params![key], |row| row.get(0)).optional()?)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
            params![key, value],
        )?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, datetime('now'))",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
