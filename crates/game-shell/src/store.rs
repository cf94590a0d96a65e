use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::warn;
use rusqlite::{Connection, OptionalExtension, params};

/// Key holding the best result of a game.
pub const BEST_SCORE_KEY: &str = "bestScore";
/// Key holding the number of won games.
pub const GAMES_WON_KEY: &str = "gamesWon";

/// Durable string key/value storage. Last writer wins.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Read `key` as an unsigned integer. Absent and unparsable values both
/// read as `None`; the latter is logged.
pub fn read_u64<S: KeyValueStore + ?Sized>(store: &S, key: &str) -> Result<Option<u64>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(v) => Ok(Some(v)),
        Err(e) => {
            warn!("ignoring unparsable value {raw:?} for {key}: {e}");
            Ok(None)
        }
    }
}

pub fn write_u64<S: KeyValueStore + ?Sized>(store: &mut S, key: &str, value: u64) -> Result<()> {
    store.set(key, &value.to_string())
}

/// Single-table SQLite store.
///
/// Schema:
/// - kv(meta_key TEXT PRIMARY KEY, meta_value TEXT)
pub struct SqliteStore {
    path: PathBuf,
    conn: Connection,
}

impl SqliteStore {
    /// Create or open the database at `path`, ensure schema exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let conn = Connection::open(&path)
            .with_context(|| format!("failed to open {}", path.display()))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv (
                meta_key TEXT PRIMARY KEY,
                meta_value TEXT NOT NULL
            );
            "#,
        )
        .with_context(|| format!("failed to create schema in {}", path.display()))?;
        Ok(Self { path, conn })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT meta_value FROM kv WHERE meta_key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("failed to read {key}"))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv (meta_key, meta_value) VALUES (?1, ?2)
                 ON CONFLICT(meta_key) DO UPDATE SET meta_value=excluded.meta_value",
                params![key, value],
            )
            .with_context(|| format!("failed to write {key}"))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.conn
            .execute("DELETE FROM kv WHERE meta_key = ?1", params![key])
            .with_context(|| format!("failed to remove {key}"))?;
        Ok(())
    }
}

/// Non-durable store for tests and throwaway sessions.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Open the SQLite store at `path`, or a `MemoryStore` when `ephemeral`.
pub fn open_store(path: &Path, ephemeral: bool) -> Result<Box<dyn KeyValueStore>> {
    if ephemeral {
        Ok(Box::new(MemoryStore::new()))
    } else {
        Ok(Box::new(SqliteStore::open(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn sqlite_roundtrip_survives_reopen() {
        let td = tempdir().unwrap();
        let path = td.path().join("nested").join("scores.db");
        {
            let mut store = SqliteStore::open(&path).expect("open store");
            assert!(store.path().exists());
            assert_eq!(store.get(BEST_SCORE_KEY).unwrap(), None);
            write_u64(&mut store, BEST_SCORE_KEY, 128).unwrap();
            write_u64(&mut store, BEST_SCORE_KEY, 512).unwrap();
            store.set(GAMES_WON_KEY, "3").unwrap();
        }
        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(read_u64(&store, BEST_SCORE_KEY).unwrap(), Some(512));
        assert_eq!(read_u64(&store, GAMES_WON_KEY).unwrap(), Some(3));

        store.remove(GAMES_WON_KEY).unwrap();
        assert_eq!(store.get(GAMES_WON_KEY).unwrap(), None);
        // Removing a missing key is fine.
        store.remove(GAMES_WON_KEY).unwrap();
    }

    #[test]
    fn unparsable_values_read_as_absent() {
        let mut store = MemoryStore::new();
        store.set(BEST_SCORE_KEY, "NaN").unwrap();
        assert_eq!(read_u64(&store, BEST_SCORE_KEY).unwrap(), None);
        store.set(BEST_SCORE_KEY, " 42 ").unwrap();
        assert_eq!(read_u64(&store, BEST_SCORE_KEY).unwrap(), Some(42));
        assert_eq!(read_u64(&store, "missing").unwrap(), None);
    }

    #[test]
    fn boxed_store_delegates() {
        let td = tempdir().unwrap();
        let mut store = open_store(&td.path().join("x.db"), true).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert!(!td.path().join("x.db").exists());

        let mut durable = open_store(&td.path().join("y.db"), false).unwrap();
        durable.set("k", "w").unwrap();
        assert!(td.path().join("y.db").exists());
    }
}
