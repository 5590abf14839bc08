//! `SQLite` backend: every store lives in one `records` table.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, Transaction};
use tracing::{debug, info};

use super::{migrations, Modifier, RecordStore, StoreName};
use crate::error::{Error, Result};

/// Record store backed by a `SQLite` database.
///
/// The connection sits behind a mutex, so every operation is serialized, and
/// [`RecordStore::modify`] runs inside a transaction that is rolled back when
/// the modifier fails.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories if they don't exist and brings the
    /// schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let mut conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&mut conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database, mainly for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        migrations::initialize_schema(&mut conn)?;
        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Mutex::new(conn),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn conn(&self, store: StoreName) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::LockPoisoned { store })
    }
}

fn select_lines(conn: &Connection, store: StoreName) -> Result<Vec<String>> {
    let mut stmt = conn.prepare("SELECT line FROM records WHERE store = ?1 ORDER BY seq")?;
    let lines = stmt
        .query_map([store.as_str()], |row| row.get::<_, String>(0))?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect())
}

fn replace_lines(tx: &Transaction<'_>, store: StoreName, records: &[String]) -> Result<()> {
    tx.execute("DELETE FROM records WHERE store = ?1", [store.as_str()])?;
    let mut stmt = tx.prepare("INSERT INTO records (store, seq, line) VALUES (?1, ?2, ?3)")?;
    for (seq, record) in (1_i64..).zip(records) {
        stmt.execute(params![store.as_str(), seq, record])?;
    }
    Ok(())
}

impl RecordStore for SqliteStore {
    fn ensure(&self, _store: StoreName) -> Result<()> {
        // Stores are rows in a shared table and exist implicitly.
        Ok(())
    }

    fn read_all(&self, store: StoreName) -> Result<Vec<String>> {
        let conn = self.conn(store)?;
        select_lines(&conn, store)
    }

    fn write_all(&self, store: StoreName, records: &[String]) -> Result<()> {
        let mut conn = self.conn(store)?;
        let tx = conn.transaction()?;
        replace_lines(&tx, store, records)?;
        tx.commit()?;
        debug!(store = %store, count = records.len(), "Rewrote store");
        Ok(())
    }

    fn append(&self, store: StoreName, record: &str) -> Result<()> {
        let conn = self.conn(store)?;
        conn.execute(
            r"
            INSERT INTO records (store, seq, line)
            SELECT ?1, COALESCE(MAX(seq), 0) + 1, ?2 FROM records WHERE store = ?1
            ",
            params![store.as_str(), record.trim()],
        )?;
        Ok(())
    }

    fn modify(&self, store: StoreName, f: &mut Modifier<'_>) -> Result<()> {
        let mut conn = self.conn(store)?;
        let tx = conn.transaction()?;
        let mut records = select_lines(&tx, store)?;
        f(&mut records)?;
        replace_lines(&tx, store, &records)?;
        tx.commit()?;
        Ok(())
    }
}
