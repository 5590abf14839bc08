//! Storage layer for carrental.
//!
//! Each store is an ordered list of line records. Two backends implement the
//! [`RecordStore`] contract:
//!
//! - [`FlatFileStore`] keeps one text file per store in a data directory and
//!   serializes mutations with one lock per store.
//! - [`SqliteStore`] keeps every store in a single `SQLite` table and runs
//!   read-modify-write cycles inside a transaction.

mod flatfile;
pub mod migrations;
pub mod schema;
mod sqlite;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::session::Role;

pub use flatfile::FlatFileStore;
pub use sqlite::SqliteStore;

/// The named stores the application persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreName {
    /// Admin credentials.
    Admins,
    /// User credentials.
    Users,
    /// Car inventory.
    Cars,
    /// Audit log of rentals.
    Waiting,
    /// Audit log of returns.
    Returned,
}

impl StoreName {
    /// Every store, in bootstrap order.
    pub const ALL: [StoreName; 5] = [
        Self::Admins,
        Self::Users,
        Self::Cars,
        Self::Waiting,
        Self::Returned,
    ];

    /// Short key used inside the database backend.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admins => "admins",
            Self::Users => "users",
            Self::Cars => "cars",
            Self::Waiting => "waiting",
            Self::Returned => "returned",
        }
    }

    /// File name used by the flat-file backend.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Admins => "admins.txt",
            Self::Users => "users.txt",
            Self::Cars => "cars.txt",
            Self::Waiting => "waiting.txt",
            Self::Returned => "returned.txt",
        }
    }

    /// The credential store for a role.
    #[must_use]
    pub fn credentials(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admins,
            Role::User => Self::Users,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Admins => 0,
            Self::Users => 1,
            Self::Cars => 2,
            Self::Waiting => 3,
            Self::Returned => 4,
        }
    }
}

impl std::fmt::Display for StoreName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Closure handed to [`RecordStore::modify`].
pub type Modifier<'a> = dyn FnMut(&mut Vec<String>) -> Result<()> + 'a;

/// Line-oriented persistence for the named stores.
///
/// Records are single lines without the trailing newline. Blank lines are
/// never returned and surrounding whitespace is trimmed on read.
pub trait RecordStore: std::fmt::Debug {
    /// Create the store if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot create the store.
    fn ensure(&self, store: StoreName) -> Result<()>;

    /// Read every record in order. A missing store reads as empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn read_all(&self, store: StoreName) -> Result<Vec<String>>;

    /// Replace the whole store with `records`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn write_all(&self, store: StoreName, records: &[String]) -> Result<()>;

    /// Add one record at the end of the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn append(&self, store: StoreName, record: &str) -> Result<()>;

    /// Read, edit and write back the store while holding its lock.
    ///
    /// Nothing is written when `f` returns an error; the error is passed
    /// through unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or a backend error.
    fn modify(&self, store: StoreName, f: &mut Modifier<'_>) -> Result<()>;
}

/// Open the backend selected by `config`.
///
/// # Errors
///
/// Returns an error if the data directory or database cannot be opened.
pub fn open_store(config: &Config) -> Result<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match config.storage.backend {
        Backend::FlatFile => Box::new(FlatFileStore::open(config.data_dir())?),
        Backend::Sqlite => Box::new(SqliteStore::open(config.database_path())?),
    };
    info!(backend = ?config.storage.backend, "Record store ready");
    Ok(store)
}

/// Make sure every store exists.
///
/// # Errors
///
/// Returns the first backend error.
pub fn ensure_all(store: &dyn RecordStore) -> Result<()> {
    for name in StoreName::ALL {
        store.ensure(name)?;
    }
    Ok(())
}
