//! Flat-file backend: one newline-terminated text file per store.
//!
//! Every operation holds the store's in-process mutex and an exclusive OS
//! lock on a sibling `.<file>.lock` file, so separate processes sharing a
//! data directory serialize on the same store too.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use fs2::FileExt;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::{Modifier, RecordStore, StoreName};
use crate::error::{Error, Result};

/// Record store backed by text files in a single directory.
///
/// Operations on one store are serialized through that store's lock, across
/// threads, store instances and processes.
#[derive(Debug)]
pub struct FlatFileStore {
    dir: PathBuf,
    locks: [Mutex<()>; 5],
}

impl FlatFileStore {
    /// Open a store directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        if !dir.exists() {
            fs::create_dir_all(&dir).map_err(|source| Error::DirectoryCreate {
                path: dir.clone(),
                source,
            })?;
        }
        debug!("Opened flat-file store at {}", dir.display());
        Ok(Self {
            dir,
            locks: Default::default(),
        })
    }

    /// Directory holding the store files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of one store's file.
    #[must_use]
    pub fn path(&self, store: StoreName) -> PathBuf {
        self.dir.join(store.file_name())
    }

    fn lock_path(&self, store: StoreName) -> PathBuf {
        self.dir.join(format!(".{}.lock", store.file_name()))
    }

    fn lock(&self, store: StoreName) -> Result<StoreGuard<'_>> {
        let local = self.locks[store.index()]
            .lock()
            .map_err(|_| Error::LockPoisoned { store })?;

        let path = self.lock_path(store);
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)?;
        FileExt::lock_exclusive(&file)?;

        Ok(StoreGuard {
            _file: FileLock { file, path },
            _local: local,
        })
    }

    fn ensure_file(&self, store: StoreName) -> Result<()> {
        let path = self.path(store);
        if !path.exists() {
            OpenOptions::new().create(true).append(true).open(&path)?;
            debug!("Created empty store {}", path.display());
        }
        Ok(())
    }

    fn read_locked(&self, store: StoreName) -> Result<Vec<String>> {
        self.ensure_file(store)?;
        let text = fs::read_to_string(self.path(store))?;
        Ok(text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToString::to_string)
            .collect())
    }

    fn write_locked(&self, store: StoreName, records: &[String]) -> Result<()> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        for record in records {
            writeln!(tmp, "{record}")?;
        }
        tmp.as_file().sync_all()?;
        tmp.persist(self.path(store)).map_err(|e| e.error)?;
        debug!(store = %store, count = records.len(), "Rewrote store");
        Ok(())
    }
}

/// Exclusive OS lock on a store's lock file, released on drop.
#[derive(Debug)]
struct FileLock {
    file: File,
    path: PathBuf,
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(err) = FileExt::unlock(&self.file) {
            warn!(
                path = %self.path.display(),
                error = %err,
                "Failed to release store lock"
            );
        }
    }
}

/// Both locks for one store. The file lock is released before the mutex.
#[derive(Debug)]
struct StoreGuard<'a> {
    _file: FileLock,
    _local: MutexGuard<'a, ()>,
}

impl RecordStore for FlatFileStore {
    fn ensure(&self, store: StoreName) -> Result<()> {
        let _guard = self.lock(store)?;
        self.ensure_file(store)
    }

    fn read_all(&self, store: StoreName) -> Result<Vec<String>> {
        let _guard = self.lock(store)?;
        self.read_locked(store)
    }

    fn write_all(&self, store: StoreName, records: &[String]) -> Result<()> {
        let _guard = self.lock(store)?;
        self.write_locked(store, records)
    }

    fn append(&self, store: StoreName, record: &str) -> Result<()> {
        let _guard = self.lock(store)?;
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(self.path(store))?;

        // A hand-edited file may lack its final newline.
        let len = file.metadata()?.len();
        if len > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
            }
        }
        writeln!(file, "{}", record.trim())?;
        Ok(())
    }

    fn modify(&self, store: StoreName, f: &mut Modifier<'_>) -> Result<()> {
        let _guard = self.lock(store)?;
        let mut records = self.read_locked(store)?;
        f(&mut records)?;
        self.write_locked(store, &records)
    }
}
