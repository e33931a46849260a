//! Open handle to a store file.
//!
//! A [`Session`] owns the engine handle and the exclusive lock on the store
//! file. Every access operation runs in its own transaction; nothing spans
//! two calls. Dropping the session closes the engine and releases the lock.

mod access;
mod collect;

use crate::codec::Encoding;
use crate::error::{Result, StoreError};
use crate::record::Record;
use crate::store::StoreConfig;
use fs2::FileExt;
use redb::{
    Database, DatabaseError, ReadOnlyTable, ReadTransaction, TableDefinition, TableError,
    WriteTransaction,
};
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// How often a blocked open re-checks the lock.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Every partition maps a string key to encoded record bytes.
pub(crate) type Partition<'a> = TableDefinition<'a, &'static str, &'static [u8]>;

/// An exclusive, open connection to one store file.
pub struct Session {
    path: PathBuf,
    encoding: Encoding,

    /// Declared before the lock so the engine closes first.
    db: Database,

    /// Lock file for exclusive access.
    _lock_file: File,
}

impl Session {
    /// Open the store file described by `config`.
    ///
    /// Blocks for at most `config.open_timeout` while another session holds
    /// the file, then fails with [`StoreError::EngineUnavailable`].
    pub fn open(config: &StoreConfig) -> Result<Self> {
        if config.create_if_missing {
            if let Some(parent) = config.path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
        } else if !config.path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("store file {} does not exist", config.path.display()),
            )
            .into());
        }

        let lock_file = Self::acquire_lock(&config.path, config.open_timeout)?;

        let opened = if config.create_if_missing {
            Database::create(&config.path)
        } else {
            Database::open(&config.path)
        };
        let db = match opened {
            Ok(db) => db,
            // Someone opened the engine file without going through the lock.
            Err(DatabaseError::DatabaseAlreadyOpen) => {
                return Err(StoreError::EngineUnavailable {
                    path: config.path.clone(),
                    timeout: config.open_timeout,
                })
            }
            Err(e) => return Err(e.into()),
        };

        debug!(path = %config.path.display(), "session opened");

        Ok(Self {
            path: config.path.clone(),
            encoding: config.encoding,
            db,
            _lock_file: lock_file,
        })
    }

    /// Path of the store file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encoding used for record values.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Run `f` in a read-only transaction.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&ReadTransaction) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_read()?;
        f(&txn)
    }

    /// Run `f` in a read-write transaction, committing only if it succeeds.
    pub(crate) fn write<T>(&self, f: impl FnOnce(&WriteTransaction) -> Result<T>) -> Result<T> {
        let txn = self.db.begin_write()?;
        match f(&txn) {
            Ok(out) => {
                txn.commit()?;
                Ok(out)
            }
            Err(e) => {
                if let Err(abort_err) = txn.abort() {
                    warn!(error = %abort_err, "transaction abort failed");
                }
                Err(e)
            }
        }
    }

    /// Open a partition for reading, mapping an absent table to
    /// [`StoreError::PartitionMissing`].
    pub(crate) fn open_partition(
        txn: &ReadTransaction,
        partition: &str,
    ) -> Result<ReadOnlyTable<&'static str, &'static [u8]>> {
        match txn.open_table(Partition::new(partition)) {
            Ok(table) => Ok(table),
            Err(TableError::TableDoesNotExist(_)) => {
                Err(StoreError::PartitionMissing(partition.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn acquire_lock(path: &Path, timeout: Duration) -> Result<File> {
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(lock_path(path))?;
        let contended = fs2::lock_contended_error().raw_os_error();
        let deadline = Instant::now() + timeout;
        let mut waiting = false;

        loop {
            match lock_file.try_lock_exclusive() {
                Ok(()) => return Ok(lock_file),
                Err(e) if e.raw_os_error() == contended => {}
                Err(e) => return Err(e.into()),
            }

            let now = Instant::now();
            if now >= deadline {
                return Err(StoreError::EngineUnavailable {
                    path: path.to_path_buf(),
                    timeout,
                });
            }
            if !waiting {
                warn!(path = %path.display(), ?timeout, "store is locked, waiting");
                waiting = true;
            }
            thread::sleep(LOCK_POLL_INTERVAL.min(deadline - now));
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        debug!(path = %self.path.display(), "session closed");
    }
}

/// Partition name of `T`; an empty name never reaches the engine.
pub(crate) fn partition_of<T: Record>() -> Result<&'static str> {
    if T::PARTITION.is_empty() {
        return Err(StoreError::InvalidPartition(T::PARTITION.to_string()));
    }
    Ok(T::PARTITION)
}

/// `<store file>.lock`, next to the store file.
fn lock_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".lock");
    PathBuf::from(name)
}
