//! Caller-owned entry point tying configuration to sessions.

use crate::codec::Encoding;
use crate::error::{Result, StoreError};
use crate::record::RecordType;
use crate::session::Session;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Path of the store file.
    pub path: PathBuf,

    /// How long opening a session waits for another session to release
    /// the store file.
    pub open_timeout: Duration,

    /// Encoding for record values.
    pub encoding: Encoding,

    /// Whether to create the store file (and its parent directories) if
    /// it doesn't exist.
    pub create_if_missing: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("./store.redb"),
            open_timeout: Duration::from_secs(1),
            encoding: Encoding::Json,
            create_if_missing: true,
        }
    }
}

impl StoreConfig {
    /// Default configuration for the store file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }
}

/// A store file and the settings used to open it.
///
/// Holds no open handle; each [`Backend::establish_connection`] opens a
/// fresh [`Session`] and closes it when the callback finishes.
#[derive(Clone, Debug)]
pub struct Backend {
    config: StoreConfig,
}

impl Backend {
    pub fn new(config: StoreConfig) -> Self {
        Self { config }
    }

    /// Create a backend and ensure a partition exists for every type in
    /// `record_types`.
    ///
    /// Stops at the first partition that cannot be created. Partitions
    /// created before the failure remain.
    pub fn initialize(config: StoreConfig, record_types: &[RecordType]) -> Result<Self> {
        info!(path = %config.path.display(), types = record_types.len(), "initializing store");

        let backend = Self::new(config);
        backend.establish_connection(|session| -> Result<()> {
            for record_type in record_types {
                session.create_partition_for(record_type)?;
            }
            Ok(())
        })?;

        Ok(backend)
    }

    /// Open a session, run `f` with it, and close it again.
    ///
    /// The session is closed on every exit from `f`, including errors and
    /// panics. Returns whatever `f` returned.
    pub fn establish_connection<T, E, F>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&Session) -> std::result::Result<T, E>,
        E: From<StoreError>,
    {
        let session = Session::open(&self.config)?;
        f(&session)
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }
}
