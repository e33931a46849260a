//! Error types for the record store.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store {} unavailable: lock not acquired within {timeout:?}", path.display())]
    EngineUnavailable { path: PathBuf, timeout: Duration },

    #[error("Failed to create partition {partition}: {source}")]
    PartitionCreation {
        partition: String,
        #[source]
        source: redb::Error,
    },

    #[error("Partition does not exist: {0}")]
    PartitionMissing(String),

    #[error("Invalid partition name: {0:?}")]
    InvalidPartition(String),

    #[error("{key}: not found in {partition}")]
    NotFound { partition: String, key: String },

    #[error("Failed to decode {partition}/{key}: {message}")]
    Decode {
        partition: String,
        key: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Encode(String),

    #[error("Engine error: {0}")]
    Engine(#[from] redb::Error),
}

impl StoreError {
    /// Whether retrying the same call later may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::EngineUnavailable { .. })
    }
}

impl From<redb::DatabaseError> for StoreError {
    fn from(e: redb::DatabaseError) -> Self {
        StoreError::Engine(e.into())
    }
}

impl From<redb::TransactionError> for StoreError {
    fn from(e: redb::TransactionError) -> Self {
        StoreError::Engine(e.into())
    }
}

impl From<redb::TableError> for StoreError {
    fn from(e: redb::TableError) -> Self {
        StoreError::Engine(e.into())
    }
}

impl From<redb::StorageError> for StoreError {
    fn from(e: redb::StorageError) -> Self {
        StoreError::Engine(e.into())
    }
}

impl From<redb::CommitError> for StoreError {
    fn from(e: redb::CommitError) -> Self {
        StoreError::Engine(e.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Encode(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for StoreError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        StoreError::Encode(e.to_string())
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_unavailable_is_retryable() {
        let busy = StoreError::EngineUnavailable {
            path: PathBuf::from("t.redb"),
            timeout: Duration::from_millis(10),
        };
        assert!(busy.is_retryable());

        let missing = StoreError::NotFound {
            partition: "users".into(),
            key: "u1".into(),
        };
        assert!(!missing.is_retryable());
        assert_eq!(missing.to_string(), "u1: not found in users");
    }
}
