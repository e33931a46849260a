//! Generic record operations, one transaction per call.

use super::{partition_of, Partition, Session};
use crate::error::{Result, StoreError};
use crate::record::{Record, RecordType};
use redb::{ReadableTableMetadata, TableHandle};
use tracing::debug;

impl Session {
    // --- Partitions ---

    /// Ensure the partition for `T` exists. Idempotent.
    pub fn create_partition<T: Record>(&self) -> Result<()> {
        self.create_partition_for(&RecordType::of::<T>())
    }

    /// Ensure the partition described by `record_type` exists. Idempotent.
    pub fn create_partition_for(&self, record_type: &RecordType) -> Result<()> {
        let partition = record_type.partition();
        if partition.is_empty() {
            return Err(StoreError::InvalidPartition(partition.to_string()));
        }

        self.write(|txn| {
            txn.open_table(Partition::new(partition))
                .map_err(|e| StoreError::PartitionCreation {
                    partition: partition.to_string(),
                    source: e.into(),
                })?;
            Ok(())
        })?;

        debug!(partition, record_type = record_type.type_name(), "partition ready");
        Ok(())
    }

    /// Names of all existing partitions, sorted.
    pub fn partitions(&self) -> Result<Vec<String>> {
        self.read(|txn| {
            let mut names: Vec<String> = txn
                .list_tables()?
                .map(|handle| handle.name().to_string())
                .collect();
            names.sort();
            Ok(names)
        })
    }

    // --- Reads ---

    /// Fetch the record of type `T` stored under `key`.
    ///
    /// An absent key and an empty stored value both yield
    /// [`StoreError::NotFound`].
    pub fn fetch_by_id<T: Record>(&self, key: &str) -> Result<T> {
        let partition = partition_of::<T>()?;
        self.read(|txn| {
            let table = Self::open_partition(txn, partition)?;
            let not_found = || StoreError::NotFound {
                partition: partition.to_string(),
                key: key.to_string(),
            };

            let guard = table.get(key)?.ok_or_else(not_found)?;
            let bytes = guard.value();
            if bytes.is_empty() {
                return Err(not_found());
            }
            self.decode(partition, key, bytes)
        })
    }

    /// Whether a record of type `T` is stored under `key`.
    pub fn contains<T: Record>(&self, key: &str) -> Result<bool> {
        let partition = partition_of::<T>()?;
        self.read(|txn| {
            let table = Self::open_partition(txn, partition)?;
            Ok(table.get(key)?.is_some())
        })
    }

    /// Number of records of type `T`.
    pub fn count<T: Record>(&self) -> Result<u64> {
        let partition = partition_of::<T>()?;
        self.read(|txn| Ok(Self::open_partition(txn, partition)?.len()?))
    }

    // --- Writes ---

    /// Store `record` under its primary key, replacing any previous value.
    pub fn upsert<T: Record>(&self, record: &T) -> Result<()> {
        let partition = partition_of::<T>()?;
        let key = record.primary_key();
        let bytes = self.encoding.encode(record)?;

        self.write(|txn| {
            let mut table = txn.open_table(Partition::new(partition))?;
            table.insert(key.as_ref(), bytes.as_slice())?;
            Ok(())
        })
    }

    /// Same as [`Session::upsert`].
    pub fn persist<T: Record>(&self, record: &T) -> Result<()> {
        self.upsert(record)
    }

    /// Remove `record` from its partition. Removing an absent key succeeds.
    pub fn delete<T: Record>(&self, record: &T) -> Result<()> {
        self.delete_by_id::<T>(&record.primary_key())
    }

    /// Remove the record of type `T` stored under `key`, if any.
    ///
    /// A partition that was never created is left uncreated.
    pub fn delete_by_id<T: Record>(&self, key: &str) -> Result<()> {
        let partition = partition_of::<T>()?;
        self.write(|txn| {
            if !txn.list_tables()?.any(|handle| handle.name() == partition) {
                return Ok(());
            }
            let mut table = txn.open_table(Partition::new(partition))?;
            table.remove(key)?;
            Ok(())
        })
    }

    pub(crate) fn decode<T: Record>(&self, partition: &str, key: &str, bytes: &[u8]) -> Result<T> {
        self.encoding
            .decode(bytes)
            .map_err(|message| StoreError::Decode {
                partition: partition.to_string(),
                key: key.to_string(),
                message,
            })
    }
}
