//! Populating typed collections from a partition.

use super::{partition_of, Session};
use crate::error::Result;
use crate::record::Record;
use redb::ReadableTable;

impl Session {
    /// Every record of type `T`, in ascending primary-key order.
    pub fn fetch_all<T: Record>(&self) -> Result<Vec<T>> {
        let mut out = Vec::new();
        self.fetch_all_into(&mut out)?;
        Ok(out)
    }

    /// Append every record of type `T` to `out`, in ascending primary-key
    /// order.
    ///
    /// All-or-nothing: if any stored value fails to decode, the error is
    /// returned and `out` is left exactly as it was.
    pub fn fetch_all_into<T: Record>(&self, out: &mut Vec<T>) -> Result<()> {
        let partition = partition_of::<T>()?;
        let decoded = self.read(|txn| {
            let table = Self::open_partition(txn, partition)?;
            let mut decoded: Vec<T> = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                decoded.push(self.decode(partition, key.value(), value.value())?);
            }
            Ok(decoded)
        })?;

        out.extend(decoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::session::Partition;
    use crate::store::StoreConfig;
    use serde::{Deserialize, Serialize};
    use std::borrow::Cow;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Order {
        id: String,
        total: u64,
    }

    impl Record for Order {
        const PARTITION: &'static str = "orders";

        fn primary_key(&self) -> Cow<'_, str> {
            Cow::Borrowed(&self.id)
        }
    }

    fn order(id: &str, total: u64) -> Order {
        Order {
            id: id.into(),
            total,
        }
    }

    fn test_session(dir: &TempDir) -> Session {
        let session = Session::open(&StoreConfig::new(dir.path().join("store.redb"))).unwrap();
        session.create_partition::<Order>().unwrap();
        session
    }

    #[test]
    fn test_fetch_all_empty_partition() {
        let dir = TempDir::new().unwrap();
        let session = test_session(&dir);

        assert!(session.fetch_all::<Order>().unwrap().is_empty());
    }

    #[test]
    fn test_fetch_all_key_order() {
        let dir = TempDir::new().unwrap();
        let session = test_session(&dir);

        for id in ["c", "a", "b"] {
            session.upsert(&order(id, 1)).unwrap();
        }

        let ids: Vec<String> = session
            .fetch_all::<Order>()
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fetch_all_into_appends() {
        let dir = TempDir::new().unwrap();
        let session = test_session(&dir);

        session.upsert(&order("o1", 10)).unwrap();

        let mut out = vec![order("local", 0)];
        session.fetch_all_into(&mut out).unwrap();
        assert_eq!(out, vec![order("local", 0), order("o1", 10)]);
    }

    #[test]
    fn test_corrupt_entry_leaves_collection_untouched() {
        let dir = TempDir::new().unwrap();
        let session = test_session(&dir);

        session.upsert(&order("o1", 10)).unwrap();
        session.upsert(&order("o3", 30)).unwrap();
        session
            .write(|txn| {
                let mut table = txn.open_table(Partition::new(Order::PARTITION))?;
                table.insert("o2", b"{\"id\":".as_slice())?;
                Ok(())
            })
            .unwrap();

        let mut out = vec![order("local", 0)];
        let result = session.fetch_all_into(&mut out);

        assert!(matches!(result, Err(StoreError::Decode { key, .. }) if key == "o2"));
        assert_eq!(out, vec![order("local", 0)]);
    }

    #[test]
    fn test_fetch_all_missing_partition() {
        let dir = TempDir::new().unwrap();
        let session = Session::open(&StoreConfig::new(dir.path().join("store.redb"))).unwrap();

        let result = session.fetch_all::<Order>();
        assert!(matches!(result, Err(StoreError::PartitionMissing(_))));
    }
}
