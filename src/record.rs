//! The contract every storable type implements.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A value that can be stored in its own partition under a primary key.
///
/// ```ignore
/// #[derive(Serialize, Deserialize)]
/// struct User {
///     id: String,
///     name: String,
/// }
///
/// impl Record for User {
///     const PARTITION: &'static str = "users";
///
///     fn primary_key(&self) -> Cow<'_, str> {
///         Cow::Borrowed(&self.id)
///     }
/// }
/// ```
pub trait Record: Serialize + DeserializeOwned {
    /// Partition holding every record of this type.
    ///
    /// Must be non-empty and must not change for the lifetime of the store.
    const PARTITION: &'static str;

    /// Key unique within [`Record::PARTITION`].
    fn primary_key(&self) -> Cow<'_, str>;
}

/// Type-erased description of a record type, used to register partitions.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordType {
    partition: &'static str,
    type_name: &'static str,
}

impl RecordType {
    /// Describe the record type `T`.
    pub fn of<T: Record>() -> Self {
        Self {
            partition: T::PARTITION,
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn partition(&self) -> &'static str {
        self.partition
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordType({} -> {})", self.type_name, self.partition)
    }
}
