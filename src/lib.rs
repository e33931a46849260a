//! # bucketstore
//!
//! Typed record persistence over an embedded, single-file, ordered
//! key-value store.
//!
//! ## Core Concepts
//!
//! - **Records**: any serde type implementing [`Record`] (primary key +
//!   partition name)
//! - **Partitions**: one named table per record type, iterated in key order
//! - **Sessions**: an exclusive, scoped handle to the store file; every
//!   operation runs in its own transaction
//!
//! ## Example
//!
//! ```ignore
//! use bucketstore::{Backend, Record, RecordType, StoreConfig};
//!
//! let backend = Backend::initialize(
//!     StoreConfig::new("./app.redb"),
//!     &[RecordType::of::<User>(), RecordType::of::<Order>()],
//! )?;
//!
//! backend.establish_connection(|session| {
//!     session.upsert(&User { id: "u1".into(), name: "Ann".into() })?;
//!     let ann: User = session.fetch_by_id("u1")?;
//!     let everyone: Vec<User> = session.fetch_all()?;
//!     session.delete(&ann)
//! })?;
//! ```

pub mod codec;
pub mod error;
pub mod record;
pub mod session;
pub mod store;

// Re-exports
pub use codec::Encoding;
pub use error::{Result, StoreError};
pub use record::{Record, RecordType};
pub use session::Session;
pub use store::{Backend, StoreConfig};
