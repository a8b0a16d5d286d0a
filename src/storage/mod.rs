//! Local Key-Value Storage
//!
//! Durable string storage standing in for the browser's local storage:
//!
//! - **sqlite**: `SqliteStore`, one SQLite table of key/value rows on disk
//! - **memory**: `MemoryStore`, an in-process map for tests and ephemeral runs
//! - **error**: Error types
//!
//! Values are opaque strings; the overlay layer stores JSON documents in them.
//!
//! # Example
//!
//! ```rust,no_run
//! use userdash::storage::{KeyValueStore, SqliteStore};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = SqliteStore::open("./userdash_data")?;
//!     store.set_item("favorites", "[2,5]")?;
//!     assert_eq!(store.get_item("favorites")?.as_deref(), Some("[2,5]"));
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod memory;
pub mod sqlite;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Durable key-value storage
///
/// Implementations must be `Send + Sync` so a single store can back every
/// page of the dashboard.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, `None` if nothing was stored
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Forget `key`; removing a missing key is not an error
    fn remove_item(&self, key: &str) -> StorageResult<()>;
}
