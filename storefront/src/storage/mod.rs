//! Durable key-value slots
//!
//! Every store owns exactly one slot and writes the whole collection into it
//! as a JSON array. The lead store owns a second slot for its id counter.
//!
//! | Backend | Use |
//! |---------|-----|
//! | [`RedbKvStore`] | On-disk (or in-memory redb) storage for the running app |
//! | [`MemoryKvStore`] | Plain map with an optional byte quota, for tests |

pub mod keys;
mod memory;
mod redb_kv;

pub use memory::MemoryKvStore;
pub use redb_kv::RedbKvStore;

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Quota exceeded writing {key}: {needed} bytes, limit {limit}")]
    QuotaExceeded {
        key: String,
        needed: usize,
        limit: usize,
    },
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for shared::AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QuotaExceeded { .. } => shared::AppError::storage_full(err.to_string()),
            StorageError::Serialization(e) => e.into(),
            other => shared::AppError::database(other.to_string()),
        }
    }
}

/// Named string slots with whole-value overwrite semantics.
///
/// Implementations must be usable from any thread; stores hold them as
/// `Arc<dyn KvStore>`.
pub trait KvStore: Send + Sync {
    /// Read a slot, `None` when it was never written
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Overwrite a slot
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Delete a slot (no-op when absent)
    fn remove(&self, key: &str) -> StorageResult<()>;
}
