//! redb-backed slot storage
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `slots` | slot name | JSON text | One serialized collection (or counter) per slot |
//!
//! redb commits with `Durability::Immediate`, so a slot is on disk once
//! `set` returns.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::path::Path;
use std::sync::Arc;

use super::{KvStore, StorageResult};

/// Table for slots: key = slot name, value = serialized payload
const SLOTS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("slots");

/// Slot storage backed by redb
#[derive(Clone)]
pub struct RedbKvStore {
    db: Arc<Database>,
}

impl RedbKvStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        // Create the table so reads never hit TableDoesNotExist
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(SLOTS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Names of every slot currently written
    pub fn keys(&self) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;
        let mut keys = Vec::new();
        for entry in table.iter()? {
            let (key, _) = entry?;
            keys.push(key.value().to_string());
        }
        Ok(keys)
    }
}

impl KvStore for RedbKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SLOTS_TABLE)?;
        Ok(table.get(key)?.map(|guard| guard.value().to_string()))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SLOTS_TABLE)?;
            table.insert(key, value)?;
        }
        txn.commit()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(SLOTS_TABLE)?;
            table.remove(key)?;
        }
        txn.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let kv = RedbKvStore::open_in_memory().unwrap();
        assert_eq!(kv.get("pv_admin_products").unwrap(), None);

        kv.set("pv_admin_products", "[]").unwrap();
        assert_eq!(kv.get("pv_admin_products").unwrap().as_deref(), Some("[]"));

        kv.set("pv_admin_products", "[1]").unwrap();
        assert_eq!(kv.get("pv_admin_products").unwrap().as_deref(), Some("[1]"));
        assert_eq!(kv.keys().unwrap(), vec!["pv_admin_products".to_string()]);

        kv.remove("pv_admin_products").unwrap();
        assert_eq!(kv.get("pv_admin_products").unwrap(), None);

        // Removing again is fine
        kv.remove("pv_admin_products").unwrap();
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storefront.redb");

        {
            let kv = RedbKvStore::open(&path).unwrap();
            kv.set("premiumverse_last_customer_id", "2024007").unwrap();
        }

        let kv = RedbKvStore::open(&path).unwrap();
        assert_eq!(
            kv.get("premiumverse_last_customer_id").unwrap().as_deref(),
            Some("2024007")
        );
    }
}
