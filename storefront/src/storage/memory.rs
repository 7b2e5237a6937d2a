//! In-process slot storage

use parking_lot::RwLock;
use std::collections::HashMap;

use super::{KvStore, StorageError, StorageResult};

/// Map-backed slots.
///
/// With a quota, a `set` that would push the total stored bytes (keys plus
/// values) above the limit fails with [`StorageError::QuotaExceeded`] and
/// leaves the slot untouched.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    slots: RwLock<HashMap<String, String>>,
    quota: RwLock<Option<usize>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(limit: usize) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            quota: RwLock::new(Some(limit)),
        }
    }

    /// Change the quota at runtime (`None` = unlimited)
    pub fn set_quota(&self, quota: Option<usize>) {
        *self.quota.write() = quota;
    }

    /// Total bytes held (keys plus values)
    pub fn used_bytes(&self) -> usize {
        self.slots
            .read()
            .iter()
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut slots = self.slots.write();
        if let Some(limit) = *self.quota.read() {
            let others: usize = slots
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(k, v)| k.len() + v.len())
                .sum();
            let needed = others + key.len() + value.len();
            if needed > limit {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    needed,
                    limit,
                });
            }
        }
        slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.slots.write().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_rejects_oversized_write() {
        let kv = MemoryKvStore::with_quota(16);
        kv.set("a", "1234").unwrap();

        let err = kv.set("b", "0123456789abcdef").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { .. }));
        assert_eq!(kv.get("b").unwrap(), None);
        assert_eq!(kv.get("a").unwrap().as_deref(), Some("1234"));
    }

    #[test]
    fn test_overwrite_counts_once() {
        let kv = MemoryKvStore::with_quota(10);
        kv.set("k", "123456789").unwrap();
        // Same key replaced, old value not counted
        kv.set("k", "987654321").unwrap();
        assert_eq!(kv.used_bytes(), 10);
    }
}
