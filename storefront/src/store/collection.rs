//! Persistent collection
//!
//! One ordered collection, one durable slot, one listener list. Every store
//! in this crate is a thin domain layer over a [`PersistentCollection`].
//!
//! # Mutation protocol
//!
//! ```text
//! mutate(f) ──► write lock ──► f(&mut items) ──► changed? ──no──► return
//!                                                   │yes
//!                                                   ▼
//!                                          persist (whole array)
//!                                                   │
//!                                     unlock, snapshot for listeners
//!                                                   │
//!                                                   ▼
//!                               notify listeners in registration order
//! ```
//!
//! Persist failures are logged and swallowed; the in-memory collection stays
//! authoritative for the rest of the process lifetime.
//!
//! Listeners run outside the collection lock, so they may read the store
//! that notified them. A listener that mutates the same store triggers a
//! nested notification before the outer round finishes.

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::{Arc, Weak};

use crate::storage::{KvStore, StorageResult};

/// Change listener, receives the full collection after a mutation
pub type Listener<T> = Arc<dyn Fn(&[T]) + Send + Sync>;

struct ListenerRegistry<T> {
    next_id: u64,
    entries: Vec<(u64, Listener<T>)>,
}

impl<T> ListenerRegistry<T> {
    fn new() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping it does NOT unsubscribe; call [`Subscription::unsubscribe`].
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    dispose: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    fn new(dispose: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            dispose: Some(Box::new(dispose)),
        }
    }

    /// Remove exactly the listener this handle was issued for
    pub fn unsubscribe(mut self) {
        if let Some(dispose) = self.dispose.take() {
            dispose();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.dispose.is_some())
            .finish()
    }
}

/// Ordered collection mirrored into one durable slot
pub struct PersistentCollection<T> {
    key: &'static str,
    kv: Arc<dyn KvStore>,
    items: RwLock<Vec<T>>,
    listeners: Arc<Mutex<ListenerRegistry<T>>>,
}

impl<T> PersistentCollection<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    /// Load the collection stored under `key`.
    ///
    /// Falls back to `seed()` when the slot is empty, unreadable or does
    /// not parse. A non-empty seed is persisted immediately so the next
    /// load finds it.
    pub fn load(key: &'static str, kv: Arc<dyn KvStore>, seed: impl FnOnce() -> Vec<T>) -> Self {
        let stored = match kv.get(key) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<T>>(&raw) {
                Ok(items) => Some(items),
                Err(e) => {
                    tracing::warn!(key, error = %e, "Stored collection is corrupt, falling back to seed");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Failed to read collection, falling back to seed");
                None
            }
        };

        let collection = |items: Vec<T>| Self {
            key,
            kv: kv.clone(),
            items: RwLock::new(items),
            listeners: Arc::new(Mutex::new(ListenerRegistry::new())),
        };

        match stored {
            Some(items) => {
                tracing::debug!(key, count = items.len(), "Collection loaded");
                collection(items)
            }
            None => {
                let items = seed();
                let seeded = !items.is_empty();
                let this = collection(items);
                if seeded {
                    tracing::info!(key, count = this.len(), "Collection seeded");
                    this.persist_or_log(&this.items.read());
                }
                this
            }
        }
    }

    /// Slot name this collection persists to
    pub fn key(&self) -> &'static str {
        self.key
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// Run a read-only query against the current items
    pub fn read<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.items.read())
    }

    /// Owned copy of the current items
    pub fn snapshot(&self) -> Vec<T> {
        self.items.read().clone()
    }

    /// Apply a mutation.
    ///
    /// `f` returns `None` when nothing changed (e.g. lookup miss); in that
    /// case nothing is persisted and no listener runs.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut Vec<T>) -> Option<R>) -> Option<R> {
        let (result, snapshot) = {
            let mut items = self.items.write();
            let result = f(&mut items)?;
            self.persist_or_log(&items);
            let snapshot = self.has_listeners().then(|| items.clone());
            (result, snapshot)
        };

        if let Some(snapshot) = snapshot {
            self.notify(&snapshot);
        }
        Some(result)
    }

    /// Replace the whole collection (persist + notify)
    pub fn replace(&self, items: Vec<T>) {
        self.mutate(move |current| {
            *current = items;
            Some(())
        });
    }

    /// Write the whole collection to its slot
    pub fn persist(&self) -> StorageResult<()> {
        let items = self.items.read();
        self.write_slot(&items)
    }

    /// Register a listener; listeners run in registration order
    pub fn subscribe(&self, listener: impl Fn(&[T]) + Send + Sync + 'static) -> Subscription {
        let listener: Listener<T> = Arc::new(listener);
        let id = {
            let mut registry = self.listeners.lock();
            let id = registry.next_id;
            registry.next_id += 1;
            registry.entries.push((id, listener));
            id
        };

        let registry: Weak<Mutex<ListenerRegistry<T>>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.lock().entries.len()
    }

    fn has_listeners(&self) -> bool {
        !self.listeners.lock().entries.is_empty()
    }

    fn notify(&self, items: &[T]) {
        // Copy the list so listeners may (un)subscribe while being called
        let listeners: Vec<Listener<T>> = self
            .listeners
            .lock()
            .entries
            .iter()
            .map(|(_, l)| l.clone())
            .collect();

        for listener in listeners {
            listener(items);
        }
    }

    fn write_slot(&self, items: &[T]) -> StorageResult<()> {
        let json = serde_json::to_string(items)?;
        self.kv.set(self.key, &json)
    }

    fn persist_or_log(&self, items: &[T]) {
        if let Err(e) = self.write_slot(items) {
            tracing::error!(key = self.key, error = %e, "Failed to persist collection");
        }
    }
}
