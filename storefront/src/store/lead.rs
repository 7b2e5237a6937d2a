//! Lead Store - registered customers
//!
//! Owns two slots: `premiumverse_leads` (the collection) and
//! `premiumverse_last_customer_id` (last issued id, decimal text).
//!
//! Customer ids start at 2024001 and are never reused. The next id is the
//! largest of: stored counter + 1, highest id in the collection + 1, and the
//! in-process high-water mark + 1. The counter is re-persisted before the id
//! is handed out, so a lost counter write cannot cause reuse within this
//! process either.

use chrono::Datelike;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shared::models::{AuthProvider, CUSTOMER_ID_BASE, Lead, LeadCreate, LeadUpdate};

use super::collection::{PersistentCollection, Subscription};
use crate::storage::{KvStore, keys};
use crate::utils::Clock;

/// Lead counters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadStats {
    pub total: usize,
    pub today: usize,
    pub this_month: usize,
    pub google: usize,
    pub email: usize,
    pub with_address: usize,
}

pub struct LeadStore {
    leads: PersistentCollection<Lead>,
    kv: Arc<dyn KvStore>,
    /// Last id issued by this process; also serializes registrations
    last_issued: Mutex<u64>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LeadStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeadStore")
            .field("leads_count", &self.leads.len())
            .field("last_issued", &*self.last_issued.lock())
            .finish()
    }
}

impl LeadStore {
    pub fn load(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            leads: PersistentCollection::load(keys::LEADS, kv.clone(), Vec::new),
            kv,
            last_issued: Mutex::new(0),
            clock,
        }
    }

    // ========== Queries ==========

    /// All leads, newest registration first
    pub fn get_all(&self) -> Vec<Lead> {
        let mut leads = self.leads.snapshot();
        leads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        leads
    }

    pub fn get_by_id(&self, customer_id: u64) -> Option<Lead> {
        self.leads.read(|items| {
            items
                .iter()
                .find(|l| l.customer_id == customer_id)
                .cloned()
        })
    }

    /// Case-insensitive email lookup
    pub fn get_by_email(&self, email: &str) -> Option<Lead> {
        self.leads
            .read(|items| items.iter().find(|l| l.matches_email(email)).cloned())
    }

    pub fn total_count(&self) -> usize {
        self.leads.len()
    }

    pub fn get_stats(&self) -> LeadStats {
        let today = self.clock.today();
        self.leads.read(|items| {
            let created = |l: &Lead| l.created_at.date_naive();
            LeadStats {
                total: items.len(),
                today: items.iter().filter(|l| created(l) == today).count(),
                this_month: items
                    .iter()
                    .filter(|l| {
                        let d = created(l);
                        d.year() == today.year() && d.month() == today.month()
                    })
                    .count(),
                google: items
                    .iter()
                    .filter(|l| l.auth_provider == AuthProvider::Google)
                    .count(),
                email: items
                    .iter()
                    .filter(|l| l.auth_provider == AuthProvider::Email)
                    .count(),
                with_address: items.iter().filter(|l| l.is_address_complete).count(),
            }
        })
    }

    // ========== Mutations ==========

    /// Register a customer.
    ///
    /// An existing email (case-insensitive) is updated in place and keeps
    /// its customer id; otherwise a new id is issued and the lead is
    /// inserted at the front.
    ///
    /// Registrations are serialized; a lead listener must not call back
    /// into `add_lead`.
    pub fn add_lead(&self, data: LeadCreate) -> Lead {
        let mut last_issued = self.last_issued.lock();

        if let Some(existing) = self.get_by_email(&data.email) {
            drop(last_issued);
            tracing::debug!(customer_id = existing.customer_id, "Lead exists, updating");
            return self
                .update_lead(existing.customer_id, data.into())
                .unwrap_or(existing);
        }

        let customer_id = self.issue_customer_id(&mut last_issued);
        let mut data = data;
        data.email = data.email.trim().to_string();
        let lead = Lead::from_create(customer_id, data, self.clock.now());

        let created = lead.clone();
        self.leads.mutate(move |items| {
            items.insert(0, lead);
            Some(())
        });

        tracing::info!(customer_id, auth_provider = created.auth_provider.label(), "Lead registered");
        created
    }

    /// Merge a patch and refresh `updated_at`
    pub fn update_lead(&self, customer_id: u64, patch: LeadUpdate) -> Option<Lead> {
        let now = self.clock.now();
        self.leads.mutate(|items| {
            let lead = items.iter_mut().find(|l| l.customer_id == customer_id)?;
            lead.apply_update(patch, now);
            Some(lead.clone())
        })
    }

    pub fn update_lead_by_email(&self, email: &str, patch: LeadUpdate) -> Option<Lead> {
        let lead = self.get_by_email(email)?;
        self.update_lead(lead.customer_id, patch)
    }

    pub fn delete_lead(&self, customer_id: u64) -> bool {
        let deleted = self
            .leads
            .mutate(|items| {
                let index = items.iter().position(|l| l.customer_id == customer_id)?;
                items.remove(index);
                Some(())
            })
            .is_some();

        if deleted {
            tracing::info!(customer_id, "Lead deleted");
        }
        deleted
    }

    pub fn subscribe(&self, listener: impl Fn(&[Lead]) + Send + Sync + 'static) -> Subscription {
        self.leads.subscribe(listener)
    }

    /// Issue the next customer id (also used by [`Self::add_lead`])
    pub fn next_customer_id(&self) -> u64 {
        let mut last_issued = self.last_issued.lock();
        self.issue_customer_id(&mut last_issued)
    }

    fn issue_customer_id(&self, last_issued: &mut u64) -> u64 {
        let stored = match self.kv.get(keys::LAST_CUSTOMER_ID) {
            Ok(raw) => raw.and_then(|s| s.trim().parse::<u64>().ok()),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read customer id counter");
                None
            }
        };
        let max_existing = self
            .leads
            .read(|items| items.iter().map(|l| l.customer_id).max());

        let next = [stored, max_existing, Some(*last_issued).filter(|v| *v > 0)]
            .into_iter()
            .flatten()
            .map(|v| v + 1)
            .max()
            .unwrap_or(CUSTOMER_ID_BASE)
            .max(CUSTOMER_ID_BASE);

        if let Err(e) = self.kv.set(keys::LAST_CUSTOMER_ID, &next.to_string()) {
            tracing::error!(error = %e, customer_id = next, "Failed to persist customer id counter");
        }
        *last_issued = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKvStore;
    use crate::utils::FixedClock;
    use chrono::{Duration, NaiveDate};

    fn signup(name: &str, email: &str) -> LeadCreate {
        LeadCreate {
            name: name.to_string(),
            email: email.to_string(),
            ..Default::default()
        }
    }

    fn store() -> (LeadStore, Arc<MemoryKvStore>, FixedClock) {
        let kv = Arc::new(MemoryKvStore::new());
        let clock = FixedClock::at(NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(), 9, 0, 0);
        let store = LeadStore::load(kv.clone(), Arc::new(clock.clone()));
        (store, kv, clock)
    }

    #[test]
    fn test_sequential_ids_from_base() {
        let (store, kv, _) = store();
        let a = store.add_lead(signup("A", "a@example.com"));
        let b = store.add_lead(signup("B", "b@example.com"));
        assert_eq!(a.customer_id, 2_024_001);
        assert_eq!(b.customer_id, 2_024_002);
        assert_eq!(
            kv.get(keys::LAST_CUSTOMER_ID).unwrap().as_deref(),
            Some("2024002")
        );
    }

    #[test]
    fn test_upsert_by_email_keeps_id() {
        let (store, _, _) = store();
        let first = store.add_lead(signup("Priya", "priya@example.com"));
        let again = store.add_lead(LeadCreate {
            phone: Some("9876543210".to_string()),
            ..signup("Priya P", "PRIYA@example.com")
        });

        assert_eq!(store.total_count(), 1);
        assert_eq!(again.customer_id, first.customer_id);
        assert_eq!(again.name, "Priya P");
        assert_eq!(again.phone, "9876543210");
        assert_eq!(again.email, "priya@example.com");
    }

    #[test]
    fn test_ids_never_reused_after_delete() {
        let (store, _, _) = store();
        let a = store.add_lead(signup("A", "a@example.com"));
        assert!(store.delete_lead(a.customer_id));
        let b = store.add_lead(signup("B", "b@example.com"));
        assert_eq!(b.customer_id, a.customer_id + 1);
    }

    #[test]
    fn test_counter_survives_lost_slot() {
        let (store, kv, _) = store();
        store.add_lead(signup("A", "a@example.com"));
        kv.remove(keys::LAST_CUSTOMER_ID).unwrap();
        // Collection still holds 2024001
        assert_eq!(store.next_customer_id(), 2_024_002);
    }

    #[test]
    fn test_counter_failure_does_not_reuse_ids() {
        let (store, kv, _) = store();
        kv.set_quota(Some(0));
        assert_eq!(store.next_customer_id(), 2_024_001);
        assert_eq!(store.next_customer_id(), 2_024_002);
    }

    #[test]
    fn test_update_by_email_and_missing() {
        let (store, _, clock) = store();
        let lead = store.add_lead(signup("A", "a@example.com"));
        clock.advance(Duration::minutes(5));

        let updated = store
            .update_lead_by_email(
                "A@EXAMPLE.COM",
                LeadUpdate {
                    city: Some("Pune".to_string()),
                    is_address_complete: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.city, "Pune");
        assert!(updated.updated_at > lead.updated_at);
        assert!(store.update_lead_by_email("x@example.com", LeadUpdate::default()).is_none());
        assert!(!store.delete_lead(1));
    }

    #[test]
    fn test_stats() {
        let (store, _, clock) = store();
        store.add_lead(LeadCreate {
            auth_provider: Some(AuthProvider::Google),
            is_address_complete: Some(true),
            ..signup("G", "g@example.com")
        });
        clock.advance(Duration::days(1));
        store.add_lead(signup("E", "e@example.com"));

        let stats = store.get_stats();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.today, 1);
        assert_eq!(stats.this_month, 2);
        assert_eq!(stats.google, 1);
        assert_eq!(stats.email, 1);
        assert_eq!(stats.with_address, 1);

        assert_eq!(store.get_all()[0].name, "E");
    }
}
