//! Deal Store - time-bounded promotions
//!
//! Owns the `premiumverse_deals` slot. Starts empty; there is no seed data.
//! Savings, expiry and unlock-condition helpers live on [`Deal`] itself.

use std::sync::Arc;

use shared::models::{Deal, DealCreate, DealUpdate};
use shared::util::snowflake_id;

use super::collection::{PersistentCollection, Subscription};
use crate::storage::{KvStore, keys};
use crate::utils::Clock;

pub struct DealStore {
    deals: PersistentCollection<Deal>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for DealStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DealStore")
            .field("deals_count", &self.deals.len())
            .finish()
    }
}

impl DealStore {
    pub fn load(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            deals: PersistentCollection::load(keys::DEALS, kv, Vec::new),
            clock,
        }
    }

    pub fn get_all(&self) -> Vec<Deal> {
        self.deals.snapshot()
    }

    /// Deals live today: `is_active && start_date <= today <= end_date`
    pub fn get_active(&self) -> Vec<Deal> {
        let today = self.clock.today();
        self.deals.read(|items| {
            items
                .iter()
                .filter(|d| d.is_live_on(today))
                .cloned()
                .collect()
        })
    }

    /// Live deals flagged as featured
    pub fn get_featured(&self) -> Vec<Deal> {
        self.get_active()
            .into_iter()
            .filter(|d| d.is_featured)
            .collect()
    }

    pub fn get_by_id(&self, id: i64) -> Option<Deal> {
        self.deals
            .read(|items| items.iter().find(|d| d.id == id).cloned())
    }

    /// Create a deal at the front of the list
    pub fn add(&self, data: DealCreate) -> Deal {
        let description = data
            .description
            .filter(|d| !d.trim().is_empty())
            .unwrap_or_else(|| format!("Get {} at special price!", data.product.product_name));

        let deal = Deal {
            id: snowflake_id(),
            product: data.product,
            deal_price: data.deal_price,
            min_purchase_amount: data.min_purchase_amount,
            description,
            start_date: data.start_date,
            end_date: data.end_date,
            is_active: data.is_active,
            is_featured: data.is_featured,
            created_at: self.clock.now(),
        };

        let created = deal.clone();
        self.deals.mutate(move |items| {
            items.insert(0, deal);
            Some(())
        });

        tracing::info!(
            deal_id = created.id,
            product_id = %created.product.product_id,
            deal_price = created.deal_price,
            "Deal created"
        );
        created
    }

    pub fn update(&self, id: i64, patch: DealUpdate) -> Option<Deal> {
        self.deals.mutate(|items| {
            let deal = items.iter_mut().find(|d| d.id == id)?;
            deal.apply_update(patch);
            Some(deal.clone())
        })
    }

    pub fn delete(&self, id: i64) -> bool {
        let deleted = self
            .deals
            .mutate(|items| {
                let index = items.iter().position(|d| d.id == id)?;
                items.remove(index);
                Some(())
            })
            .is_some();

        if deleted {
            tracing::info!(deal_id = id, "Deal deleted");
        }
        deleted
    }

    pub fn toggle_active(&self, id: i64) -> Option<Deal> {
        self.deals.mutate(|items| {
            let deal = items.iter_mut().find(|d| d.id == id)?;
            deal.is_active = !deal.is_active;
            Some(deal.clone())
        })
    }

    pub fn toggle_featured(&self, id: i64) -> Option<Deal> {
        self.deals.mutate(|items| {
            let deal = items.iter_mut().find(|d| d.id == id)?;
            deal.is_featured = !deal.is_featured;
            Some(deal.clone())
        })
    }

    pub fn subscribe(&self, listener: impl Fn(&[Deal]) + Send + Sync + 'static) -> Subscription {
        self.deals.subscribe(listener)
    }
}
