//! Product Store - admin catalog with provider and profit tracking
//!
//! Owns the `pv_admin_products` slot. Profit fields are re-derived on every
//! write from the product's resulting cost and price.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shared::models::{Product, ProductCreate, ProductUpdate, PublicProduct, StockStatus};
use shared::util::{generate_sku, round2, snowflake_id};

use super::catalog;
use super::collection::{PersistentCollection, Subscription};
use crate::storage::{KvStore, keys};
use crate::utils::Clock;

// =============================================================================
// Types
// =============================================================================

/// Catalog-wide product statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub out_of_stock: usize,
    pub featured: usize,
    /// Sum of per-unit profit over all products
    pub total_profit: f64,
    /// Mean profit percentage over all products
    pub avg_margin: f64,
}

/// Per-category totals over catalog prices (not sales)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub category: String,
    pub count: usize,
    pub revenue: f64,
    pub profit: f64,
}

// =============================================================================
// ProductStore
// =============================================================================

pub struct ProductStore {
    products: PersistentCollection<Product>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ProductStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductStore")
            .field("products_count", &self.products.len())
            .finish()
    }
}

impl ProductStore {
    /// Load the stored catalog, seeding from the built-in catalog when empty
    pub fn load(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>) -> Self {
        let now = clock.now();
        let products =
            PersistentCollection::load(keys::PRODUCTS, kv, || catalog::seed_products(now));
        Self { products, clock }
    }

    // ========== Queries ==========

    /// All products, admin view
    pub fn get_all(&self) -> Vec<Product> {
        self.products.snapshot()
    }

    /// Active products without provider identity, cost or profit
    pub fn get_public(&self) -> Vec<PublicProduct> {
        self.products.read(|items| {
            items
                .iter()
                .filter(|p| p.is_active)
                .map(Product::to_public)
                .collect()
        })
    }

    pub fn get_by_id(&self, id: &str) -> Option<Product> {
        self.products
            .read(|items| items.iter().find(|p| p.id == id).cloned())
    }

    /// Active products in one category
    pub fn get_by_category(&self, category: &str) -> Vec<Product> {
        self.products.read(|items| {
            items
                .iter()
                .filter(|p| p.is_active && p.category == category)
                .cloned()
                .collect()
        })
    }

    /// Case-insensitive substring match over name, SKU, category and provider
    pub fn search(&self, query: &str) -> Vec<Product> {
        let q = query.trim().to_lowercase();
        self.products.read(|items| {
            items
                .iter()
                .filter(|p| {
                    p.product_name.to_lowercase().contains(&q)
                        || p.sku.to_lowercase().contains(&q)
                        || p.category.to_lowercase().contains(&q)
                        || p.provider_name.to_lowercase().contains(&q)
                })
                .cloned()
                .collect()
        })
    }

    pub fn get_stats(&self) -> ProductStats {
        self.products.read(|items| {
            let total = items.len();
            let active = items.iter().filter(|p| p.is_active).count();
            let out_of_stock = items
                .iter()
                .filter(|p| p.stock_status == StockStatus::OutOfStock)
                .count();
            let featured = items.iter().filter(|p| p.is_featured).count();
            let total_profit: f64 = items.iter().map(|p| p.profit_amount).sum();
            let avg_margin = if total > 0 {
                items.iter().map(|p| p.profit_percentage).sum::<f64>() / total as f64
            } else {
                0.0
            };

            ProductStats {
                total,
                active,
                inactive: total - active,
                out_of_stock,
                featured,
                total_profit: round2(total_profit),
                avg_margin: round2(avg_margin),
            }
        })
    }

    /// Per-category count and summed catalog price / profit, in first-seen order
    pub fn get_category_breakdown(&self) -> Vec<CategoryBreakdown> {
        self.products.read(|items| {
            let mut breakdown: Vec<CategoryBreakdown> = Vec::new();
            for p in items {
                match breakdown.iter_mut().find(|b| b.category == p.category) {
                    Some(entry) => {
                        entry.count += 1;
                        entry.revenue += p.selling_price;
                        entry.profit += p.profit_amount;
                    }
                    None => breakdown.push(CategoryBreakdown {
                        category: p.category.clone(),
                        count: 1,
                        revenue: p.selling_price,
                        profit: p.profit_amount,
                    }),
                }
            }
            breakdown
        })
    }

    // ========== Mutations ==========

    /// Add a product at the front of the catalog
    pub fn add(&self, data: ProductCreate) -> Product {
        let now = self.clock.now();
        let sku = data
            .sku
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| generate_sku(now.timestamp_millis()));
        let product = Product::from_create(format!("prod_{}", snowflake_id()), sku, data, now);

        let created = product.clone();
        self.products.mutate(move |items| {
            items.insert(0, product);
            Some(())
        });

        tracing::info!(product_id = %created.id, sku = %created.sku, "Product created");
        created
    }

    /// Merge a patch; `None` when the id is unknown
    pub fn update(&self, id: &str, patch: ProductUpdate) -> Option<Product> {
        let now = self.clock.now();
        let updated = self.products.mutate(|items| {
            let product = items.iter_mut().find(|p| p.id == id)?;
            product.apply_update(patch, now);
            Some(product.clone())
        });

        if updated.is_some() {
            tracing::debug!(product_id = %id, "Product updated");
        }
        updated
    }

    pub fn delete(&self, id: &str) -> bool {
        let deleted = self
            .products
            .mutate(|items| {
                let index = items.iter().position(|p| p.id == id)?;
                items.remove(index);
                Some(())
            })
            .is_some();

        if deleted {
            tracing::info!(product_id = %id, "Product deleted");
        }
        deleted
    }

    pub fn toggle_active(&self, id: &str) -> Option<Product> {
        let now = self.clock.now();
        self.products.mutate(|items| {
            let product = items.iter_mut().find(|p| p.id == id)?;
            product.is_active = !product.is_active;
            product.updated_at = now;
            Some(product.clone())
        })
    }

    pub fn toggle_featured(&self, id: &str) -> Option<Product> {
        let now = self.clock.now();
        self.products.mutate(|items| {
            let product = items.iter_mut().find(|p| p.id == id)?;
            product.is_featured = !product.is_featured;
            product.updated_at = now;
            Some(product.clone())
        })
    }

    /// Discard all edits and reseed from the built-in catalog
    pub fn reset(&self) {
        let seeded = catalog::seed_products(self.clock.now());
        tracing::warn!(count = seeded.len(), "Product catalog reset to defaults");
        self.products.replace(seeded);
    }

    /// Insert many products in one persist/notify round (spreadsheet import)
    pub fn add_many(&self, batch: Vec<ProductCreate>) -> Vec<Product> {
        if batch.is_empty() {
            return Vec::new();
        }
        let now = self.clock.now();
        let created: Vec<Product> = batch
            .into_iter()
            .map(|data| {
                let sku = data
                    .sku
                    .clone()
                    .filter(|s| !s.trim().is_empty())
                    .unwrap_or_else(|| generate_sku(now.timestamp_millis()));
                Product::from_create(format!("prod_{}", snowflake_id()), sku, data, now)
            })
            .collect();

        let inserted = created.clone();
        self.products.mutate(move |items| {
            items.splice(0..0, inserted);
            Some(())
        });

        tracing::info!(count = created.len(), "Products imported");
        created
    }

    pub fn subscribe(&self, listener: impl Fn(&[Product]) + Send + Sync + 'static) -> Subscription {
        self.products.subscribe(listener)
    }
}
