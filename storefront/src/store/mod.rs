//! Stores
//!
//! Four in-process stores, each owning one collection persisted to one
//! durable slot:
//!
//! | Store | Slot | Seed |
//! |-------|------|------|
//! | [`ProductStore`] | `pv_admin_products` | built-in catalog |
//! | [`OrderStore`] | `pv_admin_orders` | 80–120 demo orders over 30 days |
//! | [`DealStore`] | `premiumverse_deals` | none |
//! | [`LeadStore`] | `premiumverse_leads` (+ id counter) | none |

pub mod catalog;
pub mod collection;
pub mod deal;
pub mod lead;
pub mod order;
pub mod product;

pub use collection::{Listener, PersistentCollection, Subscription};
pub use deal::DealStore;
pub use lead::{LeadStats, LeadStore};
pub use order::{
    CategoryRevenue, DailySales, MonthlyMargin, OrderStats, OrderStore, OrderSummary, TopProduct,
    calculate_stats,
};
pub use product::{CategoryBreakdown, ProductStats, ProductStore};
