//! Analytics Service - dashboard aggregates over the product and order stores
//!
//! Stateless: every call re-reads the stores, so results always reflect
//! the latest mutations. Revenue figures follow the order store's
//! Completed + Paid rule.

pub mod format;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shared::models::{Order, ProfitBand};
use shared::util::js_round;

use crate::store::{DailySales, MonthlyMargin, OrderStats, OrderStore, ProductStore};
pub use format::{format_currency, format_percentage};

// =============================================================================
// Display constants
// =============================================================================

pub const COLOR_PRIMARY: &str = "#0EA5E9";
pub const COLOR_SECONDARY: &str = "#8B5CF6";
pub const COLOR_SUCCESS: &str = "#10B981";
pub const COLOR_WARNING: &str = "#FBBF24";
pub const COLOR_ERROR: &str = "#EF4444";

/// Category palette, cycled
pub const CATEGORY_COLORS: [&str; 11] = [
    "#0EA5E9", "#8B5CF6", "#EC4899", "#10B981", "#F59E0B", "#6366F1", "#14B8A6", "#F97316",
    "#EF4444", "#84CC16", "#06B6D4",
];

/// Known category keys with their display names; the position also picks the color
const CATEGORIES: [(&str, &str); 12] = [
    ("ott", "Streaming"),
    ("music", "Music"),
    ("ai_tools", "AI Tools"),
    ("software_keys", "Software"),
    ("editing", "Editing"),
    ("cloud", "Cloud"),
    ("vpn", "VPN"),
    ("antivirus", "Security"),
    ("gaming", "Gaming"),
    ("productivity", "Productivity"),
    ("education", "Education"),
    ("other", "Other"),
];

/// Display name of a category key; unknown keys are shown as-is
pub fn category_display_name(category: &str) -> String {
    CATEGORIES
        .iter()
        .find(|(key, _)| *key == category)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| category.to_string())
}

/// Stable chart color for a category key
pub fn category_color(category: &str) -> &'static str {
    let index = CATEGORIES
        .iter()
        .position(|(key, _)| *key == category)
        .unwrap_or_else(|| {
            category
                .bytes()
                .fold(0usize, |acc, b| acc.wrapping_mul(31).wrapping_add(b as usize))
        });
    CATEGORY_COLORS[index % CATEGORY_COLORS.len()]
}

/// Bar color for a monthly margin
pub fn margin_color(margin: f64) -> &'static str {
    if margin >= 40.0 {
        COLOR_SUCCESS
    } else if margin >= 20.0 {
        COLOR_WARNING
    } else {
        COLOR_ERROR
    }
}

const TOP_PRODUCT_LABEL_CHARS: usize = 15;

// =============================================================================
// Types
// =============================================================================

/// Sales figures for one window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowSummary {
    pub revenue: f64,
    pub profit: f64,
    pub margin: f64,
    /// Completed + Paid orders
    pub orders: usize,
}

impl From<OrderStats> for WindowSummary {
    fn from(stats: OrderStats) -> Self {
        Self {
            revenue: stats.total_revenue,
            profit: stats.total_profit,
            margin: stats.avg_margin,
            orders: stats.completed_orders,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCounts {
    pub total: usize,
    pub active: usize,
    pub out_of_stock: usize,
    pub featured: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestSeller {
    pub name: String,
    pub units_sold: u32,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub today: WindowSummary,
    pub week: WindowSummary,
    pub month: WindowSummary,
    pub products: ProductCounts,
    pub best_seller: Option<BestSeller>,
}

/// Pie slice of revenue by category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    pub category: String,
    pub name: String,
    pub value: f64,
    pub profit: f64,
    pub count: usize,
    /// Whole percent of total revenue
    pub percentage: i64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProductBar {
    /// Label, truncated to 15 characters + `...`
    pub name: String,
    pub full_name: String,
    pub revenue: f64,
    pub profit: f64,
    pub units: u32,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMarginBar {
    #[serde(flatten)]
    pub month: MonthlyMargin,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentOrder {
    pub id: String,
    pub order_number: String,
    pub customer: String,
    pub product: String,
    pub amount: f64,
    pub profit: f64,
    pub status: String,
    /// e.g. "16 Oct 2026"
    pub date: String,
}

impl From<&Order> for RecentOrder {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            customer: order.customer_name.clone(),
            product: order.line.product_name.clone(),
            amount: order.total_amount,
            profit: order.profit_earned,
            status: format!("{:?}", order.order_status),
            date: order.order_date.format("%-d %b %Y").to_string(),
        }
    }
}

/// Number of products per profit band
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitDistribution {
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub loss: usize,
}

// =============================================================================
// AnalyticsService
// =============================================================================

#[derive(Debug, Clone)]
pub struct AnalyticsService {
    products: Arc<ProductStore>,
    orders: Arc<OrderStore>,
}

impl AnalyticsService {
    pub fn new(products: Arc<ProductStore>, orders: Arc<OrderStore>) -> Self {
        Self { products, orders }
    }

    pub fn get_dashboard_stats(&self) -> DashboardStats {
        let product_stats = self.products.get_stats();
        let best_seller = self
            .orders
            .get_top_products(1)
            .into_iter()
            .next()
            .map(|top| BestSeller {
                name: top.name,
                units_sold: top.units_sold,
                revenue: top.revenue,
            });

        DashboardStats {
            today: self.orders.get_today_stats().into(),
            week: self.orders.get_this_week_stats().into(),
            month: self.orders.get_this_month_stats().into(),
            products: ProductCounts {
                total: product_stats.total,
                active: product_stats.active,
                out_of_stock: product_stats.out_of_stock,
                featured: product_stats.featured,
            },
            best_seller,
        }
    }

    /// Daily revenue / profit for the trailing `days` days
    pub fn get_sales_trend_data(&self, days: u32) -> Vec<DailySales> {
        self.orders.get_daily_sales_data(days)
    }

    /// Revenue share per category, highest first
    pub fn get_category_revenue_data(&self) -> Vec<CategorySlice> {
        let rows = self.orders.get_category_revenue();
        let total: f64 = rows.iter().map(|r| r.revenue).sum();

        let mut slices: Vec<CategorySlice> = rows
            .into_iter()
            .map(|row| CategorySlice {
                name: category_display_name(&row.category),
                color: category_color(&row.category).to_string(),
                percentage: if total > 0.0 {
                    js_round(row.revenue / total * 100.0) as i64
                } else {
                    0
                },
                value: row.revenue,
                profit: row.profit,
                count: row.count,
                category: row.category,
            })
            .collect();

        slices.sort_by(|a, b| b.value.total_cmp(&a.value));
        slices
    }

    pub fn get_top_products_data(&self, limit: usize) -> Vec<TopProductBar> {
        self.orders
            .get_top_products(limit)
            .into_iter()
            .enumerate()
            .map(|(index, top)| TopProductBar {
                name: format::truncate_label(&top.name, TOP_PRODUCT_LABEL_CHARS),
                full_name: top.name,
                revenue: top.revenue,
                profit: top.profit,
                units: top.units_sold,
                color: CATEGORY_COLORS[index % CATEGORY_COLORS.len()].to_string(),
            })
            .collect()
    }

    pub fn get_monthly_margins_data(&self, months: u32) -> Vec<MonthlyMarginBar> {
        self.orders
            .get_monthly_margins(months)
            .into_iter()
            .map(|month| MonthlyMarginBar {
                color: margin_color(month.margin).to_string(),
                month,
            })
            .collect()
    }

    pub fn get_recent_orders(&self, limit: usize) -> Vec<RecentOrder> {
        self.orders
            .get_recent(limit)
            .iter()
            .map(RecentOrder::from)
            .collect()
    }

    /// Products per profit band, using the same banding as the product view
    pub fn get_profit_distribution(&self) -> ProfitDistribution {
        let mut distribution = ProfitDistribution::default();
        for product in self.products.get_all() {
            match product.profit_band() {
                ProfitBand::High => distribution.high += 1,
                ProfitBand::Medium => distribution.medium += 1,
                ProfitBand::Low => distribution.low += 1,
                ProfitBand::Loss => distribution.loss += 1,
            }
        }
        distribution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{KvStore, MemoryKvStore, keys};
    use crate::utils::{Clock, FixedClock};
    use chrono::NaiveDate;
    use shared::models::{
        OrderCreate, OrderLine, OrderStatus, PaymentStatus, ProductCreate,
    };

    fn service() -> (AnalyticsService, Arc<ProductStore>, Arc<OrderStore>) {
        let kv = Arc::new(MemoryKvStore::new());
        kv.set(keys::PRODUCTS, "[]").unwrap();
        kv.set(keys::ORDERS, "[]").unwrap();
        let clock: Arc<dyn Clock> = Arc::new(FixedClock::at(
            NaiveDate::from_ymd_opt(2026, 10, 16).unwrap(),
            12,
            0,
            0,
        ));
        let products = Arc::new(ProductStore::load(kv.clone(), clock.clone()));
        let orders = Arc::new(OrderStore::load(kv, clock, &[]));
        (
            AnalyticsService::new(products.clone(), orders.clone()),
            products,
            orders,
        )
    }

    fn sell(orders: &OrderStore, name: &str, category: &str, cost: f64, price: f64, qty: u32) {
        orders.create_order(OrderCreate {
            customer_name: "Rohan Mehta".to_string(),
            customer_email: "rohan@example.com".to_string(),
            line: OrderLine {
                product_id: name.to_lowercase(),
                product_name: name.to_string(),
                category: category.to_string(),
                provider_cost: cost,
                selling_price: price,
            },
            quantity: qty,
            order_status: Some(OrderStatus::Completed),
            payment_status: Some(PaymentStatus::Paid),
            order_date: None,
        });
    }

    #[test]
    fn test_dashboard_reflects_latest_orders() {
        let (analytics, _, orders) = service();
        let empty = analytics.get_dashboard_stats();
        assert_eq!(empty.today.revenue, 0.0);
        assert!(empty.best_seller.is_none());

        sell(&orders, "Netflix Premium", "ott", 150.0, 299.0, 2);
        let stats = analytics.get_dashboard_stats();
        assert_eq!(stats.today.revenue, 598.0);
        assert_eq!(stats.week.profit, 298.0);
        assert_eq!(stats.month.orders, 1);
        let best = stats.best_seller.unwrap();
        assert_eq!(best.name, "Netflix Premium");
        assert_eq!(best.units_sold, 2);
    }

    #[test]
    fn test_category_slices() {
        let (analytics, _, orders) = service();
        sell(&orders, "Claude Pro", "ai_tools", 300.0, 750.0, 1);
        sell(&orders, "Spotify Premium", "music", 20.0, 250.0, 1);

        let slices = analytics.get_category_revenue_data();
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].name, "AI Tools");
        assert_eq!(slices[0].percentage, 75);
        assert_eq!(slices[1].percentage, 25);
        assert_eq!(slices[0].color, category_color("ai_tools"));
        assert_ne!(slices[0].color, slices[1].color);
    }

    #[test]
    fn test_category_color_is_stable() {
        assert_eq!(category_color("ott"), "#0EA5E9");
        assert_eq!(category_color("music"), "#8B5CF6");
        assert_eq!(category_color("brand_new"), category_color("brand_new"));
        assert_eq!(category_display_name("brand_new"), "brand_new");
    }

    #[test]
    fn test_top_products_truncated() {
        let (analytics, _, orders) = service();
        sell(&orders, "YouTube Music Premium", "music", 10.0, 29.0, 1);
        let bars = analytics.get_top_products_data(10);
        assert_eq!(bars[0].name, "YouTube Music P...");
        assert_eq!(bars[0].full_name, "YouTube Music Premium");
        assert_eq!(bars[0].color, CATEGORY_COLORS[0]);
    }

    #[test]
    fn test_monthly_margin_colors() {
        let (analytics, _, orders) = service();
        sell(&orders, "Claude Pro", "ai_tools", 100.0, 130.0, 1);
        let bars = analytics.get_monthly_margins_data(3);
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2].month.margin, 30.0);
        assert_eq!(bars[2].color, COLOR_WARNING);
        assert_eq!(bars[0].color, COLOR_ERROR);
    }

    #[test]
    fn test_recent_orders_format() {
        let (analytics, _, orders) = service();
        sell(&orders, "Canva Pro", "productivity", 50.0, 99.0, 1);
        let recent = analytics.get_recent_orders(5);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].date, "16 Oct 2026");
        assert_eq!(recent[0].status, "Completed");
    }

    #[test]
    fn test_profit_distribution() {
        let (analytics, products, _) = service();
        let add = |cost: f64, price: f64| {
            products.add(ProductCreate {
                product_name: "P".to_string(),
                provider_cost: cost,
                selling_price: price,
                ..Default::default()
            });
        };
        add(100.0, 150.0);
        add(100.0, 130.0);
        add(100.0, 110.0);
        add(100.0, 90.0);

        assert_eq!(
            analytics.get_profit_distribution(),
            ProfitDistribution {
                high: 1,
                medium: 1,
                low: 1,
                loss: 1
            }
        );
    }

    #[test]
    fn test_margin_color_bounds() {
        assert_eq!(margin_color(40.0), COLOR_SUCCESS);
        assert_eq!(margin_color(20.0), COLOR_WARNING);
        assert_eq!(margin_color(19.99), COLOR_ERROR);
    }
}
