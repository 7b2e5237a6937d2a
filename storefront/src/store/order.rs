//! Order Store - sales ledger and time-windowed aggregations
//!
//! Owns the `pv_admin_orders` slot. Only Completed + Paid orders count
//! toward revenue, cost, profit and rankings; every aggregation here goes
//! through [`Order::counts_toward_revenue`].
//!
//! Windows are UTC calendar days keyed on `order_date`:
//!
//! | Window | Range |
//! |--------|-------|
//! | today | today 00:00:00.000 ..= 23:59:59.999 |
//! | this week | Sunday of the current week ..= today |
//! | this month | 1st of the current month ..= today |

use chrono::{DateTime, NaiveDate, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use shared::models::{Order, OrderCreate, OrderStatus, PaymentStatus, Product};
use shared::util::round2;

use super::catalog;
use super::collection::{PersistentCollection, Subscription};
use crate::storage::{KvStore, keys};
use crate::utils::Clock;
use crate::utils::time::{
    day_end, day_start, month_end, month_start, trailing_days, trailing_months, week_start,
};

// =============================================================================
// Types
// =============================================================================

/// Aggregate over a set of orders (Completed + Paid only, except `total_orders`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderStats {
    /// Every order in the subset, whatever its status
    pub total_orders: usize,
    pub completed_orders: usize,
    pub total_revenue: f64,
    pub total_cost: f64,
    pub total_profit: f64,
    /// `total_profit / total_cost * 100`, 2 decimals, 0 when there is no cost
    pub avg_margin: f64,
}

/// One calendar day of sales
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySales {
    pub date: NaiveDate,
    /// Short display label, e.g. "16 Oct"
    pub label: String,
    pub revenue: f64,
    pub profit: f64,
    /// Completed + Paid orders that day
    pub orders: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRevenue {
    pub category: String,
    pub revenue: f64,
    pub profit: f64,
    /// Number of orders
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopProduct {
    pub name: String,
    pub category: String,
    pub revenue: f64,
    pub profit: f64,
    pub units_sold: u32,
    pub order_count: usize,
}

/// One calendar month, computed like [`OrderStats`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyMargin {
    /// `YYYY-MM`
    pub month: String,
    /// Short display label, e.g. "Oct 2026"
    pub label: String,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    pub margin: f64,
    pub orders: usize,
}

/// Ledger counters by status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total_orders: usize,
    pub today_orders: usize,
    pub month_orders: usize,
    /// Completed + Paid revenue over the whole ledger
    pub total_revenue: f64,
    pub pending_orders: usize,
    pub processing_orders: usize,
    pub completed_orders: usize,
    pub cancelled_orders: usize,
}

/// Fold a subset of orders into [`OrderStats`]
pub fn calculate_stats<'a>(orders: impl IntoIterator<Item = &'a Order>) -> OrderStats {
    let mut stats = OrderStats::default();
    for order in orders {
        stats.total_orders += 1;
        if !order.counts_toward_revenue() {
            continue;
        }
        stats.completed_orders += 1;
        stats.total_revenue += order.total_amount;
        stats.total_cost += order.total_cost();
        stats.total_profit += order.profit_earned;
    }

    stats.avg_margin = margin(stats.total_profit, stats.total_cost);
    stats.total_revenue = round2(stats.total_revenue);
    stats.total_cost = round2(stats.total_cost);
    stats.total_profit = round2(stats.total_profit);
    stats
}

fn margin(profit: f64, cost: f64) -> f64 {
    if cost > 0.0 {
        round2(profit / cost * 100.0)
    } else {
        0.0
    }
}

fn in_days(order: &Order, start: NaiveDate, end: NaiveDate) -> bool {
    let (from, to): (DateTime<Utc>, DateTime<Utc>) = (day_start(start), day_end(end));
    order.order_date >= from && order.order_date <= to
}

// =============================================================================
// OrderStore
// =============================================================================

pub struct OrderStore {
    orders: PersistentCollection<Order>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore")
            .field("orders_count", &self.orders.len())
            .finish()
    }
}

impl OrderStore {
    /// Load the ledger; an empty slot is seeded with demo orders drawn from
    /// `products`
    pub fn load(kv: Arc<dyn KvStore>, clock: Arc<dyn Clock>, products: &[Product]) -> Self {
        let now = clock.now();
        let orders =
            PersistentCollection::load(keys::ORDERS, kv, || catalog::seed_orders(products, now));
        Self { orders, clock }
    }

    // ========== Queries ==========

    /// All orders, newest `order_date` first
    pub fn get_all(&self) -> Vec<Order> {
        let mut orders = self.orders.snapshot();
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }

    pub fn get_by_id(&self, id: &str) -> Option<Order> {
        self.orders
            .read(|items| items.iter().find(|o| o.id == id).cloned())
    }

    /// Orders placed with this email (case-insensitive), newest first
    pub fn get_by_customer_email(&self, email: &str) -> Vec<Order> {
        let email = email.trim().to_lowercase();
        let mut orders: Vec<Order> = self.orders.read(|items| {
            items
                .iter()
                .filter(|o| o.customer_email.to_lowercase() == email)
                .cloned()
                .collect()
        });
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        orders
    }

    pub fn get_recent(&self, limit: usize) -> Vec<Order> {
        let mut orders = self.get_all();
        orders.truncate(limit);
        orders
    }

    /// Orders whose `order_date` falls on `start..=end` (whole days)
    pub fn get_by_date_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<Order> {
        self.orders.read(|items| {
            items
                .iter()
                .filter(|o| in_days(o, start, end))
                .cloned()
                .collect()
        })
    }

    pub fn get_today(&self) -> Vec<Order> {
        let today = self.clock.today();
        self.get_by_date_range(today, today)
    }

    /// Sunday-start week up to today
    pub fn get_this_week(&self) -> Vec<Order> {
        let today = self.clock.today();
        self.get_by_date_range(week_start(today), today)
    }

    pub fn get_this_month(&self) -> Vec<Order> {
        let today = self.clock.today();
        self.get_by_date_range(month_start(today), today)
    }

    /// See [`calculate_stats`]
    pub fn calculate_stats(subset: &[Order]) -> OrderStats {
        calculate_stats(subset)
    }

    pub fn get_today_stats(&self) -> OrderStats {
        calculate_stats(&self.get_today())
    }

    pub fn get_this_week_stats(&self) -> OrderStats {
        calculate_stats(&self.get_this_week())
    }

    pub fn get_this_month_stats(&self) -> OrderStats {
        calculate_stats(&self.get_this_month())
    }

    /// One point per day for the trailing `days` days including today,
    /// oldest first; days without sales are zero-filled
    pub fn get_daily_sales_data(&self, days: u32) -> Vec<DailySales> {
        let dates = trailing_days(self.clock.today(), days);
        let mut points: Vec<DailySales> = dates
            .iter()
            .map(|date| DailySales {
                date: *date,
                label: date.format("%-d %b").to_string(),
                revenue: 0.0,
                profit: 0.0,
                orders: 0,
            })
            .collect();

        let Some(first) = dates.first().copied() else {
            return points;
        };

        self.orders.read(|items| {
            for order in items.iter().filter(|o| o.counts_toward_revenue()) {
                let day = order.order_date.date_naive();
                let offset = (day - first).num_days();
                if offset < 0 {
                    continue;
                }
                if let Some(point) = points.get_mut(offset as usize) {
                    point.revenue += order.total_amount;
                    point.profit += order.profit_earned;
                    point.orders += 1;
                }
            }
        });

        for point in &mut points {
            point.revenue = round2(point.revenue);
            point.profit = round2(point.profit);
        }
        points
    }

    /// Revenue per category, highest first
    pub fn get_category_revenue(&self) -> Vec<CategoryRevenue> {
        let mut rows: Vec<CategoryRevenue> = Vec::new();
        self.orders.read(|items| {
            for order in items.iter().filter(|o| o.counts_toward_revenue()) {
                match rows.iter_mut().find(|r| r.category == order.line.category) {
                    Some(row) => {
                        row.revenue += order.total_amount;
                        row.profit += order.profit_earned;
                        row.count += 1;
                    }
                    None => rows.push(CategoryRevenue {
                        category: order.line.category.clone(),
                        revenue: order.total_amount,
                        profit: order.profit_earned,
                        count: 1,
                    }),
                }
            }
        });

        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        rows
    }

    /// Best sellers by revenue, grouped by product name
    pub fn get_top_products(&self, limit: usize) -> Vec<TopProduct> {
        let mut rows: Vec<TopProduct> = Vec::new();
        self.orders.read(|items| {
            for order in items.iter().filter(|o| o.counts_toward_revenue()) {
                match rows.iter_mut().find(|r| r.name == order.line.product_name) {
                    Some(row) => {
                        row.revenue += order.total_amount;
                        row.profit += order.profit_earned;
                        row.units_sold += order.quantity;
                        row.order_count += 1;
                    }
                    None => rows.push(TopProduct {
                        name: order.line.product_name.clone(),
                        category: order.line.category.clone(),
                        revenue: order.total_amount,
                        profit: order.profit_earned,
                        units_sold: order.quantity,
                        order_count: 1,
                    }),
                }
            }
        });

        rows.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
        rows.truncate(limit);
        rows
    }

    /// One point per calendar month for the trailing `months` months
    /// including the current one, oldest first
    pub fn get_monthly_margins(&self, months: u32) -> Vec<MonthlyMargin> {
        let firsts = trailing_months(self.clock.today(), months);
        self.orders.read(|items| {
            firsts
                .iter()
                .map(|first| {
                    let last = month_end(*first);
                    let stats = calculate_stats(items.iter().filter(|o| in_days(o, *first, last)));
                    MonthlyMargin {
                        month: first.format("%Y-%m").to_string(),
                        label: first.format("%b %Y").to_string(),
                        revenue: stats.total_revenue,
                        cost: stats.total_cost,
                        profit: stats.total_profit,
                        margin: stats.avg_margin,
                        orders: stats.completed_orders,
                    }
                })
                .collect()
        })
    }

    pub fn get_stats(&self) -> OrderSummary {
        let today = self.clock.today();
        let first = month_start(today);
        self.orders.read(|items| {
            let count = |status: OrderStatus| items.iter().filter(|o| o.order_status == status).count();
            OrderSummary {
                total_orders: items.len(),
                today_orders: items.iter().filter(|o| in_days(o, today, today)).count(),
                month_orders: items.iter().filter(|o| in_days(o, first, today)).count(),
                total_revenue: calculate_stats(items).total_revenue,
                pending_orders: count(OrderStatus::Pending),
                processing_orders: count(OrderStatus::Processing),
                completed_orders: count(OrderStatus::Completed),
                cancelled_orders: count(OrderStatus::Cancelled),
            }
        })
    }

    // ========== Mutations ==========

    /// Record a new order; totals are derived from the line snapshot
    pub fn create_order(&self, data: OrderCreate) -> Order {
        let now = self.clock.now();
        let mut order = Order {
            id: uuid::Uuid::new_v4().to_string(),
            order_number: format!(
                "ORD-{}-{}",
                now.timestamp_millis(),
                rand::thread_rng().gen_range(0..1000)
            ),
            customer_name: data.customer_name,
            customer_email: data.customer_email,
            line: data.line,
            quantity: data.quantity.max(1),
            order_status: data.order_status.unwrap_or(OrderStatus::Processing),
            payment_status: data.payment_status.unwrap_or(PaymentStatus::Pending),
            total_amount: 0.0,
            profit_earned: 0.0,
            order_date: data.order_date.unwrap_or(now),
            created_at: now,
            updated_at: now,
        };
        order.refresh_totals();

        let created = order.clone();
        self.orders.mutate(move |items| {
            items.insert(0, order);
            Some(())
        });

        tracing::info!(
            order_id = %created.id,
            order_number = %created.order_number,
            total = created.total_amount,
            "Order created"
        );
        created
    }

    pub fn update_order_status(&self, id: &str, status: OrderStatus) -> Option<Order> {
        let now = self.clock.now();
        let updated = self.orders.mutate(|items| {
            let order = items.iter_mut().find(|o| o.id == id)?;
            order.order_status = status;
            order.updated_at = now;
            Some(order.clone())
        });

        if updated.is_some() {
            tracing::info!(order_id = %id, status = ?status, "Order status updated");
        }
        updated
    }

    pub fn update_payment_status(&self, id: &str, status: PaymentStatus) -> Option<Order> {
        let now = self.clock.now();
        let updated = self.orders.mutate(|items| {
            let order = items.iter_mut().find(|o| o.id == id)?;
            order.payment_status = status;
            order.updated_at = now;
            Some(order.clone())
        });

        if updated.is_some() {
            tracing::info!(order_id = %id, payment_status = ?status, "Payment status updated");
        }
        updated
    }

    pub fn subscribe(&self, listener: impl Fn(&[Order]) + Send + Sync + 'static) -> Subscription {
        self.orders.subscribe(listener)
    }
}
