//! Order Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::Product;

/// Fulfilment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Completed,
    Processing,
    Pending,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Completed,
        OrderStatus::Processing,
        OrderStatus::Pending,
        OrderStatus::Cancelled,
    ];
}

/// Payment state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentStatus {
    Paid,
    Pending,
    Failed,
}

/// Product data copied into an order at time of sale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    #[serde(default)]
    pub product_id: String,
    pub product_name: String,
    pub category: String,
    pub provider_cost: f64,
    pub selling_price: f64,
}

impl OrderLine {
    pub fn of(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            category: product.category.clone(),
            provider_cost: product.provider_cost,
            selling_price: product.selling_price,
        }
    }
}

/// Order entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Customer-facing number: `ORD-<millis>-<n>`
    pub order_number: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(flatten)]
    pub line: OrderLine,
    pub quantity: u32,
    pub order_status: OrderStatus,
    pub payment_status: PaymentStatus,
    /// Derived: `selling_price * quantity`
    pub total_amount: f64,
    /// Derived: `(selling_price - provider_cost) * quantity`
    pub profit_earned: f64,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Only Completed + Paid orders count toward revenue and profit
    pub fn counts_toward_revenue(&self) -> bool {
        self.order_status == OrderStatus::Completed && self.payment_status == PaymentStatus::Paid
    }

    /// Provider cost of the whole line
    pub fn total_cost(&self) -> f64 {
        self.line.provider_cost * self.quantity as f64
    }

    pub fn refresh_totals(&mut self) {
        let qty = self.quantity as f64;
        self.total_amount = self.line.selling_price * qty;
        self.profit_earned = (self.line.selling_price - self.line.provider_cost) * qty;
    }
}

/// Create order payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_name: String,
    pub customer_email: String,
    pub line: OrderLine,
    pub quantity: u32,
    /// Defaults to `Processing`
    #[serde(default)]
    pub order_status: Option<OrderStatus>,
    /// Defaults to `Pending`
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Defaults to now
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
}
