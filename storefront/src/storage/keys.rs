//! Slot names
//!
//! These are an on-disk contract shared with existing installations; do not
//! rename them.

pub const PRODUCTS: &str = "pv_admin_products";
pub const ORDERS: &str = "pv_admin_orders";
/// Reserved, nothing reads or writes it
pub const DAILY_SALES: &str = "pv_daily_sales";
pub const DEALS: &str = "premiumverse_deals";
pub const LEADS: &str = "premiumverse_leads";
pub const LAST_CUSTOMER_ID: &str = "premiumverse_last_customer_id";
