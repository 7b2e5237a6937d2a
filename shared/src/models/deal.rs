//! Deal Model

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::product::Product;
use crate::util::{format_amount, js_round};

/// Product data copied into a deal when it is created.
///
/// Never re-synced: later edits to the product do not touch existing deals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub product_id: String,
    pub product_name: String,
    #[serde(default)]
    pub product_image: String,
    #[serde(default)]
    pub category: String,
    /// Selling price of the product at snapshot time
    pub original_price: f64,
}

impl ProductSnapshot {
    pub fn of(product: &Product) -> Self {
        Self {
            product_id: product.id.clone(),
            product_name: product.product_name.clone(),
            product_image: product.image_url.clone(),
            category: product.category.clone(),
            original_price: product.selling_price,
        }
    }
}

/// Time-bounded promotion on a single product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    pub id: i64,
    #[serde(flatten)]
    pub product: ProductSnapshot,
    /// 0 is a valid "free" price
    pub deal_price: f64,
    /// Cart total required to unlock the deal; 0 means unconditional
    #[serde(default)]
    pub min_purchase_amount: f64,
    #[serde(default)]
    pub description: String,
    /// Inclusive
    pub start_date: NaiveDate,
    /// Inclusive
    pub end_date: NaiveDate,
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
}

/// Savings of a deal against the snapshot price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DealSavings {
    pub savings: f64,
    /// Whole percent, rounded
    pub percentage: i64,
}

impl Deal {
    /// `is_active && start_date <= today <= end_date`
    pub fn is_live_on(&self, today: NaiveDate) -> bool {
        self.is_active && self.start_date <= today && today <= self.end_date
    }

    pub fn is_free(&self) -> bool {
        self.deal_price == 0.0
    }

    pub fn savings(&self) -> DealSavings {
        let original = self.product.original_price;
        let savings = original - self.deal_price;
        let percentage = if original > 0.0 {
            js_round(savings / original * 100.0) as i64
        } else {
            0
        };
        DealSavings {
            savings,
            percentage,
        }
    }

    /// Last instant of `end_date` (23:59:59.999 UTC)
    pub fn ends_at(&self) -> DateTime<Utc> {
        let next_day = self.end_date.succ_opt().unwrap_or(self.end_date);
        next_day.and_time(chrono::NaiveTime::MIN).and_utc() - Duration::milliseconds(1)
    }

    /// True iff `0 < ends_at - now <= 24h`
    pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
        let remaining = self.ends_at() - now;
        remaining > Duration::zero() && remaining <= Duration::hours(24)
    }

    /// Unlock message, or `None` for unconditional deals
    pub fn condition_text(&self) -> Option<String> {
        if self.min_purchase_amount <= 0.0 {
            return None;
        }
        Some(format!(
            "🛒 Shop ₹{}+ to unlock",
            format_amount(self.min_purchase_amount)
        ))
    }

    pub fn apply_update(&mut self, patch: DealUpdate) {
        if let Some(v) = patch.product {
            self.product = v;
        }
        if let Some(v) = patch.deal_price {
            self.deal_price = v;
        }
        if let Some(v) = patch.min_purchase_amount {
            self.min_purchase_amount = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.start_date {
            self.start_date = v;
        }
        if let Some(v) = patch.end_date {
            self.end_date = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
        if let Some(v) = patch.is_featured {
            self.is_featured = v;
        }
    }
}

/// Create deal payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealCreate {
    pub product: ProductSnapshot,
    pub deal_price: f64,
    #[serde(default)]
    pub min_purchase_amount: f64,
    /// Defaults to "Get <product> at special price!"
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

/// Update deal payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DealUpdate {
    pub product: Option<ProductSnapshot>,
    pub deal_price: Option<f64>,
    pub min_purchase_amount: Option<f64>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn deal(original: f64, price: f64) -> Deal {
        Deal {
            id: 1,
            product: ProductSnapshot {
                product_id: "spotify-1m".to_string(),
                product_name: "Spotify Premium".to_string(),
                product_image: String::new(),
                category: "music".to_string(),
                original_price: original,
            },
            deal_price: price,
            min_purchase_amount: 0.0,
            description: String::new(),
            start_date: date("2026-10-16"),
            end_date: date("2026-10-16"),
            is_active: true,
            is_featured: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_free_deal_savings() {
        let d = deal(200.0, 0.0);
        let s = d.savings();
        assert_eq!(s.savings, 200.0);
        assert_eq!(s.percentage, 100);
        assert!(d.is_free());
    }

    #[test]
    fn test_price_above_original_rounds_tie_up() {
        // -12.5% sits on a tie
        let s = deal(200.0, 225.0).savings();
        assert_eq!(s.savings, -25.0);
        assert_eq!(s.percentage, -12);
    }

    #[test]
    fn test_zero_original_price_guard() {
        let s = deal(0.0, 0.0).savings();
        assert_eq!(s.percentage, 0);
    }

    #[test]
    fn test_single_day_window() {
        let d = deal(200.0, 99.0);
        assert!(d.is_live_on(date("2026-10-16")));
        assert!(!d.is_live_on(date("2026-10-17")));
        assert!(!d.is_live_on(date("2026-10-15")));
    }

    #[test]
    fn test_inactive_deal_never_live() {
        let mut d = deal(200.0, 99.0);
        d.is_active = false;
        assert!(!d.is_live_on(date("2026-10-16")));
    }

    #[test]
    fn test_expiring_soon_uses_end_of_day() {
        let d = deal(200.0, 99.0);
        let morning = date("2026-10-16").and_hms_opt(9, 0, 0).unwrap().and_utc();
        assert!(d.is_expiring_soon(morning));

        let day_before = date("2026-10-15").and_hms_opt(9, 0, 0).unwrap().and_utc();
        assert!(!d.is_expiring_soon(day_before));

        let after = date("2026-10-17").and_hms_opt(0, 0, 1).unwrap().and_utc();
        assert!(!d.is_expiring_soon(after));
    }

    #[test]
    fn test_condition_text() {
        let mut d = deal(200.0, 99.0);
        assert_eq!(d.condition_text(), None);
        d.min_purchase_amount = 499.0;
        assert_eq!(d.condition_text().as_deref(), Some("🛒 Shop ₹499+ to unlock"));
    }

    #[test]
    fn test_flat_json_shape() {
        let json = serde_json::to_value(deal(200.0, 99.0)).unwrap();
        assert_eq!(json["product_name"], "Spotify Premium");
        assert_eq!(json["start_date"], "2026-10-16");
        assert!(json.get("product").is_none());
    }
}
