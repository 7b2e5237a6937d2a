//! Product Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::util::round2;

/// Stock availability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    #[default]
    InStock,
    OutOfStock,
    Limited,
}

impl StockStatus {
    /// Human-readable label (used by spreadsheet export)
    pub fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::OutOfStock => "Out of Stock",
            Self::Limited => "Limited",
        }
    }

    /// Parse a label or snake_case value ("In Stock", "out_of_stock", ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().replace(' ', "_").as_str() {
            "in_stock" => Some(Self::InStock),
            "out_of_stock" => Some(Self::OutOfStock),
            "limited" => Some(Self::Limited),
            _ => None,
        }
    }
}

/// Profit band of a margin percentage.
///
/// `< 0` loss, `< 20` low, `< 40` medium, otherwise high. The same banding
/// drives display colors and the profit distribution report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfitBand {
    Loss,
    Low,
    Medium,
    High,
}

impl ProfitBand {
    pub fn from_percentage(profit_percentage: f64) -> Self {
        if profit_percentage < 0.0 {
            Self::Loss
        } else if profit_percentage < 20.0 {
            Self::Low
        } else if profit_percentage < 40.0 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Display color token
    pub fn color(&self) -> &'static str {
        match self {
            Self::Loss => "error",
            Self::Low => "warning",
            Self::Medium => "yellow",
            Self::High => "success",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Loss => "Loss",
            Self::Low => "Low Margin",
            Self::Medium => "Medium",
            Self::High => "Profitable",
        }
    }
}

/// Profit derived from a provider cost and a selling price
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Profit {
    pub amount: f64,
    pub percentage: f64,
}

/// `amount = price - cost`, `percentage = amount / cost * 100` (0 when cost is 0),
/// both rounded to 2 decimals.
pub fn calculate_profit(provider_cost: f64, selling_price: f64) -> Profit {
    let amount = selling_price - provider_cost;
    let percentage = if provider_cost > 0.0 {
        amount / provider_cost * 100.0
    } else {
        0.0
    };
    Profit {
        amount: round2(amount),
        percentage: round2(percentage),
    }
}

/// Product entity (admin view, includes provider and cost fields)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    /// Stock-keeping code, unique within the store
    pub sku: String,
    pub product_name: String,
    /// Category tag (e.g. "ott", "ai_tools")
    pub category: String,
    /// Plan label (e.g. "1 Month")
    pub validity: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub provider_name: String,
    #[serde(default)]
    pub provider_contact: String,
    #[serde(default)]
    pub provider_source: String,
    pub provider_cost: f64,
    pub selling_price: f64,
    /// MRP shown struck through on the storefront
    #[serde(default)]
    pub original_price: f64,
    /// Derived: `selling_price - provider_cost`
    pub profit_amount: f64,
    /// Derived: margin over cost in percent
    pub profit_percentage: f64,
    #[serde(default)]
    pub stock_status: StockStatus,
    pub is_active: bool,
    pub is_featured: bool,
    #[serde(default)]
    pub badge: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product from a create payload, deriving profit fields
    pub fn from_create(id: String, sku: String, data: ProductCreate, now: DateTime<Utc>) -> Self {
        let profit = calculate_profit(data.provider_cost, data.selling_price);
        Self {
            id,
            sku,
            product_name: data.product_name,
            category: data.category,
            validity: data.validity,
            description: data.description,
            image_url: data.image_url,
            provider_name: data.provider_name,
            provider_contact: data.provider_contact,
            provider_source: data.provider_source,
            provider_cost: data.provider_cost,
            selling_price: data.selling_price,
            original_price: data.original_price,
            profit_amount: profit.amount,
            profit_percentage: profit.percentage,
            stock_status: data.stock_status,
            is_active: data.is_active,
            is_featured: data.is_featured,
            badge: data.badge,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge a patch, then re-derive profit from the resulting cost/price
    pub fn apply_update(&mut self, patch: ProductUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.sku {
            self.sku = v;
        }
        if let Some(v) = patch.product_name {
            self.product_name = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.validity {
            self.validity = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.image_url {
            self.image_url = v;
        }
        if let Some(v) = patch.provider_name {
            self.provider_name = v;
        }
        if let Some(v) = patch.provider_contact {
            self.provider_contact = v;
        }
        if let Some(v) = patch.provider_source {
            self.provider_source = v;
        }
        if let Some(v) = patch.provider_cost {
            self.provider_cost = v;
        }
        if let Some(v) = patch.selling_price {
            self.selling_price = v;
        }
        if let Some(v) = patch.original_price {
            self.original_price = v;
        }
        if let Some(v) = patch.stock_status {
            self.stock_status = v;
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
        if let Some(v) = patch.is_featured {
            self.is_featured = v;
        }
        if let Some(v) = patch.badge {
            self.badge = v;
        }
        self.refresh_profit();
        self.updated_at = now;
    }

    /// Recompute derived profit fields from current cost/price
    pub fn refresh_profit(&mut self) {
        let profit = calculate_profit(self.provider_cost, self.selling_price);
        self.profit_amount = profit.amount;
        self.profit_percentage = profit.percentage;
    }

    pub fn profit_band(&self) -> ProfitBand {
        ProfitBand::from_percentage(self.profit_percentage)
    }

    /// Storefront projection without provider identity, cost or profit
    pub fn to_public(&self) -> PublicProduct {
        PublicProduct {
            id: self.id.clone(),
            name: self.product_name.clone(),
            category: self.category.clone(),
            plan: self.validity.clone(),
            description: self.description.clone(),
            logo: self.image_url.clone(),
            price: self.selling_price,
            original_price: self.original_price,
            stock_status: self.stock_status,
            is_featured: self.is_featured,
            badge: self.badge.clone(),
        }
    }
}

/// Published product view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicProduct {
    pub id: String,
    pub name: String,
    pub category: String,
    pub plan: String,
    pub description: String,
    pub logo: String,
    pub price: f64,
    #[serde(rename = "originalPrice")]
    pub original_price: f64,
    pub stock_status: StockStatus,
    pub is_featured: bool,
    pub badge: Option<String>,
}

/// Create product payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductCreate {
    /// Generated when absent
    pub sku: Option<String>,
    pub product_name: String,
    pub category: String,
    pub validity: String,
    pub description: String,
    pub image_url: String,
    pub provider_name: String,
    pub provider_contact: String,
    pub provider_source: String,
    pub provider_cost: f64,
    pub selling_price: f64,
    pub original_price: f64,
    pub stock_status: StockStatus,
    pub is_active: bool,
    pub is_featured: bool,
    pub badge: Option<String>,
}

impl Default for ProductCreate {
    fn default() -> Self {
        Self {
            sku: None,
            product_name: String::new(),
            category: "other".to_string(),
            validity: "1 Month".to_string(),
            description: String::new(),
            image_url: String::new(),
            provider_name: String::new(),
            provider_contact: String::new(),
            provider_source: String::new(),
            provider_cost: 0.0,
            selling_price: 0.0,
            original_price: 0.0,
            stock_status: StockStatus::InStock,
            is_active: true,
            is_featured: false,
            badge: None,
        }
    }
}

/// Update product payload (every field optional)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductUpdate {
    pub sku: Option<String>,
    pub product_name: Option<String>,
    pub category: Option<String>,
    pub validity: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub provider_name: Option<String>,
    pub provider_contact: Option<String>,
    pub provider_source: Option<String>,
    pub provider_cost: Option<f64>,
    pub selling_price: Option<f64>,
    pub original_price: Option<f64>,
    pub stock_status: Option<StockStatus>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    /// `Some(None)` clears the badge
    pub badge: Option<Option<String>>,
}
