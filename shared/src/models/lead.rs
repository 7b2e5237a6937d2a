//! Customer Lead Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// First customer id ever issued
pub const CUSTOMER_ID_BASE: u64 = 2_024_001;

/// How the customer signed up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    #[default]
    Email,
    Google,
}

impl AuthProvider {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Google => "Google",
        }
    }
}

/// Registered customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lead {
    /// Sequential, never reused
    pub customer_id: u64,
    pub name: String,
    /// Upsert key (case-insensitive)
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default = "default_country_code")]
    pub country_code: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub pincode: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub auth_provider: AuthProvider,
    #[serde(default)]
    pub google_id: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    #[serde(default)]
    pub is_address_complete: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn default_country_code() -> String {
    "+91".to_string()
}

fn default_country() -> String {
    "India".to_string()
}

impl Lead {
    pub fn from_create(customer_id: u64, data: LeadCreate, now: DateTime<Utc>) -> Self {
        Self {
            customer_id,
            name: data.name,
            email: data.email,
            phone: data.phone.unwrap_or_default(),
            country_code: data.country_code.unwrap_or_else(default_country_code),
            street: data.street.unwrap_or_default(),
            city: data.city.unwrap_or_default(),
            state: data.state.unwrap_or_default(),
            pincode: data.pincode.unwrap_or_default(),
            country: data.country.unwrap_or_else(default_country),
            auth_provider: data.auth_provider.unwrap_or_default(),
            google_id: data.google_id,
            picture: data.picture,
            is_address_complete: data.is_address_complete.unwrap_or(false),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn matches_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }

    /// Merge a patch and refresh `updated_at`
    pub fn apply_update(&mut self, patch: LeadUpdate, now: DateTime<Utc>) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.email {
            self.email = v;
        }
        if let Some(v) = patch.phone {
            self.phone = v;
        }
        if let Some(v) = patch.country_code {
            self.country_code = v;
        }
        if let Some(v) = patch.street {
            self.street = v;
        }
        if let Some(v) = patch.city {
            self.city = v;
        }
        if let Some(v) = patch.state {
            self.state = v;
        }
        if let Some(v) = patch.pincode {
            self.pincode = v;
        }
        if let Some(v) = patch.country {
            self.country = v;
        }
        if let Some(v) = patch.auth_provider {
            self.auth_provider = v;
        }
        if let Some(v) = patch.google_id {
            self.google_id = Some(v);
        }
        if let Some(v) = patch.picture {
            self.picture = Some(v);
        }
        if let Some(v) = patch.is_address_complete {
            self.is_address_complete = v;
        }
        self.updated_at = now;
    }
}

/// Signup payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadCreate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub auth_provider: Option<AuthProvider>,
    pub google_id: Option<String>,
    pub picture: Option<String>,
    pub is_address_complete: Option<bool>,
}

/// Update lead payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub country_code: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub auth_provider: Option<AuthProvider>,
    pub google_id: Option<String>,
    pub picture: Option<String>,
    pub is_address_complete: Option<bool>,
}

/// A repeated signup refreshes the existing record; the email (identity key)
/// keeps its original spelling.
impl From<LeadCreate> for LeadUpdate {
    fn from(data: LeadCreate) -> Self {
        Self {
            name: Some(data.name).filter(|n| !n.is_empty()),
            email: None,
            phone: data.phone,
            country_code: data.country_code,
            street: data.street,
            city: data.city,
            state: data.state,
            pincode: data.pincode,
            country: data.country,
            auth_provider: data.auth_provider,
            google_id: data.google_id,
            picture: data.picture,
            is_address_complete: data.is_address_complete,
        }
    }
}
