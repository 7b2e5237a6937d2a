//! Built-in catalog and demo seed data
//!
//! Used when the products / orders slots are empty (first start or after a
//! reset).

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;

use shared::models::{
    Order, OrderLine, OrderStatus, PaymentStatus, Product, ProductCreate, StockStatus,
};
use shared::util::{generate_sku, js_round};

/// Catalog entry as published on the storefront
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub plan: &'static str,
    pub price: f64,
    pub original_price: f64,
    pub category: &'static str,
    pub badge: Option<&'static str>,
}

const fn entry(
    id: &'static str,
    name: &'static str,
    plan: &'static str,
    price: f64,
    original_price: f64,
    category: &'static str,
    badge: Option<&'static str>,
) -> CatalogEntry {
    CatalogEntry {
        id,
        name,
        plan,
        price,
        original_price,
        category,
        badge,
    }
}

pub const CATALOG: &[CatalogEntry] = &[
    // OTT & streaming
    entry("yt-premium-1m", "YouTube Premium", "1 Month", 29.0, 139.0, "ott", Some("Best Seller")),
    entry("yt-premium-3m", "YouTube Premium", "3 Months", 79.0, 417.0, "ott", None),
    entry("yt-premium-12m", "YouTube Premium", "12 Months", 279.0, 1668.0, "ott", Some("Best Value")),
    entry("prime-video-1m", "Prime Video (Mobile)", "1 Month", 49.0, 149.0, "ott", None),
    entry("hotstar-super", "Hotstar Super (4K)", "1 Year", 299.0, 899.0, "ott", Some("Popular")),
    entry("sonyliv-12m", "SonyLIV Premium", "12 Months", 399.0, 999.0, "ott", None),
    entry("zee5-premium", "Zee5 Premium", "1 Year", 299.0, 999.0, "ott", None),
    entry("netflix-1screen", "Netflix Premium", "1 Screen", 99.0, 199.0, "ott", Some("Hot")),
    entry("netflix-4screen", "Netflix Premium", "4 Screens (UHD)", 199.0, 649.0, "ott", None),
    entry("jiocinema-premium", "JioCinema Premium", "1 Year", 299.0, 999.0, "ott", None),
    // Music
    entry("spotify-1m", "Spotify Premium", "1 Month", 49.0, 119.0, "music", Some("Popular")),
    entry("spotify-3m", "Spotify Premium", "3 Months", 129.0, 357.0, "music", None),
    entry("spotify-12m", "Spotify Premium", "12 Months", 449.0, 1428.0, "music", Some("Best Value")),
    entry("ytmusic-1m", "YouTube Music Premium", "1 Month", 29.0, 99.0, "music", None),
    // Software keys
    entry("office-365-1y", "Office 365", "1 Year (1 Device)", 249.0, 4899.0, "software_keys", Some("Best Seller")),
    entry("office-2021-pro", "Office 2021 Professional Plus", "Lifetime", 499.0, 24999.0, "software_keys", Some("Lifetime")),
    entry("office-2024-home", "Office 2024 Home & Business", "Lifetime", 599.0, 25999.0, "software_keys", Some("New")),
    entry("win10-pro", "Windows 10 Pro", "Lifetime", 299.0, 14999.0, "software_keys", None),
    entry("win11-pro", "Windows 11 Pro", "Lifetime", 399.0, 14999.0, "software_keys", Some("Popular")),
    entry("win11-home", "Windows 11 Home", "Lifetime", 299.0, 9999.0, "software_keys", None),
    entry("adobe-acrobat", "Adobe Acrobat Pro 2024", "Lifetime", 499.0, 23999.0, "software_keys", None),
    // Editing
    entry("adobe-cc", "Adobe Creative Cloud", "1 Year", 999.0, 54000.0, "editing", Some("Pro")),
    entry("adobe-photoshop", "Adobe Photoshop", "1 Year", 599.0, 26880.0, "editing", None),
    entry("coreldraw-lifetime", "CorelDRAW Suite 2024", "Lifetime", 599.0, 54999.0, "editing", None),
    entry("vegas-pro", "Vegas Pro 21", "Lifetime", 499.0, 39999.0, "editing", None),
    // AI tools
    entry("chatgpt-1m", "ChatGPT Plus", "1 Month (Shared)", 299.0, 1650.0, "ai_tools", Some("Hot")),
    entry("chatgpt-own", "ChatGPT Plus", "1 Month (Own Account)", 999.0, 1650.0, "ai_tools", None),
    entry("claude-1m", "Claude Pro", "1 Month", 499.0, 1650.0, "ai_tools", None),
    entry("perplexity-1m", "Perplexity Pro", "1 Month", 399.0, 1650.0, "ai_tools", None),
    entry("midjourney-1m", "Midjourney", "1 Month", 599.0, 2500.0, "ai_tools", None),
    entry("gemini-1m", "Google Gemini Advanced", "1 Month", 399.0, 1650.0, "ai_tools", Some("New")),
    // Productivity
    entry("canva-1m", "Canva Pro", "1 Month", 99.0, 499.0, "productivity", Some("Popular")),
    entry("canva-12m", "Canva Pro", "12 Months", 799.0, 5988.0, "productivity", Some("Best Value")),
    entry("grammarly-1m", "Grammarly Premium", "1 Month", 199.0, 999.0, "productivity", None),
    entry("notion-1m", "Notion Plus", "1 Month", 99.0, 850.0, "productivity", None),
    // VPN
    entry("nordvpn-1m", "NordVPN", "1 Month", 99.0, 799.0, "vpn", None),
    entry("nordvpn-12m", "NordVPN", "12 Months", 499.0, 4699.0, "vpn", Some("Best Value")),
    entry("expressvpn-1m", "ExpressVPN", "1 Month", 149.0, 999.0, "vpn", None),
    // Security
    entry("malwarebytes-12m", "Malwarebytes Premium", "12 Months", 199.0, 1299.0, "antivirus", None),
    entry("iobit-lifetime", "IObit Malware Fighter Pro", "Lifetime", 149.0, 1999.0, "antivirus", None),
    // Cloud
    entry("google-one-100gb", "Google One", "100GB - 1 Year", 299.0, 1300.0, "cloud", None),
    entry("google-one-2tb", "Google One", "2TB - 1 Year", 999.0, 6500.0, "cloud", Some("Popular")),
    entry("onedrive-1tb", "OneDrive", "1TB - 1 Year", 399.0, 4199.0, "cloud", None),
    // Gaming
    entry("xbox-gamepass-1m", "Xbox Game Pass Ultimate", "1 Month", 199.0, 699.0, "gaming", Some("Hot")),
    entry("psplus-1m", "PlayStation Plus Essential", "1 Month", 149.0, 499.0, "gaming", None),
    entry("steam-wallet", "Steam Wallet", "₹500 Code", 475.0, 500.0, "gaming", None),
    // Education
    entry("coursera-1m", "Coursera Plus", "1 Month", 299.0, 4000.0, "education", None),
    entry("linkedin-1m", "LinkedIn Learning", "1 Month", 199.0, 1999.0, "education", None),
    entry("skillshare-12m", "Skillshare Premium", "12 Months", 499.0, 8400.0, "education", Some("Best Value")),
];

const WHATSAPP_CONTACT: &str = "+91 98765 43210";
const WEBSITE_CONTACT: &str = "https://example-provider.com";

/// Admin products for the built-in catalog.
///
/// Provider cost is a random 40–70% of the selling price (rounded to whole
/// rupees); providers rotate over five names.
pub fn seed_products(now: DateTime<Utc>) -> Vec<Product> {
    let mut rng = rand::thread_rng();
    let now_ms = now.timestamp_millis();

    CATALOG
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let ratio = rng.gen_range(0.4..0.7);
            let provider_cost = js_round(item.price * ratio);
            let whatsapp = rng.gen_bool(0.5);

            let data = ProductCreate {
                sku: None,
                product_name: item.name.to_string(),
                category: item.category.to_string(),
                validity: item.plan.to_string(),
                description: format!("Premium {} subscription - {}", item.name, item.plan),
                image_url: String::new(),
                provider_name: format!("Provider {}", (index % 5) + 1),
                provider_contact: (if whatsapp { WHATSAPP_CONTACT } else { WEBSITE_CONTACT })
                    .to_string(),
                provider_source: (if whatsapp { "WhatsApp" } else { "Website" }).to_string(),
                provider_cost,
                selling_price: item.price,
                original_price: item.original_price,
                stock_status: StockStatus::InStock,
                is_active: true,
                is_featured: item.badge.is_some(),
                badge: item.badge.map(str::to_string),
            };
            Product::from_create(item.id.to_string(), generate_sku(now_ms), data, now)
        })
        .collect()
}

const CUSTOMER_NAMES: &[&str] = &[
    "Aarav Sharma",
    "Priya Patel",
    "Rohan Mehta",
    "Ananya Iyer",
    "Vikram Singh",
    "Sneha Reddy",
    "Arjun Nair",
    "Kavya Gupta",
    "Ishaan Verma",
    "Meera Joshi",
    "Aditya Rao",
    "Diya Kapoor",
];

/// Synthesize 80–120 demo orders spread over the trailing 30 days.
///
/// Status and payment are drawn at random, except that Completed orders are
/// always Paid. Returned newest first.
pub fn seed_orders(products: &[Product], now: DateTime<Utc>) -> Vec<Order> {
    if products.is_empty() {
        return Vec::new();
    }

    let mut rng = rand::thread_rng();
    let count = rng.gen_range(80..=120);
    let mut orders: Vec<Order> = (0..count)
        .filter_map(|_| {
            let product = products.choose(&mut rng)?;
            let customer = CUSTOMER_NAMES.choose(&mut rng)?;

            let order_status = match rng.gen_range(0..10) {
                0..=5 => OrderStatus::Completed,
                6 | 7 => OrderStatus::Processing,
                8 => OrderStatus::Pending,
                _ => OrderStatus::Cancelled,
            };
            let payment_status = match order_status {
                OrderStatus::Completed => PaymentStatus::Paid,
                OrderStatus::Cancelled => PaymentStatus::Failed,
                _ => {
                    if rng.gen_bool(0.5) {
                        PaymentStatus::Paid
                    } else {
                        PaymentStatus::Pending
                    }
                }
            };

            let order_date = now
                - Duration::days(rng.gen_range(0..30))
                - Duration::minutes(rng.gen_range(0..24 * 60));
            let quantity = rng.gen_range(1..=3);

            let mut order = Order {
                id: uuid::Uuid::new_v4().to_string(),
                order_number: format!(
                    "ORD-{}-{}",
                    order_date.timestamp_millis(),
                    rng.gen_range(0..1000)
                ),
                customer_name: customer.to_string(),
                customer_email: format!(
                    "{}@example.com",
                    customer.to_lowercase().replace(' ', ".")
                ),
                line: OrderLine::of(product),
                quantity,
                order_status,
                payment_status,
                total_amount: 0.0,
                profit_earned: 0.0,
                order_date,
                created_at: order_date,
                updated_at: order_date,
            };
            order.refresh_totals();
            Some(order)
        })
        .collect();

    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
    orders
}
