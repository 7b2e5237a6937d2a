//! End-to-end flows through AppContext
//!
//! Stores share one redb file under a temp dir; reopening the context
//! checks what actually reached disk.

use chrono::NaiveDate;
use shared::error::{AppError, AppResult};
use shared::models::{
    DealCreate, Lead, LeadCreate, OrderCreate, OrderLine, OrderStatus, PaymentStatus,
    ProductCreate, ProductSnapshot, ProductUpdate,
};
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use storefront::export::sheet::read_sheet;
use storefront::notify::SignupNotifier;
use storefront::utils::FixedClock;
use storefront::storage::keys;
use storefront::{AppContext, KvStore, MemoryKvStore, RedbKvStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

fn open(dir: &Path, clock: &FixedClock) -> AppContext {
    let kv = RedbKvStore::open(dir.join("storefront.redb")).unwrap();
    AppContext::with_kv(Arc::new(kv), Arc::new(clock.clone()))
}

fn signup(name: &str, email: &str) -> LeadCreate {
    LeadCreate {
        name: name.to_string(),
        email: email.to_string(),
        ..Default::default()
    }
}

struct FailingNotifier {
    calls: AtomicUsize,
}

impl SignupNotifier for FailingNotifier {
    fn send_welcome(&self, _lead: &Lead) -> AppResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(AppError::internal("smtp down"))
    }
}

#[test]
fn test_state_survives_reopen() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FixedClock::at(today(), 10, 0, 0);

    let (product_id, seeded_orders) = {
        let ctx = open(tmp.path(), &clock);
        let product = ctx.products.add(ProductCreate {
            product_name: "Netflix Premium".to_string(),
            category: "ott".to_string(),
            provider_name: "Provider 1".to_string(),
            provider_cost: 150.0,
            selling_price: 299.0,
            ..Default::default()
        });
        ctx.register_customer(signup("Aarav", "aarav@example.com"));
        ctx.register_customer(signup("Diya", "diya@example.com"));
        (product.id, ctx.orders.get_all().len())
    };

    let ctx = open(tmp.path(), &clock);
    let product = ctx.products.get_by_id(&product_id).unwrap();
    assert_eq!(product.profit_amount, 149.0);
    assert_eq!(product.profit_percentage, 99.33);
    // Seed is written once, not regenerated
    assert_eq!(ctx.orders.get_all().len(), seeded_orders);
    assert_eq!(ctx.leads.total_count(), 2);

    let next = ctx.register_customer(signup("Kabir", "kabir@example.com"));
    assert_eq!(next.customer_id, 2_024_003);
}

#[test]
fn test_signup_upsert_and_failing_notifier() {
    let clock = FixedClock::at(today(), 10, 0, 0);
    let notifier = Arc::new(FailingNotifier {
        calls: AtomicUsize::new(0),
    });
    let ctx = AppContext::with_kv(Arc::new(MemoryKvStore::new()), Arc::new(clock))
        .with_notifier(notifier.clone());

    let first = ctx.register_customer(signup("Priya", "priya@example.com"));
    let again = ctx.register_customer(LeadCreate {
        city: Some("Mumbai".to_string()),
        ..signup("Priya Shah", "Priya@Example.com")
    });

    assert_eq!(first.customer_id, 2_024_001);
    assert_eq!(again.customer_id, first.customer_id);
    assert_eq!(ctx.leads.total_count(), 1);
    assert_eq!(ctx.leads.get_by_email("priya@example.com").unwrap().city, "Mumbai");
    assert_eq!(notifier.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_order_lifecycle_moves_dashboard() {
    let clock = FixedClock::at(today(), 10, 0, 0);
    let kv = Arc::new(MemoryKvStore::new());
    kv.set(keys::ORDERS, "[]").unwrap();
    let ctx = AppContext::with_kv(kv, Arc::new(clock));

    let seen = Arc::new(AtomicUsize::new(0));
    let counter = seen.clone();
    let _sub = ctx.orders.subscribe(move |orders| {
        counter.store(orders.len(), Ordering::SeqCst);
    });

    let product = ctx.products.get_all()[0].clone();
    let order = ctx.orders.create_order(OrderCreate {
        customer_name: "Rohan".to_string(),
        customer_email: "rohan@example.com".to_string(),
        line: OrderLine::of(&product),
        quantity: 2,
        order_status: None,
        payment_status: None,
        order_date: None,
    });
    assert_eq!(seen.load(Ordering::SeqCst), 1);
    assert_eq!(ctx.analytics.get_dashboard_stats().today.revenue, 0.0);

    ctx.orders
        .update_order_status(&order.id, OrderStatus::Completed)
        .unwrap();
    // Completed but unpaid still contributes nothing
    assert_eq!(ctx.analytics.get_dashboard_stats().today.revenue, 0.0);

    ctx.orders
        .update_payment_status(&order.id, PaymentStatus::Paid)
        .unwrap();
    let stats = ctx.analytics.get_dashboard_stats();
    assert_eq!(stats.today.revenue, order.total_amount);
    assert_eq!(stats.today.orders, 1);
    assert_eq!(stats.best_seller.unwrap().name, product.product_name);
    assert_eq!(ctx.analytics.get_sales_trend_data(7).len(), 7);
}

#[test]
fn test_deal_snapshot_is_not_resynced() {
    let clock = FixedClock::at(today(), 10, 0, 0);
    let ctx = AppContext::with_kv(Arc::new(MemoryKvStore::new()), Arc::new(clock));

    let product = ctx.products.get_all()[0].clone();
    let deal = ctx.deals.add(DealCreate {
        product: ProductSnapshot::of(&product),
        deal_price: 0.0,
        min_purchase_amount: 0.0,
        description: None,
        start_date: today(),
        end_date: today(),
        is_active: true,
        is_featured: true,
    });

    ctx.products.update(
        &product.id,
        ProductUpdate {
            product_name: Some("Renamed".to_string()),
            selling_price: Some(1.0),
            ..Default::default()
        },
    );

    let stored = ctx.deals.get_by_id(deal.id).unwrap();
    assert_eq!(stored.product.product_name, product.product_name);
    assert_eq!(stored.product.original_price, product.selling_price);
    assert!(stored.is_free());
    assert_eq!(ctx.deals.get_featured().len(), 1);
}

#[test]
fn test_export_and_import_files() {
    let tmp = tempfile::tempdir().unwrap();
    let clock = FixedClock::at(today(), 10, 0, 0);
    let ctx = AppContext::with_kv(Arc::new(MemoryKvStore::new()), Arc::new(clock))
        .with_export_dir(tmp.path().join("exports"));
    ctx.register_customer(signup("Aarav", "aarav@example.com"));

    let products_path = ctx.export_products().unwrap();
    let leads_path = ctx.export_leads().unwrap();
    assert!(products_path.ends_with("products_export_2026-10-16.csv"));
    assert!(leads_path.ends_with("PremiumVerse_Leads_2026-10-16.csv"));
    assert!(
        std::fs::read_to_string(&leads_path)
            .unwrap()
            .contains("aarav@example.com")
    );

    let before = ctx.products.get_all().len();
    let outcome = ctx.import_products(
        "Product Name,Provider Name,Provider Cost (₹),Selling Price (₹)\n\
         Notion Plus,Provider 4,120,299\n\
         Broken,,0,0\n",
    )
    .unwrap();
    assert_eq!(outcome.valid.len(), 1);
    assert_eq!(outcome.rejected[0].row, 3);
    assert_eq!(ctx.products.get_all().len(), before + 1);
    assert_eq!(ctx.products.get_all()[0].product_name, "Notion Plus");

    // Profit % is exported as the raw number
    let exported = std::fs::read_to_string(&products_path).unwrap();
    assert!(exported.starts_with('\u{feff}'));
    let sheet = read_sheet(&exported).unwrap();
    let profit = sheet.column("Profit %").unwrap();
    assert!(sheet.rows.iter().all(|row| row[profit].parse::<f64>().is_ok()));
}
