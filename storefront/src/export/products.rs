//! Product spreadsheet export / import

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Product, ProductCreate, StockStatus};
use shared::util::format_amount;

use super::sheet::{SheetWriter, read_sheet};
use super::{timestamp_label, yes_no};

/// Column order of the product sheet
pub const PRODUCT_HEADERS: [&str; 16] = [
    "SKU",
    "Product Name",
    "Category",
    "Validity",
    "Provider Name",
    "Provider Cost (₹)",
    "Selling Price (₹)",
    "Original Price (₹)",
    "Profit (₹)",
    "Profit %",
    "Stock Status",
    "Featured",
    "Active",
    "Description",
    "Created At",
    "Updated At",
];

pub fn products_file_name(date: NaiveDate) -> String {
    format!("products_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Render products as CSV, header first
pub fn products_to_csv(products: &[Product]) -> AppResult<String> {
    let mut writer = SheetWriter::new();
    writer.write_row(PRODUCT_HEADERS)?;
    for p in products {
        writer.write_row([
            p.sku.clone(),
            p.product_name.clone(),
            p.category.clone(),
            p.validity.clone(),
            p.provider_name.clone(),
            format_amount(p.provider_cost),
            format_amount(p.selling_price),
            format_amount(p.original_price),
            format_amount(p.profit_amount),
            format_amount(p.profit_percentage),
            p.stock_status.label().to_string(),
            yes_no(p.is_featured).to_string(),
            yes_no(p.is_active).to_string(),
            p.description.clone(),
            timestamp_label(p.created_at),
            timestamp_label(p.updated_at),
        ])?;
    }
    writer.finish()
}

// =============================================================================
// Import
// =============================================================================

/// A rejected import row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    /// Spreadsheet row number (the header is row 1)
    pub row: usize,
    pub errors: Vec<String>,
}

impl From<&RowError> for AppError {
    fn from(err: &RowError) -> Self {
        AppError::with_message(
            ErrorCode::ProductImportRejected,
            format!("Row {}: {}", err.row, err.errors.join(", ")),
        )
        .with_detail("row", err.row)
    }
}

#[derive(Debug, Default)]
pub struct ImportOutcome {
    pub valid: Vec<ProductCreate>,
    pub rejected: Vec<RowError>,
}

/// Column a header names, accepting sheet headers and snake_case field names
fn column_for(header: &str) -> Option<&'static str> {
    let normalized = header.trim().to_lowercase();
    let column = match normalized.as_str() {
        "sku" => "sku",
        "product name" | "product_name" | "name" => "product_name",
        "category" => "category",
        "validity" => "validity",
        "provider name" | "provider_name" => "provider_name",
        "provider contact" | "provider_contact" => "provider_contact",
        "provider source" | "provider_source" => "provider_source",
        "provider cost (₹)" | "provider cost" | "provider_cost" => "provider_cost",
        "selling price (₹)" | "selling price" | "selling_price" => "selling_price",
        "original price (₹)" | "original price" | "original_price" => "original_price",
        "stock status" | "stock_status" => "stock_status",
        "featured" | "is_featured" => "is_featured",
        "active" | "is_active" => "is_active",
        "description" => "description",
        "image url" | "image_url" => "image_url",
        "badge" => "badge",
        _ => return None,
    };
    Some(column)
}

fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse().ok()
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "yes" | "true" | "1" | "y" => Some(true),
        "no" | "false" | "0" | "n" => Some(false),
        _ => None,
    }
}

/// Parse and validate an import sheet.
///
/// Name and provider name are required, provider cost and selling price
/// must be positive. Derived columns (profit, timestamps) are ignored.
/// Only an unreadable file is an error; bad rows land in `rejected`.
pub fn import_products(input: &str) -> AppResult<ImportOutcome> {
    let sheet = read_sheet(input)?;
    let columns: Vec<Option<&'static str>> =
        sheet.headers.iter().map(|h| column_for(h)).collect();

    let mut outcome = ImportOutcome::default();
    for (index, row) in sheet.rows.iter().enumerate() {
        let row_number = index + 2;
        let get = |name: &str| -> String {
            columns
                .iter()
                .position(|c| *c == Some(name))
                .and_then(|i| row.get(i))
                .map(|v| v.trim().to_string())
                .unwrap_or_default()
        };

        let mut errors = Vec::new();
        let product_name = get("product_name");
        if product_name.is_empty() {
            errors.push("Product name is required".to_string());
        }
        let provider_name = get("provider_name");
        if provider_name.is_empty() {
            errors.push("Provider name is required".to_string());
        }
        let provider_cost = parse_number(&get("provider_cost")).unwrap_or(0.0);
        if provider_cost <= 0.0 {
            errors.push("Provider cost must be greater than 0".to_string());
        }
        let selling_price = parse_number(&get("selling_price")).unwrap_or(0.0);
        if selling_price <= 0.0 {
            errors.push("Selling price must be greater than 0".to_string());
        }

        if !errors.is_empty() {
            outcome.rejected.push(RowError {
                row: row_number,
                errors,
            });
            continue;
        }

        let defaults = ProductCreate::default();
        let non_empty = |v: String| Some(v).filter(|s| !s.is_empty());
        outcome.valid.push(ProductCreate {
            sku: non_empty(get("sku")),
            product_name,
            category: non_empty(get("category")).unwrap_or(defaults.category),
            validity: non_empty(get("validity")).unwrap_or(defaults.validity),
            description: get("description"),
            image_url: get("image_url"),
            provider_name,
            provider_contact: get("provider_contact"),
            provider_source: get("provider_source"),
            provider_cost,
            selling_price,
            original_price: parse_number(&get("original_price")).unwrap_or(selling_price),
            stock_status: StockStatus::parse(&get("stock_status")).unwrap_or_default(),
            is_active: parse_flag(&get("is_active")).unwrap_or(true),
            is_featured: parse_flag(&get("is_featured")).unwrap_or(false),
            badge: non_empty(get("badge")),
        });
    }

    if !outcome.rejected.is_empty() {
        tracing::warn!(
            rejected = outcome.rejected.len(),
            valid = outcome.valid.len(),
            "Product import rows rejected"
        );
    }
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product() -> Product {
        let now = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();
        Product::from_create(
            "prod_1".to_string(),
            "PV-ABC-123".to_string(),
            ProductCreate {
                product_name: "Netflix Premium".to_string(),
                category: "ott".to_string(),
                provider_name: "Provider 1".to_string(),
                provider_cost: 150.0,
                selling_price: 299.0,
                original_price: 649.0,
                description: "4K, 4 screens".to_string(),
                ..Default::default()
            },
            now,
        )
    }

    #[test]
    fn test_export_row_layout() {
        let out = products_to_csv(&[product()]).unwrap();
        let sheet = read_sheet(&out).unwrap();
        assert_eq!(sheet.rows.len(), 1);
        assert_eq!(sheet.headers, PRODUCT_HEADERS.to_vec());
        let row = &sheet.rows[0];
        assert_eq!(row[0], "PV-ABC-123");
        assert_eq!(row[5], "150");
        assert_eq!(row[8], "149");
        // Raw number, no percent sign
        assert_eq!(row[9], "99.33");
        assert_eq!(row[10], "In Stock");
        assert_eq!(row[11], "No");
        assert_eq!(row[12], "Yes");
        assert_eq!(row[13], "4K, 4 screens");
        assert_eq!(row[14], "16 Oct 2026, 09:30");
    }

    #[test]
    fn test_file_name() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        assert_eq!(products_file_name(date), "products_export_2026-10-16.csv");
    }

    #[test]
    fn test_export_then_import_sheet() {
        let outcome = import_products(&products_to_csv(&[product()]).unwrap()).unwrap();
        assert!(outcome.rejected.is_empty());
        let create = &outcome.valid[0];
        assert_eq!(create.sku.as_deref(), Some("PV-ABC-123"));
        assert_eq!(create.provider_cost, 150.0);
        assert_eq!(create.original_price, 649.0);
        assert!(create.is_active);
    }

    #[test]
    fn test_import_snake_case_headers_and_row_errors() {
        let sheet = "product_name,provider_name,provider_cost,selling_price,category\n\
                     Canva Pro,Provider 2,50,99,productivity\n\
                     ,Provider 3,0,10,\n\
                     Figma,,20,-5,\n";
        let outcome = import_products(sheet).unwrap();

        assert_eq!(outcome.valid.len(), 1);
        assert_eq!(outcome.valid[0].category, "productivity");
        assert_eq!(outcome.valid[0].validity, "1 Month");

        assert_eq!(outcome.rejected.len(), 2);
        assert_eq!(outcome.rejected[0].row, 3);
        assert_eq!(
            outcome.rejected[0].errors,
            vec![
                "Product name is required",
                "Provider cost must be greater than 0"
            ]
        );
        assert_eq!(outcome.rejected[1].row, 4);
        assert_eq!(outcome.rejected[1].errors.len(), 2);

        let err = AppError::from(&outcome.rejected[0]);
        assert_eq!(err.code, ErrorCode::ProductImportRejected);
        assert!(err.message.starts_with("Row 3:"));
    }

    #[test]
    fn test_import_empty_sheet() {
        let outcome = import_products("").unwrap();
        assert!(outcome.valid.is_empty() && outcome.rejected.is_empty());
    }
}
