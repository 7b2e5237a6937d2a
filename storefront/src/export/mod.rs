//! Spreadsheet export / import
//!
//! Sheets are CSV with fixed column order; files land in the configured
//! export directory as `products_export_<date>.csv` and
//! `PremiumVerse_Leads_<date>.csv`.

pub mod sheet;
mod leads;
mod products;

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

use shared::error::{AppError, AppResult};

pub use leads::{LEAD_HEADERS, leads_file_name, leads_to_csv};
pub use products::{
    ImportOutcome, PRODUCT_HEADERS, RowError, import_products, products_file_name,
    products_to_csv,
};

pub(crate) fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

/// e.g. "16 Oct 2026"
pub(crate) fn date_label(at: DateTime<Utc>) -> String {
    at.format("%-d %b %Y").to_string()
}

/// e.g. "16 Oct 2026, 09:30"
pub(crate) fn timestamp_label(at: DateTime<Utc>) -> String {
    at.format("%-d %b %Y, %H:%M").to_string()
}

/// Write an export file, creating the directory if needed
pub fn write_export(dir: &Path, file_name: &str, content: &str) -> AppResult<PathBuf> {
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::export(format!("Failed to create export dir {}: {}", dir.display(), e))
    })?;

    let path = dir.join(file_name);
    std::fs::write(&path, content).map_err(|e| {
        AppError::export(format!("Failed to write {}: {}", path.display(), e))
            .with_detail("file", file_name)
    })?;

    tracing::info!(path = %path.display(), bytes = content.len(), "Export written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::error::ErrorCode;

    #[test]
    fn test_write_export_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("nested").join("exports");
        let path = write_export(&dir, "a.csv", "x,y\r\n").unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "x,y\r\n");
    }

    #[test]
    fn test_write_export_failure_is_export_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        // A regular file where the directory should be
        let err = write_export(&blocker, "a.csv", "").unwrap_err();
        assert_eq!(err.code, ErrorCode::ExportFailed);
    }
}
