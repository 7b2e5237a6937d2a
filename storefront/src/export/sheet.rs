//! CSV sheets on top of the `csv` crate
//!
//! Written sheets start with a UTF-8 BOM so spreadsheet apps pick up the ₹
//! sign, and use CRLF row endings. Reading accepts either ending, skips rows
//! whose cells are all blank and tolerates ragged rows.

use shared::error::{AppError, AppResult};

const BOM: &str = "\u{feff}";

/// Accumulates rows into an in-memory CSV document
pub struct SheetWriter {
    inner: csv::Writer<Vec<u8>>,
}

impl SheetWriter {
    pub fn new() -> Self {
        let inner = csv::WriterBuilder::new()
            .terminator(csv::Terminator::CRLF)
            .from_writer(BOM.as_bytes().to_vec());
        Self { inner }
    }

    pub fn write_row<I, S>(&mut self, fields: I) -> AppResult<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        self.inner
            .write_record(fields)
            .map_err(|e| AppError::export(format!("Failed to write sheet row: {}", e)))
    }

    pub fn finish(self) -> AppResult<String> {
        let bytes = self
            .inner
            .into_inner()
            .map_err(|e| AppError::export(format!("Failed to flush sheet: {}", e.error())))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::export(format!("Sheet is not valid UTF-8: {}", e)))
    }
}

impl Default for SheetWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// A parsed sheet: the header row plus the non-blank data rows
#[derive(Debug, Default, PartialEq)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Index of the first header equal to `name`
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// Parse a CSV document whose first row is the header
pub fn read_sheet(input: &str) -> AppResult<Sheet> {
    let input = input.strip_prefix(BOM).unwrap_or(input);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(input.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| AppError::invalid_format(format!("Unreadable sheet header: {}", e)))?
        .iter()
        .map(str::to_string)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| AppError::invalid_format(format!("Unreadable sheet row: {}", e)))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(Sheet { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_fields_are_quoted() {
        let mut w = SheetWriter::new();
        w.write_row(["plain", "a,b", "say \"hi\""]).unwrap();
        let out = w.finish().unwrap();
        assert_eq!(out, "\u{feff}plain,\"a,b\",\"say \"\"hi\"\"\"\r\n");
    }

    #[test]
    fn test_read_quoted_and_multiline() {
        let sheet = read_sheet(
            "\u{feff}name,desc\r\nNetflix,\"4K, HDR\"\r\nSpotify,\"line1\nline2\"\n\n",
        )
        .unwrap();
        assert_eq!(sheet.headers, vec!["name", "desc"]);
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.rows[0], vec!["Netflix", "4K, HDR"]);
        assert_eq!(sheet.rows[1][1], "line1\nline2");
        assert_eq!(sheet.column("desc"), Some(1));
    }

    #[test]
    fn test_read_skips_blank_rows_and_allows_short_rows() {
        let sheet = read_sheet("a,b,c\n,,\n1\n").unwrap();
        assert_eq!(sheet.rows, vec![vec!["1"]]);
    }

    #[test]
    fn test_read_empty_input() {
        let sheet = read_sheet("").unwrap();
        assert!(sheet.headers.is_empty());
        assert!(sheet.rows.is_empty());
    }
}
