//! Supplier stock feed: download, unpack and read the spreadsheet

use std::io::{Cursor, Read};

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use log::{debug, info};

use crate::error::{Result, SyncError};
use crate::http::{check_status, USER_AGENT};

/// Supplier feed URL (ZIP archive with a single spreadsheet)
pub const DEFAULT_FEED_URL: &str = "https://timeworld.ru/upload/files/ostatki.zip";
/// Spreadsheet entry inside the archive
pub const DEFAULT_FEED_FILE: &str = "ostatki.xls";
/// Zero-based sheet row holding the column labels
pub const DEFAULT_HEADER_ROW: u32 = 17;

pub const CODE_COLUMN: &str = "Код";
pub const QUANTITY_COLUMN: &str = "Количество";
pub const PRICE_COLUMN: &str = "Цена";

/// One product row of the feed, as raw cell text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRecord {
    pub code: String,
    pub quantity: String,
    pub price: String,
}

impl FeedRecord {
    pub fn new(code: &str, quantity: &str, price: &str) -> Self {
        Self {
            code: code.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
        }
    }
}

/// Where to find the feed and how its sheet is laid out
#[derive(Debug, Clone)]
pub struct FeedSource {
    pub url: String,
    pub file_name: String,
    pub header_row: u32,
}

impl Default for FeedSource {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            file_name: DEFAULT_FEED_FILE.to_string(),
            header_row: DEFAULT_HEADER_ROW,
        }
    }
}

impl FeedSource {
    /// Download the archive and read every product row from its spreadsheet
    pub async fn fetch(&self) -> Result<Vec<FeedRecord>> {
        info!("Fetching stock feed from {}", self.url);

        let response = reqwest::Client::new()
            .get(&self.url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?;

        let archive = check_status(response).await?.bytes().await?;
        debug!("Downloaded feed archive: {} bytes", archive.len());

        let workbook = extract_file(&archive, &self.file_name)?;
        let records = read_workbook(workbook, self.header_row)?;

        info!("Loaded {} feed records from {}", records.len(), self.file_name);
        Ok(records)
    }
}

/// Pull the named entry out of a ZIP archive held in memory
pub fn extract_file(archive: &[u8], file_name: &str) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(archive))?;
    let mut entry = match archive.by_name(file_name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(SyncError::MissingFeedFile(file_name.to_string()))
        }
        Err(e) => return Err(e.into()),
    };

    let mut contents = Vec::with_capacity(entry.size() as usize);
    entry.read_to_end(&mut contents)?;
    Ok(contents)
}

/// Read the first sheet of an XLS/XLSX/ODS workbook into feed records
pub fn read_workbook(workbook: Vec<u8>, header_row: u32) -> Result<Vec<FeedRecord>> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(workbook))?;
    let range = match sheets.worksheet_range_at(0) {
        Some(range) => range?,
        None => return Err(SyncError::MissingHeader(header_row)),
    };
    parse_records(&range, header_row)
}

/// Read feed records below `header_row`, locating columns by their label.
///
/// `header_row` is an absolute sheet row; calamine ranges start at the first
/// used cell, so the offset is resolved against the range start.
pub fn parse_records(range: &Range<Data>, header_row: u32) -> Result<Vec<FeedRecord>> {
    let start_row = range.start().map(|(row, _)| row).unwrap_or(0);
    let skip = header_row
        .checked_sub(start_row)
        .ok_or(SyncError::MissingHeader(header_row))? as usize;

    let mut rows = range.rows().skip(skip);
    let header = rows.next().ok_or(SyncError::MissingHeader(header_row))?;

    let code_idx = column_index(header, CODE_COLUMN)?;
    let quantity_idx = column_index(header, QUANTITY_COLUMN)?;
    let price_idx = column_index(header, PRICE_COLUMN)?;

    let records: Vec<FeedRecord> = rows
        .map(|row| FeedRecord {
            code: cell_text(row.get(code_idx)),
            quantity: cell_text(row.get(quantity_idx)),
            price: cell_text(row.get(price_idx)),
        })
        .filter(|r| !(r.code.is_empty() && r.quantity.is_empty() && r.price.is_empty()))
        .collect();

    debug!(
        "Parsed {} records (columns: code={}, quantity={}, price={})",
        records.len(),
        code_idx,
        quantity_idx,
        price_idx
    );
    Ok(records)
}

fn column_index(header: &[Data], label: &str) -> Result<usize> {
    header
        .iter()
        .position(|cell| cell_text(Some(cell)) == label)
        .ok_or_else(|| SyncError::MissingColumn(label.to_string()))
}

/// Render a cell as text; whole floats lose their fraction (`10.0` -> `"10"`)
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Int(i)) => i.to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            (*f as i64).to_string()
        }
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
#[path = "feed_tests.rs"]
mod tests;
