//! Spreadsheet parsing into the normalized tabular model.
//!
//! An uploaded workbook is reduced to its first worksheet: the first row
//! becomes the header labels, every following row becomes a sequence of
//! scalar cell values. Anything richer (formulas, formatting, extra sheets)
//! is discarded at ingest time.

use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use serde::{Deserialize, Serialize};
use std::io::Cursor;

/// A single scalar cell.
///
/// Serialized untagged so rows round-trip as plain JSON scalars.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<&Data> for CellValue {
    fn from(data: &Data) -> Self {
        match data {
            Data::Empty => CellValue::Null,
            Data::Bool(b) => CellValue::Bool(*b),
            Data::Int(i) => CellValue::Int(*i),
            Data::Float(f) => CellValue::Float(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            // Serial date numbers keep their numeric form; consumers decide
            // whether a column holds dates.
            Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::Text(s.clone()),
            Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Error(e) => CellValue::Text(format!("#ERR:{e:?}")),
        }
    }
}

/// Parsed tabular content of one worksheet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SheetData {
    /// Header labels from the first row.
    pub headers: Vec<String>,
    /// Data rows, one sequence of cells per row.
    pub rows: Vec<Vec<CellValue>>,
}

impl SheetData {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Render a header cell as its display label.
fn header_label(data: &Data) -> String {
    match data {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Parse the first worksheet of a workbook into headers + rows.
///
/// The format is detected from the content, so `.xlsx` and legacy `.xls`
/// are both handled. Fails with [`Error::EmptyDocument`] when the sheet
/// has no rows at all (not even a header).
pub fn parse_workbook(bytes: &[u8]) -> Result<SheetData> {
    let cursor = Cursor::new(bytes);
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|e| Error::Parse(e.to_string()))?;

    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(|e| Error::Parse(e.to_string()))?,
        None => return Err(Error::EmptyDocument),
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(header_label).collect(),
        None => return Err(Error::EmptyDocument),
    };

    let rows: Vec<Vec<CellValue>> = rows
        .map(|row| row.iter().map(CellValue::from).collect())
        .collect();

    Ok(SheetData { headers, rows })
}

/// Validate a filename against the ingest allow-list.
///
/// Returns the normalized (lowercase, dot-prefixed) extension on success,
/// [`Error::UnsupportedFormat`] otherwise.
pub fn checked_extension(filename: &str) -> Result<String> {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| format!(".{}", ext.to_ascii_lowercase()));

    match ext {
        Some(ext) if crate::ALLOWED_EXTENSIONS.contains(&ext.as_str()) => Ok(ext),
        _ => Err(Error::UnsupportedFormat(filename.to_string())),
    }
}
