//! Test fixtures for spreadsheet uploads.
//!
//! The binary workbooks under `tests/fixtures/` are minimal OOXML files:
//! `sales.xlsx` holds a header row (Month, Region, Revenue, Units) plus
//! three data rows; `empty.xlsx` holds a worksheet with no cells at all.

/// Workbook with one header row and three data rows.
#[allow(dead_code)]
pub fn sales_workbook() -> &'static [u8] {
    include_bytes!("../fixtures/sales.xlsx")
}

/// Number of data rows in [`sales_workbook`].
#[allow(dead_code)]
pub const SALES_ROW_COUNT: i64 = 3;

/// Workbook whose first worksheet has no rows, not even a header.
#[allow(dead_code)]
pub fn empty_workbook() -> &'static [u8] {
    include_bytes!("../fixtures/empty.xlsx")
}
