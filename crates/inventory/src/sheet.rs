//! Spreadsheet import validation.
//!
//! The upload collaborator hands us a 2-D array of cell text with row 0 as
//! headers. Header checks fail the whole import; data rows are validated
//! independently, and valid rows go through the normal create path. Rows
//! already imported are never rolled back when a later row fails.

use thiserror::Error;

use stockdesk_core::DomainError;

use crate::record::{ProductDraft, ProductRecord, parse_price, parse_stock};

/// Required header names, case-insensitive and order-independent.
pub const REQUIRED_COLUMNS: [&str; 4] = ["nombre", "categoria", "stock", "precio"];

/// Wholesale import failure. Row-level problems are [`RowError`]s instead.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The sheet has no header row or no data rows at all.
    #[error("sheet must contain a header row and at least one data row")]
    MissingData,

    /// One or more required columns are absent; nothing is imported.
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// Every data row failed validation; nothing was imported.
    #[error("no valid rows to import ({} rejected)", .errors.len())]
    NoValidRows { errors: Vec<RowError> },

    /// A create or snapshot write failed mid-import. Rows imported before the
    /// failure stay imported.
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One rejected data row, collected rather than thrown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// 1-based row number as the user sees it in the spreadsheet.
    pub row: usize,
    pub reason: String,
}

impl core::fmt::Display for RowError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "row {}: {}", self.row, self.reason)
    }
}

/// Outcome of a partially or fully successful import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub imported: Vec<ProductRecord>,
    pub errors: Vec<RowError>,
}

/// Resolved positions of the required columns in the header row.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Columns {
    name: usize,
    category: usize,
    stock: usize,
    price: usize,
}

/// Locate the required columns, case-insensitively and in any order.
pub(crate) fn resolve_columns(header: &[String]) -> Result<Columns, ImportError> {
    let normalized: Vec<String> = header.iter().map(|h| h.trim().to_lowercase()).collect();
    let find = |name: &str| normalized.iter().position(|h| h == name);

    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|c| find(c).is_none())
        .map(|c| (*c).to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ImportError::MissingColumns(missing));
    }

    // The positions exist; `unwrap_or` keeps this panic-free regardless.
    Ok(Columns {
        name: find("nombre").unwrap_or(0),
        category: find("categoria").unwrap_or(0),
        stock: find("stock").unwrap_or(0),
        price: find("precio").unwrap_or(0),
    })
}

/// Validate one data row into a create draft.
///
/// `row_number` is the 1-based sheet row used in error messages.
pub(crate) fn parse_row(
    row: &[String],
    columns: Columns,
    row_number: usize,
) -> Result<ProductDraft, RowError> {
    let cell = |idx: usize| row.get(idx).map(|c| c.trim()).filter(|c| !c.is_empty());

    let (Some(name), Some(category), Some(stock), Some(price)) = (
        cell(columns.name),
        cell(columns.category),
        cell(columns.stock),
        cell(columns.price),
    ) else {
        return Err(RowError {
            row: row_number,
            reason: "incomplete data".to_string(),
        });
    };

    let stock = parse_stock(stock).map_err(|e| row_error(row_number, e))?;
    let price = parse_price(price).map_err(|e| row_error(row_number, e))?;

    Ok(ProductDraft {
        name: name.to_string(),
        category: category.to_string(),
        stock,
        price,
    })
}

fn row_error(row: usize, err: DomainError) -> RowError {
    let reason = match err {
        DomainError::Validation(msg) => msg,
        other => other.to_string(),
    };
    RowError { row, reason }
}
