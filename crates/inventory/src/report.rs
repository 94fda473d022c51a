//! Report export over a date range.
//!
//! The store selects the rows and supplies the sheet name and filename; the
//! actual spreadsheet serialization lives behind [`SheetWriter`] (an external
//! collaborator, XLSX in the real dashboard).

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use stockdesk_core::{DomainError, DomainResult};

use crate::record::ProductRecord;

/// Sheet name used for every generated report.
pub const SHEET_NAME: &str = "Inventario";

/// Export failure. `EmptyRange` is reported before the writer is ever called,
/// so the caller can tell the user instead of producing an empty file.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no products dated between {from} and {to}")]
    EmptyRange { from: NaiveDate, to: NaiveDate },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Flat export row with the Spanish column labels the report always used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    #[serde(rename = "ID")]
    pub id: u32,
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Categoría")]
    pub category: String,
    #[serde(rename = "Stock")]
    pub stock: u32,
    #[serde(rename = "Precio")]
    pub price: f64,
    #[serde(rename = "Estado")]
    pub status: String,
    #[serde(rename = "Fecha Agregado")]
    pub date_added: NaiveDate,
}

impl From<&ProductRecord> for ExportRow {
    fn from(record: &ProductRecord) -> Self {
        Self {
            id: record.id.get(),
            name: record.name.clone(),
            category: record.category.clone(),
            stock: record.stock,
            price: record.price,
            status: record.status.label().to_string(),
            date_added: record.date_added,
        }
    }
}

/// Spreadsheet serialization collaborator: rows in, downloadable file out.
pub trait SheetWriter {
    fn write_sheet(&mut self, filename: &str, sheet_name: &str, rows: &[ExportRow])
    -> DomainResult<()>;
}

/// Filename convention: `inventario_<from>_a_<to>` (the collaborator appends
/// its own extension).
pub fn export_filename(from: NaiveDate, to: NaiveDate) -> String {
    format!("inventario_{from}_a_{to}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::derive_status;
    use stockdesk_core::ProductId;

    #[test]
    fn filename_follows_convention() {
        let from = NaiveDate::from_ymd_opt(2023, 9, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        assert_eq!(export_filename(from, to), "inventario_2023-09-01_a_2023-09-30");
    }

    #[test]
    fn export_row_uses_spanish_labels() {
        let record = ProductRecord {
            id: ProductId::new(5),
            name: "Router WiFi 6".to_string(),
            category: "Redes".to_string(),
            stock: 8,
            price: 500_000.0,
            status: derive_status(8),
            date_added: NaiveDate::from_ymd_opt(2023, 9, 5).unwrap(),
        };
        let row = ExportRow::from(&record);
        assert_eq!(row.status, "Bajo");

        let json = serde_json::to_string(&row).unwrap();
        assert!(json.contains("\"Nombre\":\"Router WiFi 6\""));
        assert!(json.contains("\"Categoría\":\"Redes\""));
        assert!(json.contains("\"Fecha Agregado\":\"2023-09-05\""));
    }
}
