//! Inventory store for the stockdesk dashboard.
//!
//! This crate owns the authoritative product list and its whole contract:
//! CRUD with derived stock status, filtering, spreadsheet import validation,
//! report export, dashboard aggregation, and full-snapshot persistence to a
//! durable key/value slot after every mutation. It is a library consumed by
//! UI event handlers; rendering, routing, and the login check live elsewhere.

pub mod persist;
pub mod record;
pub mod report;
pub mod seed;
pub mod sheet;
pub mod store;
pub mod summary;

pub use persist::{InMemorySlot, KeyValueSlot, PRODUCTS_SLOT};
pub use record::{
    ProductDraft, ProductPatch, ProductRecord, ProductStatus, derive_status,
};
pub use report::{ExportError, ExportRow, SheetWriter, export_filename};
pub use sheet::{ImportError, ImportReport, RowError};
pub use store::{InventoryStore, QueryCriteria};
pub use summary::{CategoryTotal, InventorySummary, summarize};
