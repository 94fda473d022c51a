//! The inventory store: authoritative product list + snapshot persistence.
//!
//! Single-threaded and event-driven: every operation runs to completion
//! inside one UI event handler, and every mutation is followed by a
//! full-snapshot write to the slot before the call returns.

use chrono::{Days, NaiveDate};
use serde::Deserialize;

use stockdesk_core::{DomainError, DomainResult, ProductId};

use crate::persist::{KeyValueSlot, PRODUCTS_SLOT};
use crate::record::{ProductDraft, ProductPatch, ProductRecord, ProductStatus, derive_status};
use crate::report::{ExportError, ExportRow, SheetWriter, export_filename, SHEET_NAME};
use crate::seed;
use crate::sheet::{self, ImportError, ImportReport, RowError};

/// Filter criteria; every supplied field must match (logical AND), absent
/// fields impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryCriteria {
    /// Case-insensitive substring match against name OR category.
    pub text: Option<String>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact status match.
    pub status: Option<ProductStatus>,
    /// Inclusive lower bound on `date_added`.
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound on `date_added`.
    pub date_to: Option<NaiveDate>,
}

impl QueryCriteria {
    fn matches(&self, record: &ProductRecord) -> bool {
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = record.name.to_lowercase().contains(&needle)
                || record.category.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(category) = &self.category
            && record.category != *category
        {
            return false;
        }
        if let Some(status) = self.status
            && record.status != status
        {
            return false;
        }
        if let Some(from) = self.date_from
            && record.date_added < from
        {
            return false;
        }
        if let Some(to) = self.date_to
            && record.date_added > to
        {
            return false;
        }
        true
    }
}

/// Snapshot row as read back from the slot. Tolerates legacy records: a
/// missing `dateAdded` is backfilled, and the stored status label (retired
/// `Bajo stock` included) is ignored entirely because status is re-derived
/// from stock on load.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    id: ProductId,
    name: String,
    category: String,
    stock: u32,
    price: f64,
    #[serde(default)]
    date_added: Option<NaiveDate>,
}

/// Owns the live product list and writes it through to a [`KeyValueSlot`]
/// after every mutation.
#[derive(Debug)]
pub struct InventoryStore<S: KeyValueSlot> {
    slot: S,
    products: Vec<ProductRecord>,
}

impl<S: KeyValueSlot> InventoryStore<S> {
    /// Load the store from its slot.
    ///
    /// An absent slot seeds the fixed sample set. A present snapshot has its
    /// legacy records upgraded: records without `dateAdded` get a synthetic
    /// date within the 30 days before `today` (spread by id, so the upgrade
    /// is deterministic and idempotent), and `status` is re-derived from
    /// `stock` for every record, which also rewrites retired labels. Either
    /// way the result is persisted immediately, so subsequent loads are
    /// stable.
    pub fn load(slot: S, today: NaiveDate) -> DomainResult<Self> {
        let mut store = Self {
            slot,
            products: Vec::new(),
        };

        match store.slot.read(PRODUCTS_SLOT)? {
            Some(raw) => {
                let stored: Vec<StoredRecord> = serde_json::from_str(&raw)
                    .map_err(|e| DomainError::persistence(format!("snapshot parse failed: {e}")))?;
                store.products = stored.into_iter().map(|r| upgrade(r, today)).collect();
                tracing::info!(count = store.products.len(), "loaded inventory snapshot");
            }
            None => {
                store.products = seed::sample_products();
                tracing::info!(count = store.products.len(), "seeded inventory from sample data");
            }
        }

        store.save()?;
        Ok(store)
    }

    /// The full live set, in insertion order.
    pub fn products(&self) -> &[ProductRecord] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: ProductId) -> Option<&ProductRecord> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Create a record from a validated draft.
    ///
    /// Assigns `max(existing ids) + 1` (1 on an empty store), derives the
    /// status, stamps `date_added` with `today`, appends, and persists.
    pub fn add(&mut self, draft: ProductDraft, today: NaiveDate) -> DomainResult<ProductRecord> {
        draft.validate()?;

        let record = ProductRecord {
            id: self.next_id(),
            name: draft.name.trim().to_string(),
            category: draft.category.trim().to_string(),
            stock: draft.stock,
            price: draft.price,
            status: derive_status(draft.stock),
            date_added: today,
        };

        self.products.push(record.clone());
        self.save()?;
        tracing::info!(id = %record.id, name = %record.name, "product added");
        Ok(record)
    }

    /// Merge a partial patch over an existing record.
    ///
    /// Unspecified fields are retained, status is recomputed from the
    /// resulting stock, and `date_added` is never touched.
    pub fn update(&mut self, id: ProductId, patch: ProductPatch) -> DomainResult<ProductRecord> {
        patch.validate()?;

        let updated = {
            let record = self
                .products
                .iter_mut()
                .find(|p| p.id == id)
                .ok_or(DomainError::NotFound)?;

            if let Some(name) = patch.name {
                record.name = name.trim().to_string();
            }
            if let Some(category) = patch.category {
                record.category = category.trim().to_string();
            }
            if let Some(stock) = patch.stock {
                record.stock = stock;
            }
            if let Some(price) = patch.price {
                record.price = price;
            }
            record.status = derive_status(record.stock);
            record.clone()
        };

        self.save()?;
        tracing::info!(id = %updated.id, "product updated");
        Ok(updated)
    }

    /// Remove a record. Unknown ids fail; a silent no-op would hide bugs in
    /// the calling UI.
    pub fn remove(&mut self, id: ProductId) -> DomainResult<ProductRecord> {
        let index = self
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or(DomainError::NotFound)?;

        let removed = self.products.remove(index);
        self.save()?;
        tracing::info!(id = %removed.id, name = %removed.name, "product removed");
        Ok(removed)
    }

    /// Stable filter over the live set: matches keep their insertion order,
    /// empty criteria return everything.
    pub fn query(&self, criteria: &QueryCriteria) -> Vec<&ProductRecord> {
        self.products.iter().filter(|p| criteria.matches(p)).collect()
    }

    /// Bulk-import spreadsheet rows (row 0 = headers).
    ///
    /// Header problems fail the whole import; data rows are validated
    /// independently and valid ones go through the same create path as
    /// [`add`](Self::add), each persisting as it lands. Row failures are
    /// collected, never thrown, and never roll back earlier rows.
    pub fn import_rows(
        &mut self,
        rows: &[Vec<String>],
        today: NaiveDate,
    ) -> Result<ImportReport, ImportError> {
        let (header, data) = match rows.split_first() {
            Some((header, data)) if !data.is_empty() => (header, data),
            _ => return Err(ImportError::MissingData),
        };
        let columns = sheet::resolve_columns(header)?;

        let mut imported = Vec::new();
        let mut errors: Vec<RowError> = Vec::new();

        for (offset, row) in data.iter().enumerate() {
            // 1-based sheet row: header is row 1, first data row is row 2.
            let row_number = offset + 2;
            match sheet::parse_row(row, columns, row_number) {
                Ok(draft) => {
                    let record = self.add(draft, today)?;
                    imported.push(record);
                }
                Err(err) => errors.push(err),
            }
        }

        if imported.is_empty() {
            return Err(ImportError::NoValidRows { errors });
        }

        tracing::info!(
            imported = imported.len(),
            rejected = errors.len(),
            "spreadsheet import finished"
        );
        Ok(ImportReport { imported, errors })
    }

    /// Export every record with `from <= date_added <= to` through the
    /// spreadsheet collaborator. An empty selection is reported before the
    /// writer is invoked, so no empty file is ever produced.
    pub fn export_range<W: SheetWriter>(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        writer: &mut W,
    ) -> Result<usize, ExportError> {
        let rows: Vec<ExportRow> = self
            .products
            .iter()
            .filter(|p| p.date_added >= from && p.date_added <= to)
            .map(ExportRow::from)
            .collect();

        if rows.is_empty() {
            return Err(ExportError::EmptyRange { from, to });
        }

        writer.write_sheet(&export_filename(from, to), SHEET_NAME, &rows)?;
        tracing::info!(rows = rows.len(), %from, %to, "report exported");
        Ok(rows.len())
    }

    /// Write the complete live set as one snapshot document.
    fn save(&mut self) -> DomainResult<()> {
        let payload = serde_json::to_string(&self.products)
            .map_err(|e| DomainError::persistence(format!("snapshot serialize failed: {e}")))?;
        self.slot.write(PRODUCTS_SLOT, &payload)
    }

    fn next_id(&self) -> ProductId {
        let max = self.products.iter().map(|p| p.id.get()).max().unwrap_or(0);
        ProductId::new(max + 1)
    }
}

fn upgrade(stored: StoredRecord, today: NaiveDate) -> ProductRecord {
    let date_added = stored.date_added.unwrap_or_else(|| {
        // Deterministic stand-in within the last 30 days, spread by id.
        let offset = u64::from(stored.id.get() % 30);
        today.checked_sub_days(Days::new(offset)).unwrap_or(today)
    });

    ProductRecord {
        id: stored.id,
        name: stored.name,
        category: stored.category,
        stock: stored.stock,
        price: stored.price,
        status: derive_status(stored.stock),
        date_added,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::{FailingSlot, InMemorySlot};
    use crate::record::ProductStatus;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2023, 10, 1)
    }

    fn draft(name: &str, category: &str, stock: u32, price: f64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            category: category.to_string(),
            stock,
            price,
        }
    }

    fn empty_store() -> InventoryStore<InMemorySlot> {
        // An empty-array snapshot skips seeding.
        let slot = InMemorySlot::with_entry(PRODUCTS_SLOT, "[]");
        InventoryStore::load(slot, today()).unwrap()
    }

    #[test]
    fn load_seeds_when_slot_is_absent_and_persists() {
        let store = InventoryStore::load(InMemorySlot::new(), today()).unwrap();
        assert_eq!(store.len(), 15);

        let snapshot = store.slot.read(PRODUCTS_SLOT).unwrap().unwrap();
        assert!(snapshot.contains("Laptop Dell XPS 13"));
    }

    #[test]
    fn add_assigns_next_id_and_derives_status() {
        let mut store = empty_store();

        let first = store.add(draft("Mouse", "Periféricos", 12, 15000.0), today()).unwrap();
        assert_eq!(first.id.get(), 1);
        assert_eq!(first.status, ProductStatus::Available);
        assert_eq!(first.date_added, today());

        let second = store.add(draft("Hub USB", "Accesorios", 4, 90000.0), today()).unwrap();
        assert_eq!(second.id.get(), 2);
        assert_eq!(second.status, ProductStatus::Critical);

        let all = store.query(&QueryCriteria::default());
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn add_ids_continue_past_removed_maximum() {
        let mut store = empty_store();
        store.add(draft("A", "X", 20, 1.0), today()).unwrap();
        let b = store.add(draft("B", "X", 20, 1.0), today()).unwrap();
        store.remove(b.id).unwrap();

        // max(existing) + 1, not a reuse of the removed id's successor slot.
        let c = store.add(draft("C", "X", 20, 1.0), today()).unwrap();
        assert_eq!(c.id.get(), 2);
    }

    #[test]
    fn add_rejects_invalid_drafts() {
        let mut store = empty_store();
        let err = store.add(draft("  ", "Redes", 5, 10.0), today()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        let err = store.add(draft("Router", "Redes", 5, -10.0), today()).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn update_merges_patch_and_recomputes_status() {
        let mut store = empty_store();
        let created = store.add(draft("Router", "Redes", 20, 500.0), date(2023, 9, 5)).unwrap();
        assert_eq!(created.status, ProductStatus::Available);

        let updated = store
            .update(
                created.id,
                ProductPatch {
                    stock: Some(3),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Router");
        assert_eq!(updated.price, 500.0);
        assert_eq!(updated.status, ProductStatus::Critical);
        assert_eq!(updated.date_added, date(2023, 9, 5)); // untouched
    }

    #[test]
    fn update_unknown_id_fails_not_found() {
        let mut store = empty_store();
        let err = store
            .update(ProductId::new(99), ProductPatch::default())
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn remove_then_update_fails_not_found() {
        let mut store = empty_store();
        let created = store.add(draft("Router", "Redes", 20, 500.0), today()).unwrap();

        let removed = store.remove(created.id).unwrap();
        assert_eq!(removed.id, created.id);

        let err = store
            .update(created.id, ProductPatch { stock: Some(1), ..Default::default() })
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);

        let err = store.remove(created.id).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn query_text_matches_name_or_category_case_insensitively() {
        let mut store = empty_store();
        store.add(draft("Laptop Dell XPS 13", "Computadoras", 15, 2_500_000.0), today()).unwrap();
        store.add(draft("Router WiFi 6", "Redes", 8, 500_000.0), today()).unwrap();

        let hits = store.query(&QueryCriteria {
            text: Some("lap".to_string()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Laptop Dell XPS 13");

        // Category text also matches.
        let hits = store.query(&QueryCriteria {
            text: Some("redes".to_string()),
            ..Default::default()
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Router WiFi 6");
    }

    #[test]
    fn query_combines_all_supplied_criteria() {
        let mut store = empty_store();
        store.add(draft("Cable HDMI", "Cables", 50, 50_000.0), date(2023, 9, 11)).unwrap();
        store.add(draft("Cable USB", "Cables", 4, 20_000.0), date(2023, 9, 20)).unwrap();
        store.add(draft("Webcam", "Periféricos", 18, 250_000.0), date(2023, 9, 12)).unwrap();

        let hits = store.query(&QueryCriteria {
            text: Some("cable".to_string()),
            category: Some("Cables".to_string()),
            status: Some(ProductStatus::Critical),
            date_from: Some(date(2023, 9, 15)),
            date_to: Some(date(2023, 9, 30)),
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Cable USB");
    }

    #[test]
    fn query_date_bounds_are_inclusive_and_order_is_stable() {
        let mut store = empty_store();
        store.add(draft("A", "X", 20, 1.0), date(2023, 9, 1)).unwrap();
        store.add(draft("B", "X", 20, 1.0), date(2023, 9, 2)).unwrap();
        store.add(draft("C", "X", 20, 1.0), date(2023, 9, 3)).unwrap();

        let hits = store.query(&QueryCriteria {
            date_from: Some(date(2023, 9, 1)),
            date_to: Some(date(2023, 9, 3)),
            ..Default::default()
        });
        let names: Vec<&str> = hits.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[test]
    fn empty_criteria_return_the_full_set() {
        let store = InventoryStore::load(InMemorySlot::new(), today()).unwrap();
        assert_eq!(store.query(&QueryCriteria::default()).len(), 15);
    }

    #[test]
    fn save_load_round_trips_the_live_set() {
        let mut store = InventoryStore::load(InMemorySlot::new(), today()).unwrap();
        store.add(draft("Dock Thunderbolt", "Accesorios", 2, 900_000.0), today()).unwrap();
        let before = store.products().to_vec();

        let snapshot = store.slot.read(PRODUCTS_SLOT).unwrap().unwrap();
        let reloaded = InventoryStore::load(
            InMemorySlot::with_entry(PRODUCTS_SLOT, &snapshot),
            today(),
        )
        .unwrap();

        assert_eq!(reloaded.products(), before.as_slice());
    }

    #[test]
    fn load_upgrades_legacy_records_idempotently() {
        // Legacy shape: no dateAdded, retired "Bajo stock" label, and a
        // status inconsistent with stock (stock 2 marked Disponible).
        let legacy = r#"[
            {"id":1,"name":"Router","category":"Redes","stock":8,"price":500,"status":"Bajo stock"},
            {"id":2,"name":"Hub","category":"Accesorios","stock":2,"price":100,"status":"Disponible"}
        ]"#;
        let slot = InMemorySlot::with_entry(PRODUCTS_SLOT, legacy);
        let store = InventoryStore::load(slot, today()).unwrap();

        let router = store.get(ProductId::new(1)).unwrap();
        assert_eq!(router.status, ProductStatus::Low);
        assert!(router.date_added <= today());
        assert!(router.date_added >= today() - Days::new(30));

        let hub = store.get(ProductId::new(2)).unwrap();
        assert_eq!(hub.status, ProductStatus::Critical);

        // Second load over the upgraded snapshot changes nothing.
        let upgraded = store.slot.read(PRODUCTS_SLOT).unwrap().unwrap();
        let again = InventoryStore::load(
            InMemorySlot::with_entry(PRODUCTS_SLOT, &upgraded),
            today(),
        )
        .unwrap();
        assert_eq!(again.products(), store.products());
    }

    #[test]
    fn load_reports_corrupt_snapshots_as_persistence_failures() {
        let slot = InMemorySlot::with_entry(PRODUCTS_SLOT, "not json");
        let err = InventoryStore::load(slot, today()).unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    #[test]
    fn mutations_surface_slot_write_failures() {
        let err = InventoryStore::load(FailingSlot, today()).unwrap_err();
        assert!(matches!(err, DomainError::Persistence(_)));
    }

    mod import {
        use super::*;

        fn rows(rows: &[&[&str]]) -> Vec<Vec<String>> {
            rows.iter()
                .map(|r| r.iter().map(|c| (*c).to_string()).collect())
                .collect()
        }

        #[test]
        fn imports_valid_rows_through_the_create_path() {
            let mut store = empty_store();
            let report = store
                .import_rows(
                    &rows(&[
                        &["nombre", "categoria", "stock", "precio"],
                        &["Mouse", "Periféricos", "12", "15000"],
                    ]),
                    today(),
                )
                .unwrap();

            assert_eq!(report.imported.len(), 1);
            assert!(report.errors.is_empty());
            let mouse = &report.imported[0];
            assert_eq!(mouse.id.get(), 1);
            assert_eq!(mouse.status, ProductStatus::Available);
            assert_eq!(mouse.date_added, today());
            assert_eq!(store.len(), 1);
        }

        #[test]
        fn partial_success_is_reported_not_rolled_back() {
            let mut store = empty_store();
            let report = store
                .import_rows(
                    &rows(&[
                        &["nombre", "categoria", "stock", "precio"],
                        &["Mouse", "Periféricos", "12", "15000"],
                        &["Hub", "Accesorios", "-1", "100"],
                        &["Webcam", "Periféricos", "6", "250000"],
                    ]),
                    today(),
                )
                .unwrap();

            assert_eq!(report.imported.len(), 2);
            assert_eq!(report.errors.len(), 1);
            assert_eq!(report.errors[0].row, 3);
            assert_eq!(store.len(), 2);
            // Fresh unique ids in arrival order.
            assert_eq!(report.imported[0].id.get(), 1);
            assert_eq!(report.imported[1].id.get(), 2);
        }

        #[test]
        fn negative_stock_row_yields_no_valid_rows() {
            let mut store = empty_store();
            let err = store
                .import_rows(
                    &rows(&[
                        &["nombre", "categoria", "stock", "precio"],
                        &["Mouse", "Periféricos", "-1", "15000"],
                    ]),
                    today(),
                )
                .unwrap_err();

            match err {
                ImportError::NoValidRows { errors } => {
                    assert_eq!(errors.len(), 1);
                    assert_eq!(errors[0].reason, "stock must be a non-negative integer");
                }
                other => panic!("expected NoValidRows, got {other:?}"),
            }
            assert!(store.is_empty());
        }

        #[test]
        fn missing_headers_fail_wholesale() {
            let mut store = empty_store();
            let err = store
                .import_rows(
                    &rows(&[
                        &["nombre", "stock"],
                        &["Mouse", "12"],
                    ]),
                    today(),
                )
                .unwrap_err();

            match err {
                ImportError::MissingColumns(missing) => {
                    assert_eq!(missing, vec!["categoria", "precio"]);
                }
                other => panic!("expected MissingColumns, got {other:?}"),
            }
            assert!(store.is_empty());
        }

        #[test]
        fn header_only_sheet_is_rejected() {
            let mut store = empty_store();
            let err = store
                .import_rows(&rows(&[&["nombre", "categoria", "stock", "precio"]]), today())
                .unwrap_err();
            assert!(matches!(err, ImportError::MissingData));
        }
    }

    mod export {
        use super::*;

        #[derive(Debug, Default)]
        struct RecordingWriter {
            calls: Vec<(String, String, Vec<ExportRow>)>,
        }

        impl SheetWriter for RecordingWriter {
            fn write_sheet(
                &mut self,
                filename: &str,
                sheet_name: &str,
                rows: &[ExportRow],
            ) -> DomainResult<()> {
                self.calls
                    .push((filename.to_string(), sheet_name.to_string(), rows.to_vec()));
                Ok(())
            }
        }

        #[test]
        fn exports_inclusive_date_range() {
            let mut store = empty_store();
            store.add(draft("A", "X", 20, 1.0), date(2023, 9, 1)).unwrap();
            store.add(draft("B", "X", 20, 1.0), date(2023, 9, 15)).unwrap();
            store.add(draft("C", "X", 20, 1.0), date(2023, 10, 2)).unwrap();

            let mut writer = RecordingWriter::default();
            let exported = store
                .export_range(date(2023, 9, 1), date(2023, 9, 30), &mut writer)
                .unwrap();

            assert_eq!(exported, 2);
            let (filename, sheet, rows) = &writer.calls[0];
            assert_eq!(filename, "inventario_2023-09-01_a_2023-09-30");
            assert_eq!(sheet, "Inventario");
            let names: Vec<&str> = rows.iter().map(|r| r.name.as_str()).collect();
            assert_eq!(names, ["A", "B"]);
        }

        #[test]
        fn empty_range_reports_without_touching_the_writer() {
            let mut store = empty_store();
            store.add(draft("A", "X", 20, 1.0), date(2023, 9, 1)).unwrap();

            let mut writer = RecordingWriter::default();
            let err = store
                .export_range(date(2024, 1, 1), date(2024, 1, 31), &mut writer)
                .unwrap_err();

            assert!(matches!(err, ExportError::EmptyRange { .. }));
            assert!(writer.calls.is_empty());
        }
    }
}
