//! Dashboard aggregation over the live set.
//!
//! Pure functions from store state to the numbers the dashboard widgets and
//! charts display. Rendering is someone else's job.

use std::collections::HashMap;

use serde::Serialize;

use crate::record::{ProductRecord, ProductStatus};
use crate::store::InventoryStore;
use crate::persist::KeyValueSlot;

/// Stock or value total for one category, in first-appearance order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub stock: u64,
    pub value: f64,
}

/// Everything the summary widgets need, computed in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_stock: u64,
    /// Σ stock · price over the live set.
    pub total_value: f64,
    pub available: usize,
    pub low: usize,
    pub critical: usize,
    pub by_category: Vec<CategoryTotal>,
}

pub fn summarize(products: &[ProductRecord]) -> InventorySummary {
    let mut summary = InventorySummary {
        total_products: products.len(),
        total_stock: 0,
        total_value: 0.0,
        available: 0,
        low: 0,
        critical: 0,
        by_category: Vec::new(),
    };
    let mut index: HashMap<&str, usize> = HashMap::new();

    for product in products {
        let value = f64::from(product.stock) * product.price;
        summary.total_stock += u64::from(product.stock);
        summary.total_value += value;
        match product.status {
            ProductStatus::Available => summary.available += 1,
            ProductStatus::Low => summary.low += 1,
            ProductStatus::Critical => summary.critical += 1,
        }

        let slot = *index.entry(product.category.as_str()).or_insert_with(|| {
            summary.by_category.push(CategoryTotal {
                category: product.category.clone(),
                stock: 0,
                value: 0.0,
            });
            summary.by_category.len() - 1
        });
        if let Some(total) = summary.by_category.get_mut(slot) {
            total.stock += u64::from(product.stock);
            total.value += value;
        }
    }

    summary
}

impl<S: KeyValueSlot> InventoryStore<S> {
    /// Aggregate the live set for the dashboard widgets.
    pub fn summary(&self) -> InventorySummary {
        summarize(self.products())
    }

    /// Products needing attention (status Low or Critical), insertion order.
    pub fn low_stock(&self) -> Vec<&ProductRecord> {
        self.products()
            .iter()
            .filter(|p| p.status != ProductStatus::Available)
            .collect()
    }

    /// The `n` most recently added products, newest first. Ties keep
    /// insertion order.
    pub fn recent(&self, n: usize) -> Vec<&ProductRecord> {
        let mut all: Vec<&ProductRecord> = self.products().iter().collect();
        all.sort_by(|a, b| b.date_added.cmp(&a.date_added));
        all.truncate(n);
        all
    }
}
