use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use stockdesk_core::{DomainError, DomainResult, ProductId};

/// Stock status, derived from `stock` and never set directly.
///
/// Serialized with the Spanish labels the original dashboard persisted, so
/// snapshots written by either implementation stay interchangeable. The
/// retired `Bajo stock` label is accepted on input and rewritten as `Bajo`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductStatus {
    #[serde(rename = "Disponible")]
    Available,
    #[serde(rename = "Bajo", alias = "Bajo stock")]
    Low,
    #[serde(rename = "Crítico")]
    Critical,
}

impl ProductStatus {
    /// Spanish display label, as shown in the table badges and export rows.
    pub fn label(&self) -> &'static str {
        match self {
            ProductStatus::Available => "Disponible",
            ProductStatus::Low => "Bajo",
            ProductStatus::Critical => "Crítico",
        }
    }
}

impl core::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Single source of truth for the stock → status rule.
///
/// Applied identically on create, update, import, and snapshot load.
pub fn derive_status(stock: u32) -> ProductStatus {
    if stock <= 5 {
        ProductStatus::Critical
    } else if stock <= 10 {
        ProductStatus::Low
    } else {
        ProductStatus::Available
    }
}

/// One product in the live inventory set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub price: f64,
    pub status: ProductStatus,
    /// Stamped once at creation; updates never touch it.
    pub date_added: NaiveDate,
}

/// Caller-supplied fields for creating a record, prior to validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub category: String,
    pub stock: u32,
    pub price: f64,
}

impl ProductDraft {
    /// Build a draft from raw form text, applying the numeric-parse rules at
    /// the boundary (non-negative integer stock, non-negative finite price).
    pub fn parse(name: &str, category: &str, stock: &str, price: &str) -> DomainResult<Self> {
        let draft = Self {
            name: name.trim().to_string(),
            category: category.trim().to_string(),
            stock: parse_stock(stock)?,
            price: parse_price(price)?,
        };
        draft.validate()?;
        Ok(draft)
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.category.trim().is_empty() {
            return Err(DomainError::validation("category cannot be empty"));
        }
        validate_price(self.price)
    }
}

/// Partial update: unspecified fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub price: Option<f64>,
}

impl ProductPatch {
    pub fn validate(&self) -> DomainResult<()> {
        if let Some(name) = &self.name
            && name.trim().is_empty()
        {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if let Some(category) = &self.category
            && category.trim().is_empty()
        {
            return Err(DomainError::validation("category cannot be empty"));
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

/// Parse a stock cell/field: integer, non-negative.
pub fn parse_stock(text: &str) -> DomainResult<u32> {
    let value: i64 = text
        .trim()
        .parse()
        .map_err(|_| DomainError::validation("stock must be a non-negative integer"))?;
    u32::try_from(value).map_err(|_| DomainError::validation("stock must be a non-negative integer"))
}

/// Parse a price cell/field: number, non-negative.
pub fn parse_price(text: &str) -> DomainResult<f64> {
    let value: f64 = text
        .trim()
        .parse()
        .map_err(|_| DomainError::validation("price must be a non-negative number"))?;
    validate_price(value)?;
    Ok(value)
}

fn validate_price(price: f64) -> DomainResult<()> {
    if !price.is_finite() || price < 0.0 {
        return Err(DomainError::validation("price must be a non-negative number"));
    }
    Ok(())
}
