//! Durable key/value slot seam.
//!
//! A slot is a named, synchronous, string-keyed storage location surviving
//! reloads (the original app used browser `localStorage`). The store writes
//! the whole product list as one document after every mutation.

use std::collections::HashMap;

use stockdesk_core::{DomainError, DomainResult};

/// Slot holding the serialized product list. Other slots (sidebar state,
/// profile) belong to the surrounding UI and are never touched here.
pub const PRODUCTS_SLOT: &str = "inventoryProducts";

/// String key → string document storage abstraction.
pub trait KeyValueSlot {
    /// Read the document stored under `key`, if any.
    fn read(&self, key: &str) -> DomainResult<Option<String>>;

    /// Write (create or replace) the document stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> DomainResult<()>;
}

/// In-memory slot for tests and dev.
#[derive(Debug, Default)]
pub struct InMemorySlot {
    entries: HashMap<String, String>,
}

impl InMemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key, e.g. to simulate a snapshot left by a previous run.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut slot = Self::new();
        slot.entries.insert(key.to_string(), value.to_string());
        slot
    }
}

impl KeyValueSlot for InMemorySlot {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> DomainResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl<S: KeyValueSlot + ?Sized> KeyValueSlot for Box<S> {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> DomainResult<()> {
        (**self).write(key, value)
    }
}

/// Slot double whose writes always fail.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct FailingSlot;

#[cfg(test)]
impl KeyValueSlot for FailingSlot {
    fn read(&self, _key: &str) -> DomainResult<Option<String>> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> DomainResult<()> {
        Err(DomainError::persistence("slot unavailable"))
    }
}
