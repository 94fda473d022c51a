//! File-backed key/value slots: one document file per slot key.
//!
//! Stands in for the browser's `localStorage` when the dashboard core runs
//! outside a browser (tests, desktop shells). Reads and writes are
//! synchronous; a write completes before its caller returns.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;

use stockdesk_core::{DomainError, DomainResult};
use stockdesk_inventory::KeyValueSlot;

/// Durable slot directory holding `<key>.json` files.
#[derive(Debug, Clone)]
pub struct FileSlot {
    dir: PathBuf,
}

impl FileSlot {
    /// Use an explicit directory (created on first write).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Resolve the default slot directory: `{app_data_dir}/stockdesk/`.
    pub fn open_default() -> anyhow::Result<Self> {
        let base = dirs::data_dir()
            .or_else(|| {
                dirs::home_dir().map(|mut h| {
                    h.push(".local");
                    h.push("share");
                    h
                })
            })
            .context("failed to resolve OS app data directory")?;

        let mut dir = base;
        dir.push("stockdesk");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create slot directory at {dir:?}"))?;

        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueSlot for FileSlot {
    fn read(&self, key: &str) -> DomainResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(DomainError::persistence(format!(
                "failed to read slot {key} at {path:?}: {e}"
            ))),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> DomainResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            DomainError::persistence(format!("failed to create slot directory {:?}: {e}", self.dir))
        })?;

        let path = self.path_for(key);
        std::fs::write(&path, value).map_err(|e| {
            DomainError::persistence(format!("failed to write slot {key} at {path:?}: {e}"))
        })?;

        tracing::debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }
}
