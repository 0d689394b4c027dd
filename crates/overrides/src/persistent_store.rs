//! Override store bound to its file.
//!
//! `PersistentOverrides` is the resource the rest of the app talks to. Every
//! `set`/`remove` rewrites the whole file before returning, so the file never
//! lags behind memory by more than the call in flight.

use bevy::prelude::*;
use std::path::{Path, PathBuf};

use crate::category::OverrideCategory;
use crate::override_codec::{load_overrides, save_overrides, LoadReport};
use crate::override_error::OverrideError;
use crate::override_store::{validate_override, OverrideStore};

#[derive(Resource, Debug)]
pub struct PersistentOverrides {
    store: OverrideStore,
    path: PathBuf,
    /// Number of successful file writes since startup.
    writes: u64,
}

impl PersistentOverrides {
    /// Load `path` (fail-soft) and bind the result to it.
    pub fn open(path: impl Into<PathBuf>) -> (Self, LoadReport) {
        let path = path.into();
        let (store, report) = load_overrides(&path);
        (Self::with_store(path, store), report)
    }

    /// Bind an existing store to `path` without reading or writing anything.
    pub fn with_store(path: impl Into<PathBuf>, store: OverrideStore) -> Self {
        Self {
            store,
            path: path.into(),
            writes: 0,
        }
    }

    pub fn store(&self) -> &OverrideStore {
        &self.store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writes(&self) -> u64 {
        self.writes
    }

    pub fn get(&self, category: OverrideCategory, entity_name: &str) -> Option<u32> {
        self.store.get(category, entity_name)
    }

    /// Validate, store, then write the file.
    ///
    /// Invalid input is rejected before the store is touched. If the write
    /// fails the new value stays in memory and the I/O error is returned.
    pub fn set(
        &mut self,
        category: OverrideCategory,
        entity_name: &str,
        count: u32,
    ) -> Result<(), OverrideError> {
        validate_override(entity_name, count)?;
        self.store.set(category, entity_name, count);
        self.flush()
    }

    /// Remove an override (absent names are fine), then write the file.
    ///
    /// Returns the count that was removed, if any.
    pub fn remove(
        &mut self,
        category: OverrideCategory,
        entity_name: &str,
    ) -> Result<Option<u32>, OverrideError> {
        let previous = self.store.remove(category, entity_name);
        self.flush()?;
        Ok(previous)
    }

    /// Write the full store to disk.
    pub fn flush(&mut self) -> Result<(), OverrideError> {
        save_overrides(&self.path, &self.store)?;
        self.writes += 1;
        Ok(())
    }
}
