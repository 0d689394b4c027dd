//! Overrides file codec.
//!
//! The file is a small JSON document with one section per category:
//!
//! ```json
//! {
//!   "version": 1,
//!   "residential": [{ "name": "L1 Suburban House", "count": 5 }],
//!   "workplace": [{ "name": "Corner Shop", "count": 20 }]
//! }
//! ```
//!
//! Loading is fail-soft: a missing, unreadable or malformed file yields an
//! empty store plus a [`LoadReport`] saying why. A malformed file is first
//! moved to `{path}.bad` so the next save does not overwrite it. Single bad
//! entries (blank name, count out of range) are skipped and the rest of the
//! file still loads. Saving is not fail-soft: every write failure is returned
//! to the caller.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::atomic_write::{atomic_write, remove_stale_tmp, set_aside};
use crate::category::OverrideCategory;
use crate::override_error::OverrideError;
use crate::override_store::{validate_override, OverrideStore};

/// Current overrides file format version. Bump when the document shape changes.
pub const OVERRIDES_FORMAT_VERSION: u32 = 1;

// =============================================================================
// Document types
// =============================================================================

/// One `(name, count)` pair inside a category section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    pub name: String,
    /// Signed so a hand-edited negative count only drops this entry.
    pub count: i64,
}

/// On-disk shape of the overrides file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverridesDocument {
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub residential: Vec<OverrideEntry>,
    #[serde(default)]
    pub workplace: Vec<OverrideEntry>,
}

impl OverridesDocument {
    pub fn section(&self, category: OverrideCategory) -> &[OverrideEntry] {
        match category {
            OverrideCategory::Residential => &self.residential,
            OverrideCategory::Workplace => &self.workplace,
        }
    }
}

// =============================================================================
// Encode / decode
// =============================================================================

fn encode_section(store: &OverrideStore, category: OverrideCategory) -> Vec<OverrideEntry> {
    store
        .entries(category)
        .into_iter()
        .map(|(name, count)| OverrideEntry {
            name: name.to_string(),
            count: i64::from(count),
        })
        .collect()
}

/// Snapshot the store into a document. Sections are sorted by name.
pub fn encode(store: &OverrideStore) -> OverridesDocument {
    let residential = encode_section(store, OverrideCategory::Residential);
    let workplace = encode_section(store, OverrideCategory::Workplace);
    OverridesDocument {
        version: OVERRIDES_FORMAT_VERSION,
        residential,
        workplace,
    }
}

/// Rebuild a store from a document.
///
/// A name repeated within a section keeps its last count. Entries with a
/// blank name or a count outside `1..=u32::MAX` are dropped.
pub fn decode(document: &OverridesDocument) -> OverrideStore {
    let mut store = OverrideStore::new();
    for category in OverrideCategory::ALL {
        for entry in document.section(category) {
            match checked_count(entry) {
                Ok(count) => store.set(category, entry.name.as_str(), count),
                Err(e) => warn!(
                    "Overrides: skipping {} entry {:?}: {}",
                    category.section_name(),
                    entry.name,
                    e
                ),
            }
        }
    }
    store
}

fn checked_count(entry: &OverrideEntry) -> Result<u32, OverrideError> {
    let count = u32::try_from(entry.count)
        .map_err(|_| OverrideError::InvalidInput(entry.count.to_string()))?;
    validate_override(&entry.name, count)?;
    Ok(count)
}

/// Encode the store as pretty-printed JSON.
pub fn encode_to_string(store: &OverrideStore) -> Result<String, OverrideError> {
    serde_json::to_string_pretty(&encode(store)).map_err(|e| OverrideError::Encode(e.to_string()))
}

/// Parse and decode overrides file contents.
pub fn decode_from_str(text: &str) -> Result<OverrideStore, OverrideError> {
    let document: OverridesDocument = serde_json::from_str(text)?;
    if document.version > OVERRIDES_FORMAT_VERSION {
        return Err(OverrideError::VersionMismatch {
            expected_max: OVERRIDES_FORMAT_VERSION,
            found: document.version,
        });
    }
    Ok(decode(&document))
}

// =============================================================================
// File I/O
// =============================================================================

/// What happened when the overrides file was loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File parsed; `entries` overrides were restored.
    Loaded { entries: usize },
    /// No file yet. Normal on first run.
    Missing,
    /// File exists but could not be read.
    Unreadable(String),
    /// File was read but is not a valid overrides document.
    Malformed(String),
}

/// Diagnostic returned alongside the loaded store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    /// A `.tmp` file from an interrupted write was found and removed.
    pub stale_tmp_removed: bool,
    /// Where a malformed file was moved before starting empty.
    pub set_aside: Option<PathBuf>,
}

impl LoadReport {
    /// True when the file existed but had to be ignored.
    pub fn is_degraded(&self) -> bool {
        matches!(
            self.outcome,
            LoadOutcome::Unreadable(_) | LoadOutcome::Malformed(_)
        )
    }
}

/// Load the overrides file at `path`. Never fails: problems are reported in
/// the returned [`LoadReport`] and the store starts empty.
pub fn load_overrides(path: &Path) -> (OverrideStore, LoadReport) {
    let stale_tmp_removed = remove_stale_tmp(path);

    let mut set_aside_to = None;
    let (store, outcome) = match std::fs::read_to_string(path) {
        Ok(text) => match decode_from_str(&text) {
            Ok(store) => {
                let entries = store.total_len();
                (store, LoadOutcome::Loaded { entries })
            }
            Err(e) => {
                match set_aside(path) {
                    Ok(moved) => set_aside_to = Some(moved),
                    Err(move_err) => warn!(
                        "Overrides: could not move malformed {} aside: {}",
                        path.display(),
                        move_err
                    ),
                }
                (OverrideStore::new(), LoadOutcome::Malformed(e.to_string()))
            }
        },
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (OverrideStore::new(), LoadOutcome::Missing)
        }
        Err(e) => (OverrideStore::new(), LoadOutcome::Unreadable(e.to_string())),
    };

    (
        store,
        LoadReport {
            outcome,
            stale_tmp_removed,
            set_aside: set_aside_to,
        },
    )
}

/// Write the full store to `path`, replacing any previous file atomically.
pub fn save_overrides(path: &Path, store: &OverrideStore) -> Result<(), OverrideError> {
    let json = encode_to_string(store)?;
    atomic_write(path, json.as_bytes())?;
    Ok(())
}
