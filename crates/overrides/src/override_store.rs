//! In-memory override store.
//!
//! Holds one `name -> count` mapping per [`OverrideCategory`]. The store is
//! pure state: it never touches the disk. Durable edits go through
//! [`crate::persistent_store::PersistentOverrides`], which rewrites the file
//! after every mutation.

use std::collections::HashMap;

use crate::category::OverrideCategory;
use crate::override_error::OverrideError;

// =============================================================================
// Record
// =============================================================================

/// A single override fact: `entity_name` in `category` gets `count` homes or jobs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverrideRecord {
    pub entity_name: String,
    pub category: OverrideCategory,
    pub count: u32,
}

impl OverrideRecord {
    /// Build a record, rejecting blank names and counts below 1.
    pub fn new(
        category: OverrideCategory,
        entity_name: impl Into<String>,
        count: u32,
    ) -> Result<Self, OverrideError> {
        let entity_name = entity_name.into();
        validate_override(&entity_name, count)?;
        Ok(Self {
            entity_name,
            category,
            count,
        })
    }
}

/// Boundary check for the store's `set` precondition.
pub fn validate_override(entity_name: &str, count: u32) -> Result<(), OverrideError> {
    if entity_name.trim().is_empty() {
        return Err(OverrideError::InvalidName);
    }
    if count == 0 {
        return Err(OverrideError::InvalidCount(count));
    }
    Ok(())
}

// =============================================================================
// Store
// =============================================================================

/// Authoritative set of current overrides.
///
/// Invariant: every stored count is at least 1. Removing an override deletes
/// the key; zero is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverrideStore {
    residential: HashMap<String, u32>,
    workplace: HashMap<String, u32>,
}

impl OverrideStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn map(&self, category: OverrideCategory) -> &HashMap<String, u32> {
        match category {
            OverrideCategory::Residential => &self.residential,
            OverrideCategory::Workplace => &self.workplace,
        }
    }

    fn map_mut(&mut self, category: OverrideCategory) -> &mut HashMap<String, u32> {
        match category {
            OverrideCategory::Residential => &mut self.residential,
            OverrideCategory::Workplace => &mut self.workplace,
        }
    }

    /// Stored count for `entity_name`, or `None` if it has no override.
    pub fn get(&self, category: OverrideCategory, entity_name: &str) -> Option<u32> {
        self.map(category).get(entity_name).copied()
    }

    pub fn contains(&self, category: OverrideCategory, entity_name: &str) -> bool {
        self.map(category).contains_key(entity_name)
    }

    /// Insert or overwrite an override.
    ///
    /// Precondition: `entity_name` is not blank and `count >= 1`. Callers
    /// check this with [`validate_override`] before reaching the store.
    pub fn set(&mut self, category: OverrideCategory, entity_name: impl Into<String>, count: u32) {
        let entity_name = entity_name.into();
        debug_assert!(
            validate_override(&entity_name, count).is_ok(),
            "invalid override {entity_name:?} = {count}"
        );
        self.map_mut(category).insert(entity_name, count);
    }

    /// Insert a validated record.
    pub fn apply(&mut self, record: OverrideRecord) {
        self.set(record.category, record.entity_name, record.count);
    }

    /// Delete an override, returning the previous count. Absent names are a no-op.
    pub fn remove(&mut self, category: OverrideCategory, entity_name: &str) -> Option<u32> {
        self.map_mut(category).remove(entity_name)
    }

    /// Number of overrides in one category.
    pub fn len(&self, category: OverrideCategory) -> usize {
        self.map(category).len()
    }

    pub fn total_len(&self) -> usize {
        self.residential.len() + self.workplace.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residential.is_empty() && self.workplace.is_empty()
    }

    /// `(name, count)` pairs of one category, sorted by name.
    pub fn entries(&self, category: OverrideCategory) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self
            .map(category)
            .iter()
            .map(|(name, &count)| (name.as_str(), count))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// All overrides, residential first, each category sorted by name.
    pub fn records(&self) -> Vec<OverrideRecord> {
        OverrideCategory::ALL
            .iter()
            .flat_map(|&category| {
                self.entries(category)
                    .into_iter()
                    .map(move |(name, count)| OverrideRecord {
                        entity_name: name.to_string(),
                        category,
                        count,
                    })
            })
            .collect()
    }
}
