//! Override categories and building classification.
//!
//! Every override belongs to exactly one [`OverrideCategory`]: residential
//! buildings carry a custom number of homes, everything else a custom number
//! of jobs. Which category a building falls into is decided by the host
//! through an [`EntityClassifier`]; [`BuildingCatalog`] is the default one.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Category
// =============================================================================

/// Which override family a building belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverrideCategory {
    /// Households per building.
    Residential,
    /// Jobs per building (commercial, industrial, office, ...).
    Workplace,
}

impl OverrideCategory {
    /// All categories, in the order they appear in the overrides file.
    pub const ALL: [OverrideCategory; 2] =
        [OverrideCategory::Residential, OverrideCategory::Workplace];

    /// Label shown next to the count field.
    pub fn label(self) -> &'static str {
        match self {
            OverrideCategory::Residential => "Homes",
            OverrideCategory::Workplace => "Jobs",
        }
    }

    /// Name of this category's section in the overrides file.
    pub fn section_name(self) -> &'static str {
        match self {
            OverrideCategory::Residential => "residential",
            OverrideCategory::Workplace => "workplace",
        }
    }
}

// =============================================================================
// Building services
// =============================================================================

/// Service classification the host reports for a building type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildingService {
    Residential,
    Commercial,
    Industrial,
    Office,
}

impl BuildingService {
    pub fn category(self) -> OverrideCategory {
        match self {
            BuildingService::Residential => OverrideCategory::Residential,
            BuildingService::Commercial | BuildingService::Industrial | BuildingService::Office => {
                OverrideCategory::Workplace
            }
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Host-provided mapping from building name to override category.
///
/// Implementations must be total and free of side effects: the selection
/// controller may call `classify` for any name the UI reports.
pub trait EntityClassifier {
    fn classify(&self, entity_name: &str) -> OverrideCategory;
}

impl<F> EntityClassifier for F
where
    F: Fn(&str) -> OverrideCategory,
{
    fn classify(&self, entity_name: &str) -> OverrideCategory {
        self(entity_name)
    }
}

/// Registry of known building types and their services.
///
/// Names that were never registered classify as [`OverrideCategory::Workplace`]:
/// only buildings positively known to be residential hold homes.
#[derive(Resource, Debug, Clone, Default)]
pub struct BuildingCatalog {
    services: HashMap<String, BuildingService>,
}

impl BuildingCatalog {
    /// Register (or re-register) a building type.
    pub fn register(&mut self, entity_name: impl Into<String>, service: BuildingService) {
        self.services.insert(entity_name.into(), service);
    }

    pub fn service_of(&self, entity_name: &str) -> Option<BuildingService> {
        self.services.get(entity_name).copied()
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl EntityClassifier for BuildingCatalog {
    fn classify(&self, entity_name: &str) -> OverrideCategory {
        self.service_of(entity_name)
            .map(BuildingService::category)
            .unwrap_or(OverrideCategory::Workplace)
    }
}
