//! Selection controller for the building override panel.
//!
//! Tracks which building the player has selected and what the panel should
//! show for it. The controller owns no widgets: a UI reads the query surface
//! (`display_text`, `can_save`, `can_delete`, ...) and forwards the player's
//! input as `on_*` calls.
//!
//! ```text
//! NoSelection ──select──▶ Selected{With,Without}Override
//! SelectedWithoutOverride ──save──▶ SelectedWithOverride
//! SelectedWithOverride ──delete──▶ SelectedWithoutOverride
//! any ──select(blank)──▶ NoSelection
//! ```

use bevy::prelude::*;

use crate::category::{EntityClassifier, OverrideCategory};
use crate::override_error::OverrideError;
use crate::override_store::OverrideStore;
use crate::persistent_store::PersistentOverrides;

// =============================================================================
// State
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SelectionState {
    #[default]
    NoSelection,
    SelectedWithOverride {
        entity: String,
        category: OverrideCategory,
        count: u32,
    },
    SelectedWithoutOverride {
        entity: String,
        category: OverrideCategory,
    },
}

/// Result of reporting a selection to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionChange {
    /// Same building as before; nothing was queried.
    Unchanged,
    /// Blank or missing building; selection cleared.
    Cleared,
    /// New building selected and looked up.
    Selected,
}

/// Parse the count field. Surrounding whitespace is ignored; the value must
/// be a whole number of 1 or more.
pub fn parse_count(text: &str) -> Result<u32, OverrideError> {
    match text.trim().parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(OverrideError::InvalidInput(text.to_string())),
    }
}

// =============================================================================
// Controller
// =============================================================================

#[derive(Resource, Debug, Default)]
pub struct SelectionController {
    state: SelectionState,
    /// Store lookups performed so far.
    lookups: u64,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn selected_entity(&self) -> Option<&str> {
        match &self.state {
            SelectionState::NoSelection => None,
            SelectionState::SelectedWithOverride { entity, .. }
            | SelectionState::SelectedWithoutOverride { entity, .. } => Some(entity.as_str()),
        }
    }

    pub fn category(&self) -> Option<OverrideCategory> {
        match &self.state {
            SelectionState::NoSelection => None,
            SelectionState::SelectedWithOverride { category, .. }
            | SelectionState::SelectedWithoutOverride { category, .. } => Some(*category),
        }
    }

    /// Override count of the selected building, if it has one.
    pub fn current_count(&self) -> Option<u32> {
        match &self.state {
            SelectionState::SelectedWithOverride { count, .. } => Some(*count),
            _ => None,
        }
    }

    pub fn has_override(&self) -> bool {
        matches!(self.state, SelectionState::SelectedWithOverride { .. })
    }

    pub fn can_save(&self) -> bool {
        !matches!(self.state, SelectionState::NoSelection)
    }

    pub fn can_delete(&self) -> bool {
        self.has_override()
    }

    /// "Homes" or "Jobs" depending on the selection; `None` without one.
    pub fn field_label(&self) -> Option<&'static str> {
        self.category().map(OverrideCategory::label)
    }

    /// Text for the count field: the override, or blank.
    pub fn display_text(&self) -> String {
        self.current_count()
            .map(|count| count.to_string())
            .unwrap_or_default()
    }

    pub fn lookup_count(&self) -> u64 {
        self.lookups
    }

    fn lookup(
        &mut self,
        store: &OverrideStore,
        category: OverrideCategory,
        entity: &str,
    ) -> Option<u32> {
        self.lookups += 1;
        store.get(category, entity)
    }

    fn enter_selected(&mut self, entity: String, category: OverrideCategory, count: Option<u32>) {
        self.state = match count {
            Some(count) => SelectionState::SelectedWithOverride {
                entity,
                category,
                count,
            },
            None => SelectionState::SelectedWithoutOverride { entity, category },
        };
    }

    /// The host reports a new current building (`None` or blank to deselect).
    pub fn on_selection_changed(
        &mut self,
        entity: Option<&str>,
        classifier: &dyn EntityClassifier,
        store: &OverrideStore,
    ) -> SelectionChange {
        let entity = entity.filter(|name| !name.trim().is_empty());

        if entity == self.selected_entity() {
            return SelectionChange::Unchanged;
        }

        let Some(entity) = entity else {
            self.state = SelectionState::NoSelection;
            return SelectionChange::Cleared;
        };

        let category = classifier.classify(entity);
        let count = self.lookup(store, category, entity);
        self.enter_selected(entity.to_string(), category, count);
        SelectionChange::Selected
    }

    /// The player pressed save with `text` in the count field.
    ///
    /// Returns the stored count. Unparseable text leaves the store and the
    /// state untouched. If the file write fails the new count is still shown
    /// (memory holds it) and the I/O error is returned.
    pub fn on_save_requested(
        &mut self,
        text: &str,
        overrides: &mut PersistentOverrides,
    ) -> Result<u32, OverrideError> {
        let (entity, category) = match &self.state {
            SelectionState::NoSelection => return Err(OverrideError::NoSelection),
            SelectionState::SelectedWithOverride {
                entity, category, ..
            }
            | SelectionState::SelectedWithoutOverride { entity, category } => {
                (entity.clone(), *category)
            }
        };

        let count = parse_count(text)?;
        let written = overrides.set(category, &entity, count);
        let stored = self.lookup(overrides.store(), category, &entity);
        self.enter_selected(entity, category, stored);
        written.map(|_| count)
    }

    /// The player pressed delete. Only valid while the selection has an override.
    pub fn on_delete_requested(
        &mut self,
        overrides: &mut PersistentOverrides,
    ) -> Result<(), OverrideError> {
        let (entity, category) = match &self.state {
            SelectionState::NoSelection => return Err(OverrideError::NoSelection),
            SelectionState::SelectedWithoutOverride { .. } => {
                return Err(OverrideError::NoOverride)
            }
            SelectionState::SelectedWithOverride {
                entity, category, ..
            } => (entity.clone(), *category),
        };

        let written = overrides.remove(category, &entity);
        self.state = SelectionState::SelectedWithoutOverride { entity, category };
        written.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use crate::category::OverrideCategory::{Residential, Workplace};
    use crate::override_codec::load_overrides;

    fn by_prefix(name: &str) -> OverrideCategory {
        if name.starts_with("house") || name == "A" {
            Residential
        } else {
            Workplace
        }
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("overrides_selection_test_{name}"));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn overrides_in(dir: &std::path::Path) -> PersistentOverrides {
        PersistentOverrides::open(dir.join("overrides.json")).0
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("5").unwrap(), 5);
        assert_eq!(parse_count("  42 ").unwrap(), 42);
        for bad in ["abc", "", "0", "-3", "2.5", "99999999999"] {
            assert!(
                matches!(parse_count(bad), Err(OverrideError::InvalidInput(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_starts_with_no_selection() {
        let controller = SelectionController::new();
        assert_eq!(controller.state(), &SelectionState::NoSelection);
        assert!(!controller.can_save());
        assert!(!controller.can_delete());
        assert_eq!(controller.display_text(), "");
        assert_eq!(controller.field_label(), None);
    }

    #[test]
    fn test_select_with_override() {
        let mut store = OverrideStore::new();
        store.set(Residential, "house1", 5);
        let mut controller = SelectionController::new();

        let change = controller.on_selection_changed(Some("house1"), &by_prefix, &store);

        assert_eq!(change, SelectionChange::Selected);
        assert_eq!(controller.current_count(), Some(5));
        assert!(controller.has_override());
        assert!(controller.can_save());
        assert!(controller.can_delete());
        assert_eq!(controller.display_text(), "5");
        assert_eq!(controller.field_label(), Some("Homes"));
    }

    #[test]
    fn test_select_without_override() {
        let store = OverrideStore::new();
        let mut controller = SelectionController::new();

        controller.on_selection_changed(Some("office1"), &by_prefix, &store);

        assert_eq!(
            controller.state(),
            &SelectionState::SelectedWithoutOverride {
                entity: "office1".to_string(),
                category: Workplace,
            }
        );
        assert!(controller.can_save());
        assert!(!controller.can_delete());
        assert_eq!(controller.display_text(), "");
        assert_eq!(controller.field_label(), Some("Jobs"));
    }

    #[test]
    fn test_override_in_other_category_is_not_found() {
        let mut store = OverrideStore::new();
        store.set(Workplace, "house1", 9);
        let mut controller = SelectionController::new();

        controller.on_selection_changed(Some("house1"), &by_prefix, &store);
        assert!(!controller.has_override());
    }

    #[test]
    fn test_blank_selection_clears() {
        let mut store = OverrideStore::new();
        store.set(Residential, "house1", 5);
        let mut controller = SelectionController::new();
        controller.on_selection_changed(Some("house1"), &by_prefix, &store);

        assert_eq!(
            controller.on_selection_changed(Some("  "), &by_prefix, &store),
            SelectionChange::Cleared
        );
        assert_eq!(controller.state(), &SelectionState::NoSelection);

        controller.on_selection_changed(Some("house1"), &by_prefix, &store);
        assert_eq!(
            controller.on_selection_changed(None, &by_prefix, &store),
            SelectionChange::Cleared
        );
        assert_eq!(controller.state(), &SelectionState::NoSelection);
    }

    #[test]
    fn test_deselect_when_nothing_selected_is_unchanged() {
        let store = OverrideStore::new();
        let mut controller = SelectionController::new();
        assert_eq!(
            controller.on_selection_changed(None, &by_prefix, &store),
            SelectionChange::Unchanged
        );
    }

    #[test]
    fn test_reselect_same_entity_skips_lookup() {
        let mut store = OverrideStore::new();
        store.set(Residential, "A", 3);
        let mut controller = SelectionController::new();

        controller.on_selection_changed(Some("A"), &by_prefix, &store);
        assert_eq!(controller.lookup_count(), 1);
        assert_eq!(controller.current_count(), Some(3));

        let change = controller.on_selection_changed(Some("A"), &by_prefix, &store);
        assert_eq!(change, SelectionChange::Unchanged);
        assert_eq!(controller.lookup_count(), 1);
        assert_eq!(controller.current_count(), Some(3));
    }

    #[test]
    fn test_save_creates_override_and_persists() {
        let dir = test_dir("save_creates");
        let mut overrides = overrides_in(&dir);
        let mut controller = SelectionController::new();
        controller.on_selection_changed(Some("office1"), &by_prefix, overrides.store());

        assert_eq!(controller.on_save_requested("20", &mut overrides).unwrap(), 20);

        assert_eq!(controller.current_count(), Some(20));
        assert!(controller.can_delete());
        let (on_disk, _) = load_overrides(overrides.path());
        assert_eq!(on_disk.get(Workplace, "office1"), Some(20));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_invalid_text_keeps_store() {
        let dir = test_dir("save_invalid");
        let mut overrides = overrides_in(&dir);
        overrides.set(Residential, "house1", 5).unwrap();
        let mut controller = SelectionController::new();
        controller.on_selection_changed(Some("house1"), &by_prefix, overrides.store());
        let writes_before = overrides.writes();

        let err = controller.on_save_requested("abc", &mut overrides).unwrap_err();

        assert!(matches!(err, OverrideError::InvalidInput(_)));
        assert!(err.is_validation());
        assert_eq!(overrides.get(Residential, "house1"), Some(5));
        assert_eq!(controller.current_count(), Some(5));
        assert_eq!(overrides.writes(), writes_before);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_without_selection_is_rejected() {
        let dir = test_dir("save_no_selection");
        let mut overrides = overrides_in(&dir);
        let mut controller = SelectionController::new();

        assert!(matches!(
            controller.on_save_requested("5", &mut overrides),
            Err(OverrideError::NoSelection)
        ));
        assert!(overrides.store().is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_delete_removes_override() {
        let dir = test_dir("delete");
        let mut overrides = overrides_in(&dir);
        overrides.set(Workplace, "office1", 20).unwrap();
        let mut controller = SelectionController::new();
        controller.on_selection_changed(Some("office1"), &by_prefix, overrides.store());

        controller.on_delete_requested(&mut overrides).unwrap();

        assert_eq!(
            controller.state(),
            &SelectionState::SelectedWithoutOverride {
                entity: "office1".to_string(),
                category: Workplace,
            }
        );
        assert_eq!(controller.display_text(), "");
        assert_eq!(overrides.get(Workplace, "office1"), None);
        let (on_disk, _) = load_overrides(overrides.path());
        assert!(on_disk.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_delete_requires_override() {
        let dir = test_dir("delete_requires");
        let mut overrides = overrides_in(&dir);
        let mut controller = SelectionController::new();

        assert!(matches!(
            controller.on_delete_requested(&mut overrides),
            Err(OverrideError::NoSelection)
        ));

        controller.on_selection_changed(Some("office1"), &by_prefix, overrides.store());
        assert!(matches!(
            controller.on_delete_requested(&mut overrides),
            Err(OverrideError::NoOverride)
        ));
        assert_eq!(overrides.writes(), 0);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_write_failure_still_updates_view() {
        let dir = test_dir("save_write_failure");
        let blocker = dir.join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();
        let mut overrides =
            PersistentOverrides::with_store(blocker.join("overrides.json"), OverrideStore::new());
        let mut controller = SelectionController::new();
        controller.on_selection_changed(Some("house1"), &by_prefix, overrides.store());

        let result = controller.on_save_requested("7", &mut overrides);

        assert!(matches!(result, Err(OverrideError::Io(_))));
        assert_eq!(controller.current_count(), Some(7));
        assert_eq!(overrides.get(Residential, "house1"), Some(7));

        let _ = fs::remove_dir_all(&dir);
    }
}
