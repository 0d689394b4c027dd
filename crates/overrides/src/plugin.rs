use bevy::prelude::*;
use std::path::Path;

use crate::category::BuildingCatalog;
use crate::config::OverridesConfig;
use crate::override_codec::{LoadOutcome, LoadReport};
use crate::override_error::OverrideError;
use crate::persistent_store::PersistentOverrides;
use crate::selection::{SelectionChange, SelectionController};

/// Panel message shown when the count field does not hold a valid number.
pub const INVALID_VALUE_MESSAGE: &str = "ERROR: invalid value";

// =============================================================================
// Events
// =============================================================================

/// Input from the override panel.
///
/// Selection and edits share one event type so they are applied in the order
/// they were sent: a save always targets the building that was selected when
/// the player pressed it, even if the selection moves in the same frame.
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub enum OverridePanelEvent {
    /// The host's current building changed. `None` (or a blank name) deselects.
    Select(Option<String>),
    /// The player pressed save with this text in the count field.
    Save(String),
    /// The player pressed delete.
    Delete,
}

// =============================================================================
// Resources
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
}

/// Message line under the panel buttons. Hidden (`None`) most of the time.
#[derive(Resource, Debug, Clone, Default)]
pub struct OverrideStatus {
    pub message: Option<StatusMessage>,
}

impl OverrideStatus {
    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn show_error(&mut self, text: impl Into<String>) {
        self.message = Some(StatusMessage {
            text: text.into(),
            is_error: true,
        });
    }

    pub fn is_error(&self) -> bool {
        self.message.as_ref().is_some_and(|m| m.is_error)
    }

    pub fn text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }
}

// =============================================================================
// Systems
// =============================================================================

fn log_load_report(path: &Path, report: &LoadReport) {
    if report.stale_tmp_removed {
        info!(
            "Overrides: removed leftover temp file from an interrupted write next to {}",
            path.display()
        );
    }
    match &report.outcome {
        LoadOutcome::Loaded { entries } => {
            info!("Overrides: loaded {} entries from {}", entries, path.display());
        }
        LoadOutcome::Missing => {
            info!(
                "Overrides: no file at {}, starting with no custom settings",
                path.display()
            );
        }
        LoadOutcome::Unreadable(e) => {
            warn!(
                "Overrides: could not read {}, starting empty: {}",
                path.display(),
                e
            );
        }
        LoadOutcome::Malformed(e) => {
            warn!(
                "Overrides: ignoring malformed file {}, starting empty: {}",
                path.display(),
                e
            );
        }
    }
    if let Some(bad) = &report.set_aside {
        warn!("Overrides: malformed file moved to {}", bad.display());
    }
}

/// Startup system: read the overrides file and install the store.
pub fn load_overrides_on_startup(mut commands: Commands, config: Res<OverridesConfig>) {
    let (overrides, report) = PersistentOverrides::open(&config.file_path);
    log_load_report(&config.file_path, &report);
    commands.insert_resource(overrides);
}

fn report_edit(status: &mut OverrideStatus, action: &str, result: Result<(), OverrideError>) {
    match result {
        Ok(()) => {}
        Err(e) if e.is_validation() => status.show_error(INVALID_VALUE_MESSAGE),
        Err(OverrideError::NoSelection | OverrideError::NoOverride) => {
            debug!("Overrides: {} ignored, nothing to {}", action, action);
        }
        Err(e) => {
            error!("Overrides: {} was not written to disk: {}", action, e);
            status.show_error(format!("ERROR: changes may not be saved ({e})"));
        }
    }
}

/// Feeds panel input to the controller, one event at a time in arrival order.
pub fn handle_panel_events(
    mut events: EventReader<OverridePanelEvent>,
    catalog: Res<BuildingCatalog>,
    mut overrides: ResMut<PersistentOverrides>,
    mut controller: ResMut<SelectionController>,
    mut status: ResMut<OverrideStatus>,
) {
    for event in events.read() {
        match event {
            OverridePanelEvent::Select(entity) => {
                let change = controller.on_selection_changed(
                    entity.as_deref(),
                    &*catalog,
                    overrides.store(),
                );
                if change != SelectionChange::Unchanged {
                    status.clear();
                }
            }
            OverridePanelEvent::Save(text) => {
                status.clear();
                let result = controller.on_save_requested(text, &mut overrides);
                if let (Ok(count), Some(entity)) = (&result, controller.selected_entity()) {
                    info!("Overrides: {} set to {}", entity, count);
                }
                report_edit(&mut status, "save", result.map(|_| ()));
            }
            OverridePanelEvent::Delete => {
                status.clear();
                let entity = controller.selected_entity().map(str::to_string);
                let result = controller.on_delete_requested(&mut overrides);
                if let (Ok(()), Some(entity)) = (&result, entity) {
                    info!("Overrides: {} reset to default", entity);
                }
                report_edit(&mut status, "delete", result);
            }
        }
    }
}

// =============================================================================
// Plugin
// =============================================================================

pub struct OverridesPlugin;

impl Plugin for OverridesPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OverridesConfig>()
            .init_resource::<BuildingCatalog>()
            .init_resource::<SelectionController>()
            .init_resource::<OverrideStatus>()
            .add_event::<OverridePanelEvent>()
            .add_systems(Startup, load_overrides_on_startup)
            .add_systems(Update, handle_panel_events);
    }
}
