//! Per-building override store.
//!
//! Lets the player give a building type a custom number of homes or jobs,
//! keeps those overrides in a JSON file across sessions, and exposes the
//! state a panel needs to show the override for the selected building.
//!
//! - [`override_store`]: in-memory mapping, one per [`OverrideCategory`]
//! - [`override_codec`]: file format, fail-soft load, atomic save
//! - [`persistent_store`]: store + file path, writes after every edit
//! - [`selection`]: selection state machine driven by the UI
//! - [`OverridesPlugin`]: Bevy wiring (resources, events, systems)

pub mod atomic_write;
pub mod category;
pub mod config;
pub mod editor_protocol;
pub mod override_codec;
pub mod override_error;
pub mod override_store;
pub mod persistent_store;
mod plugin;
pub mod selection;

pub use category::{BuildingCatalog, BuildingService, EntityClassifier, OverrideCategory};
pub use config::OverridesConfig;
pub use override_error::OverrideError;
pub use override_store::{OverrideRecord, OverrideStore};
pub use persistent_store::PersistentOverrides;
pub use plugin::{
    handle_panel_events, load_overrides_on_startup, OverridePanelEvent, OverrideStatus,
    OverridesPlugin, StatusMessage, INVALID_VALUE_MESSAGE,
};
pub use selection::{SelectionChange, SelectionController, SelectionState};
