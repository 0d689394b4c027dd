//! Text protocol for the headless override editor.
//!
//! Newline-delimited JSON on stdin/stdout. Each stdin line is one
//! [`EditorCommand`]; each stdout line is one [`EditorResponse`]. The I/O
//! loop lives in `crates/app/src/editor_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::category::{BuildingService, OverrideCategory};
use crate::override_store::OverrideStore;
use crate::plugin::OverrideStatus;
use crate::selection::SelectionController;

// ---------------------------------------------------------------------------
// Commands (stdin → editor)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "cmd")]
pub enum EditorCommand {
    /// Select a building. `name: null` (or omitted) deselects. `service`
    /// registers the building's classification before selecting it.
    #[serde(rename = "select")]
    Select {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        service: Option<BuildingService>,
    },

    /// Save the given text as the selected building's count.
    #[serde(rename = "save")]
    Save { value: String },

    /// Delete the selected building's override.
    #[serde(rename = "delete")]
    Delete,

    /// Report the panel state without changing anything.
    #[serde(rename = "status")]
    Status,

    /// List every stored override.
    #[serde(rename = "list")]
    List,

    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (editor → stdout)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct EditorResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

/// What the override panel would display right now.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSnapshot {
    pub entity: Option<String>,
    pub category: Option<OverrideCategory>,
    /// "Homes" or "Jobs".
    pub label: Option<&'static str>,
    pub count: Option<u32>,
    pub can_save: bool,
    pub can_delete: bool,
    pub message: Option<String>,
    pub message_is_error: bool,
}

impl PanelSnapshot {
    pub fn capture(controller: &SelectionController, status: &OverrideStatus) -> Self {
        Self {
            entity: controller.selected_entity().map(str::to_string),
            category: controller.category(),
            label: controller.field_label(),
            count: controller.current_count(),
            can_save: controller.can_save(),
            can_delete: controller.can_delete(),
            message: status.text().map(str::to_string),
            message_is_error: status.is_error(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListedOverride {
    pub name: String,
    pub category: OverrideCategory,
    pub count: u32,
}

pub fn list_overrides(store: &OverrideStore) -> Vec<ListedOverride> {
    store
        .records()
        .into_iter()
        .map(|record| ListedOverride {
            name: record.entity_name,
            category: record.category,
            count: record.count,
        })
        .collect()
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready { file: String, entries: usize },

    /// Panel state after a select/save/delete/status command.
    #[serde(rename = "panel")]
    Panel { panel: PanelSnapshot },

    #[serde(rename = "overrides")]
    Overrides { overrides: Vec<ListedOverride> },

    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

/// Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> EditorResponse {
    EditorResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}
