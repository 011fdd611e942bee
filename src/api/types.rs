//! Shared types for the WASM API
//!
//! Result shapes handed back to JavaScript that do not exist in the core model.

use serde::Serialize;

use crate::models::{CellAddress, PendingAction};
use crate::persist::SaveStatus;
use crate::text::CellCaret;

/// Everything the host needs to repaint chrome around the grid
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub path: Option<String>,
    pub current_page: usize,
    pub page_count: usize,
    pub selected: Option<CellAddress>,
    pub caret: CellCaret,
    pub composing: bool,
    pub status: SaveStatus,
    pub has_pending_write: bool,
    pub pending: Option<PendingAction>,
    pub search: SearchSnapshot,
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchSnapshot {
    pub query: String,
    pub match_count: usize,
    pub current: Option<usize>,
}

/// Index and scene number of a freshly added scene
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SceneAdded {
    pub index: usize,
    pub number: u32,
}
