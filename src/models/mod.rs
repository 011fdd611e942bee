//! Screenplay data model
//!
//! `core` holds the persisted tree, `address` the grid coordinates, `columns`
//! the transient column widths and `editor_state` the per-file owner of it all.

pub mod address;
pub mod columns;
pub mod core;
pub mod editor_state;
pub mod serde_helpers;

pub use address::{CellAddress, Direction};
pub use columns::{ColumnWidth, ColumnWidths};
pub use self::core::{
    ColumnDef, ColumnKey, Document, Page, Row, Scene, COLUMNS, CURRENT_VERSION, DEFAULT_PAGE_NAME,
    SCREENPLAY_FORMAT,
};
pub use editor_state::{EditorState, PendingAction};
