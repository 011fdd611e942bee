//! Screenplay Editor WASM Module
//!
//! Core of a grid-based screenplay editor: the five-column document model,
//! keyboard navigation across scenes, tab-separated paste, debounced persistence
//! through host callbacks and a force-directed character relationship layout.

pub mod api;
pub mod config;
pub mod error;
pub mod layout;
pub mod models;
pub mod parse;
pub mod persist;
pub mod structure;
pub mod text;

// Re-export commonly used types
pub use api::ScreenplayEditor;
pub use config::EditorConfig;
pub use error::{ConfigError, EditError, ParseError, ScreenplayError};
pub use models::{CellAddress, ColumnKey, Direction, Document, EditorState, Page, Row, Scene};
pub use persist::{ScreenplaySession, SaveStatus};

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
    }

    log::info!("Screenplay editor WASM module initialized");
}
