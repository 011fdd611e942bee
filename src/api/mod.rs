//! Screenplay editor WASM API
//!
//! # Module Structure
//!
//! - `helpers`: logging macros, serde conversions and argument decoding
//! - `types`: result shapes that only exist at the JS boundary
//! - `editor`: the exported `ScreenplayEditor` class

pub mod helpers;
pub mod types;
pub mod editor;

pub use editor::ScreenplayEditor;
