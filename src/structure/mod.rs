//! Operations over the screenplay tree
//!
//! - `navigation`: selection movement and auto-grow
//! - `operations`: structural and content mutations
//! - `search`: document-wide find
//! - `stats`: word counts, outline and character graph input

pub mod navigation;
pub mod operations;
pub mod search;
pub mod stats;

pub use navigation::{navigate, select, tab, NavOutcome};
pub use search::{find, SearchMatch, SearchState};
pub use stats::{character_names, character_pairs, outline, word_count, SceneSummary};
