//! Error types for the screenplay core
//!
//! Every failure in this crate is recoverable: parse errors fall back to a default
//! document and edit errors turn the requested mutation into a no-op. The enums
//! exist so callers (and tests) can tell *why* nothing happened.

use thiserror::Error;

/// Failure while reading persisted screenplay content
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("content is empty")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not a screenplay document (format = {0:?})")]
    NotScreenplay(Option<String>),

    #[error("screenplay document has neither `pages` nor `scenes`")]
    MissingBody,

    #[error("no balanced top-level object found")]
    Unbalanced,
}

/// A structural or content edit that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("page {page} does not exist")]
    PageOutOfRange { page: usize },

    #[error("scene {scene} does not exist on the current page")]
    SceneOutOfRange { scene: usize },

    #[error("row {row} does not exist in scene {scene}")]
    RowOutOfRange { scene: usize, row: usize },

    #[error("a scene must keep at least one row")]
    LastRow,

    #[error("the only page cannot be deleted")]
    OnlyPage,

    #[error("no cell is selected")]
    NoSelection,

    #[error("nothing is waiting for confirmation")]
    NothingPending,

    #[error("no file is open")]
    NoFile,

    #[error("unknown column `{0}`")]
    UnknownColumn(String),

    #[error("no column is being resized")]
    NotResizing,
}

/// Invalid editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Umbrella error for the JS-facing layer
#[derive(Debug, Error)]
pub enum ScreenplayError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("value conversion failed: {0}")]
    Conversion(String),
}
