//! Editor configuration
//!
//! Every field has a default, so the host may pass a partial object (or nothing).
//! JSON is what the JS constructor hands over; YAML is accepted for config files
//! shipped next to the app.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::layout::graph::GraphLayoutConfig;
use crate::models::DEFAULT_PAGE_NAME;

/// Quiet period before a content edit is written, in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub debounce_ms: u64,
    pub default_page_name: String,
    pub graph: GraphLayoutConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
            default_page_name: DEFAULT_PAGE_NAME.to_string(),
            graph: GraphLayoutConfig::default(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_json::from_str(json)?;
        config.validate()
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = serde_yaml::from_str(yaml)?;
        config.validate()
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        if value.is_null() {
            return Ok(Self::default());
        }
        let config: EditorConfig = serde_json::from_value(value)?;
        config.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.default_page_name.trim().is_empty() {
            return Err(ConfigError::Invalid("defaultPageName must not be empty".into()));
        }
        self.graph.validate()?;
        Ok(self)
    }
}
