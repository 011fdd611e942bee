//! Shared helpers for WASM API operations
//!
//! Logging macros, serde conversions between Rust values and `JsValue`, and
//! argument decoding used by every exported method.

use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::error::ScreenplayError;
use crate::models::ColumnKey;

// ============================================================================
// Logging Macros
// ============================================================================

/// Log a debug message with [WASM] prefix
#[macro_export]
macro_rules! wasm_log {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_debug(&format!($($arg)*))
    };
}

/// Log an info message with [WASM] prefix
#[macro_export]
macro_rules! wasm_info {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_info(&format!($($arg)*))
    };
}

/// Log a warning message with [WASM] ⚠️ prefix
#[macro_export]
macro_rules! wasm_warn {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_warn(&format!($($arg)*))
    };
}

/// Log an error message with [WASM] ❌ prefix
#[macro_export]
macro_rules! wasm_error {
    ($($arg:tt)*) => {
        $crate::api::helpers::log_error(&format!($($arg)*))
    };
}

// ============================================================================
// Logging Helper Functions (called by macros)
// ============================================================================

// Routed through `log` so console_log decides the console method in the browser
// and native test builds never touch the JS console.

pub fn log_debug(msg: &str) {
    log::debug!("[WASM] {}", msg);
}

pub fn log_info(msg: &str) {
    log::info!("[WASM] {}", msg);
}

pub fn log_warn(msg: &str) {
    log::warn!("[WASM] ⚠️ {}", msg);
}

pub fn log_error(msg: &str) {
    log::error!("[WASM] ❌ {}", msg);
}

// ============================================================================
// Serialization/Deserialization Helpers
// ============================================================================

/// Deserialize a value from JavaScript with automatic error handling
pub fn deserialize<T: DeserializeOwned>(value: JsValue, error_context: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| {
        to_js_error(ScreenplayError::Conversion(format!("{}: {}", error_context, e)))
    })
}

/// Serialize a value to JavaScript with automatic error handling
pub fn serialize<T: Serialize>(value: &T, error_context: &str) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| {
        to_js_error(ScreenplayError::Conversion(format!("{}: {}", error_context, e)))
    })
}

/// Decode a lowercase enum tag such as `"down"` or `"bold"`
pub fn deserialize_tag<T: DeserializeOwned>(tag: &str, error_context: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(tag.to_string())).map_err(|e| {
        to_js_error(ScreenplayError::Conversion(format!("{}: {}", error_context, e)))
    })
}

// ============================================================================
// Validation Helpers
// ============================================================================

/// Parse a column key, rejecting anything outside the five screenplay columns
pub fn column_from_str(column: &str) -> Result<ColumnKey, JsValue> {
    column
        .parse::<ColumnKey>()
        .map_err(|e| to_js_error(ScreenplayError::from(e)))
}

// ============================================================================
// Result Conversion Helpers
// ============================================================================

/// Convert a crate error to a JsValue
pub fn to_js_error(err: ScreenplayError) -> JsValue {
    let msg = err.to_string();
    wasm_error!("{}", msg);
    JsValue::from_str(&msg)
}

/// Log a no-op edit and report it as `false`
pub fn noop<T>(result: Result<T, crate::error::EditError>, context: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            log_debug(&format!("{} ignored: {}", context, e));
            None
        }
    }
}
