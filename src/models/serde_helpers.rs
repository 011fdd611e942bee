//! Serde helpers for reading screenplay files written by older or foreign tools
//!
//! A wrong-typed leaf (a `null` cell, a string scene number, a row that is not
//! an object) degrades to a default instead of failing the whole document.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::core::{Row, CURRENT_VERSION};

fn u32_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Strings pass through, numbers and booleans are stringified, anything else is `""`
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

/// Scene number, falling back to 1
pub fn lenient_scene_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u32_from_value(&Value::deserialize(deserializer)?).unwrap_or(1))
}

/// Format version, falling back to the current one
pub fn lenient_version<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u32_from_value(&Value::deserialize(deserializer)?).unwrap_or(CURRENT_VERSION))
}

/// Sequence whose unreadable entries are dropped; a non-array is empty
pub fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("skipping unreadable screenplay entry: {}", e);
                None
            }
        })
        .collect())
}

/// Rows keep their position: an unreadable row becomes an empty one
pub fn lenient_rows<'de, D>(deserializer: D) -> Result<Vec<Row>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => Row::deserialize(item).unwrap_or_default(),
            _ => {
                log::warn!("replacing non-object row with an empty row");
                Row::default()
            }
        })
        .collect())
}
