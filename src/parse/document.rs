//! Screenplay file parser with recovery
//!
//! The file is written as a whole on every save, so a partial write or an
//! accidental double write can leave trailing garbage. Strict parsing runs first;
//! when it fails, the first balanced top-level `{...}` is extracted and parsed
//! instead.

use serde_json::Value;

use crate::error::ParseError;
use crate::models::serde_helpers::lenient_seq;
use crate::models::{Document, Page, Scene, CURRENT_VERSION, DEFAULT_PAGE_NAME, SCREENPLAY_FORMAT};

/// Parse persisted content; `None` means "start from a fresh document"
pub fn parse_document(raw: &str) -> Option<Document> {
    match parse_document_str(raw) {
        Ok(doc) => Some(doc),
        Err(ParseError::Empty) => None,
        Err(e) => {
            log::warn!("screenplay content could not be parsed: {}", e);
            None
        }
    }
}

/// Parse an already-decoded JSON value (the host may hand over an object)
pub fn parse_document_value(value: Value) -> Option<Document> {
    match document_from_value(value) {
        Ok(doc) => Some(doc),
        Err(e) => {
            log::warn!("screenplay object rejected: {}", e);
            None
        }
    }
}

/// Strict parse, then recovery; the error is the recovery failure
pub fn parse_document_str(raw: &str) -> Result<Document, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => document_from_value(value),
        Err(strict_err) => {
            log::debug!("strict parse failed ({}), attempting recovery", strict_err);
            let object = first_balanced_object(raw).ok_or(ParseError::Unbalanced)?;
            let value: Value = serde_json::from_str(object)?;
            let doc = document_from_value(value)?;
            log::info!(
                "recovered screenplay from corrupted content ({} of {} bytes used)",
                object.len(),
                raw.len()
            );
            Ok(doc)
        }
    }
}

/// Apply the format check and legacy migration to a decoded value
fn document_from_value(value: Value) -> Result<Document, ParseError> {
    let format = value.get("format").and_then(Value::as_str);
    if format != Some(SCREENPLAY_FORMAT) {
        return Err(ParseError::NotScreenplay(format.map(str::to_string)));
    }

    if value.get("pages").map_or(false, Value::is_array) {
        return Ok(serde_json::from_value(value)?);
    }

    if let Some(scenes) = value.get("scenes").filter(|s| s.is_array()) {
        let scenes: Vec<Scene> = lenient_seq(scenes.clone())?;
        log::info!("migrating legacy screenplay ({} scenes) to paged layout", scenes.len());
        return Ok(Document {
            format: SCREENPLAY_FORMAT.to_string(),
            version: CURRENT_VERSION,
            pages: vec![Page {
                name: DEFAULT_PAGE_NAME.to_string(),
                scenes,
            }],
        });
    }

    Err(ParseError::MissingBody)
}

/// Slice of `raw` covering the first balanced top-level object
///
/// Braces inside string literals (including escaped quotes) are ignored.
pub fn first_balanced_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, byte) in raw.bytes().enumerate().skip(start) {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }
        match byte {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(&raw[start..=i]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Pretty-printed JSON in the persisted key order; collapse state is dropped
pub fn serialize_document(doc: &Document) -> String {
    match serde_json::to_string_pretty(doc) {
        Ok(json) => json,
        Err(e) => {
            // String-keyed plain structs cannot fail to serialize
            log::error!("screenplay serialization failed: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnKey, Row};

    fn sample() -> Document {
        let mut doc = Document::new();
        let page = &mut doc.pages[0];
        page.scenes[0].rows[0].set(ColumnKey::Heading, "INT. KITCHEN - NIGHT");
        page.scenes[0].rows[0].set(ColumnKey::Dialogue, "He said \"{not a brace}\"");
        let mut second = Scene::new(3);
        second.rows.push(Row::new());
        page.scenes.push(second);
        doc
    }

    #[test]
    fn test_empty_content_is_none() {
        assert!(parse_document("").is_none());
        assert!(parse_document("   \n").is_none());
        assert!(matches!(parse_document_str(""), Err(ParseError::Empty)));
    }

    #[test]
    fn test_round_trip() {
        let doc = sample();
        let json = serialize_document(&doc);
        let parsed = parse_document(&json).unwrap();
        assert_eq!(parsed, doc);
        assert_eq!(serialize_document(&parsed), json);
    }

    #[test]
    fn test_serialized_key_order() {
        let json = serialize_document(&Document::new());
        let format = json.find("\"format\"").unwrap();
        let version = json.find("\"version\"").unwrap();
        let pages = json.find("\"pages\"").unwrap();
        let name = json.find("\"name\"").unwrap();
        let scene = json.find("\"scene\"").unwrap();
        let rows = json.find("\"rows\"").unwrap();
        assert!(format < version && version < pages && pages < name);
        assert!(name < scene && scene < rows);
        let heading = json.find("\"heading\"").unwrap();
        let notes = json.find("\"notes\"").unwrap();
        assert!(rows < heading && heading < notes);
    }

    #[test]
    fn test_collapsed_not_persisted() {
        let mut doc = sample();
        doc.pages[0].scenes[1].collapsed = true;
        let json = serialize_document(&doc);
        assert!(!json.contains("collapsed"));
        let parsed = parse_document(&json).unwrap();
        assert!(!parsed.pages[0].scenes[1].collapsed);
    }

    #[test]
    fn test_recovers_from_trailing_garbage() {
        let doc = sample();
        let corrupted = format!("{}\n}}, \"pages\": [trunc", serialize_document(&doc));
        assert_eq!(parse_document(&corrupted), Some(doc));
    }

    #[test]
    fn test_recovers_from_double_write() {
        let doc = sample();
        let json = serialize_document(&doc);
        let doubled = format!("{}{}", json, json);
        assert_eq!(parse_document(&doubled), Some(doc));
    }

    #[test]
    fn test_balanced_object_skips_strings() {
        let raw = r#"xx{"a":"}\"{","b":{"c":1}}tail{"#;
        assert_eq!(first_balanced_object(raw), Some(r#"{"a":"}\"{","b":{"c":1}}"#));
        assert_eq!(first_balanced_object(r#"{"open":"#), None);
        assert_eq!(first_balanced_object("no braces"), None);
    }

    #[test]
    fn test_legacy_scenes_are_migrated() {
        let raw = r#"{"format":"screenplay","scenes":[{"scene":2,"rows":[{"heading":"EXT. PIER"}]}]}"#;
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.pages.len(), 1);
        assert_eq!(doc.pages[0].name, "Page 1");
        assert_eq!(doc.pages[0].scenes[0].scene, 2);
        assert_eq!(doc.pages[0].scenes[0].rows[0].heading, "EXT. PIER");
        assert_eq!(doc.pages[0].scenes[0].rows[0].notes, "");
    }

    #[test]
    fn test_rejects_foreign_json() {
        assert!(parse_document(r#"{"format":"novel","pages":[]}"#).is_none());
        assert!(parse_document(r#"{"format":"screenplay"}"#).is_none());
        assert!(parse_document("[1,2,3]").is_none());
        assert!(parse_document("not json at all").is_none());
    }

    #[test]
    fn test_missing_pieces_tolerated() {
        let raw = r#"{"format":"screenplay","pages":[{"scenes":[{"rows":[{}]}]}]}"#;
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.version, 2);
        assert_eq!(doc.pages[0].name, "");
        assert_eq!(doc.pages[0].scenes[0].scene, 1);
        assert!(doc.pages[0].scenes[0].rows[0].is_empty());
    }

    #[test]
    fn test_wrong_typed_leaves_keep_document() {
        let raw = r#"{"format":"screenplay","version":null,"pages":[{"name":"Act I","scenes":[
            {"scene":1,"rows":[{"heading":"INT. HOUSE","character":"ANNA","dialogue":"Hi","action":"","notes":null}]},
            {"scene":null,"rows":["broken",{"action":"Leaves."}]}
        ]}]}"#;
        let doc = parse_document(raw).unwrap();
        let scenes = &doc.pages[0].scenes;
        assert_eq!(doc.version, 2);
        assert_eq!(doc.pages[0].name, "Act I");
        assert_eq!(scenes[0].rows[0].heading, "INT. HOUSE");
        assert_eq!(scenes[0].rows[0].notes, "");
        assert_eq!(scenes[1].scene, 1);
        assert_eq!(scenes[1].rows.len(), 2);
        assert_eq!(scenes[1].rows[1].action, "Leaves.");
    }

    #[test]
    fn test_value_entry_point() {
        let value = serde_json::json!({"format": "screenplay", "version": 2, "pages": []});
        let doc = parse_document_value(value).unwrap();
        assert!(doc.pages.is_empty());
        assert!(parse_document_value(serde_json::json!({"format": 1})).is_none());
    }
}
