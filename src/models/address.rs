//! Cell addressing within the current page

use serde::{Deserialize, Serialize};

use super::core::{ColumnKey, Page};

/// The unit of selection and navigation: (scene index, row index, column)
///
/// Indices refer to the current page. An address goes stale after a structural
/// mutation; use [`CellAddress::resolves_in`] before trusting an old one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct CellAddress {
    pub scene_index: usize,
    pub row_index: usize,
    pub column_key: ColumnKey,
}

impl CellAddress {
    pub fn new(scene_index: usize, row_index: usize, column_key: ColumnKey) -> Self {
        Self {
            scene_index,
            row_index,
            column_key,
        }
    }

    pub fn with_column(self, column_key: ColumnKey) -> Self {
        Self { column_key, ..self }
    }

    /// True when scene and row both exist on `page`
    pub fn resolves_in(&self, page: &Page) -> bool {
        page.row(self.scene_index, self.row_index).is_some()
    }
}

/// Arrow direction for grid navigation
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_in() {
        let page = Page::new("P");
        assert!(CellAddress::new(0, 0, ColumnKey::Notes).resolves_in(&page));
        assert!(!CellAddress::new(0, 1, ColumnKey::Notes).resolves_in(&page));
        assert!(!CellAddress::new(1, 0, ColumnKey::Notes).resolves_in(&page));
    }

    #[test]
    fn test_address_serializes_camel_case() {
        let json = serde_json::to_string(&CellAddress::new(1, 2, ColumnKey::Dialogue)).unwrap();
        assert_eq!(json, r#"{"sceneIndex":1,"rowIndex":2,"columnKey":"dialogue"}"#);
    }
}
