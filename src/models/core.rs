//! Core data structures for the screenplay grid
//!
//! A screenplay document nests pages → scenes → rows, and every row carries the
//! same five text columns. Cell values are inline HTML fragments (bold, italic,
//! underline markup only); structure never lives inside a cell.

use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use super::serde_helpers::{
    lenient_rows, lenient_scene_number, lenient_seq, lenient_string, lenient_version,
};
use crate::error::EditError;

/// Value of the `format` field in every persisted screenplay
pub const SCREENPLAY_FORMAT: &str = "screenplay";

/// Current on-disk version (version 1 is the legacy top-level `scenes` layout)
pub const CURRENT_VERSION: u32 = 2;

/// Name given to the page wrapped around legacy scene lists and to fresh documents
pub const DEFAULT_PAGE_NAME: &str = "Page 1";

/// One of the five fixed screenplay columns
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKey {
    Heading,
    Character,
    Dialogue,
    Action,
    Notes,
}

impl ColumnKey {
    /// Columns in display order; this order drives Tab/Left/Right and paste fill
    pub const ALL: [ColumnKey; 5] = [
        ColumnKey::Heading,
        ColumnKey::Character,
        ColumnKey::Dialogue,
        ColumnKey::Action,
        ColumnKey::Notes,
    ];

    pub fn index(self) -> usize {
        match self {
            ColumnKey::Heading => 0,
            ColumnKey::Character => 1,
            ColumnKey::Dialogue => 2,
            ColumnKey::Action => 3,
            ColumnKey::Notes => 4,
        }
    }

    pub fn from_index(index: usize) -> Option<ColumnKey> {
        Self::ALL.get(index).copied()
    }

    pub fn first() -> ColumnKey {
        ColumnKey::Heading
    }

    pub fn last() -> ColumnKey {
        ColumnKey::Notes
    }

    /// Next column to the right, `None` at the right edge
    pub fn next(self) -> Option<ColumnKey> {
        Self::from_index(self.index() + 1)
    }

    /// Previous column to the left, `None` at the left edge
    pub fn prev(self) -> Option<ColumnKey> {
        self.index().checked_sub(1).and_then(Self::from_index)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKey::Heading => "heading",
            ColumnKey::Character => "character",
            ColumnKey::Dialogue => "dialogue",
            ColumnKey::Action => "action",
            ColumnKey::Notes => "notes",
        }
    }

    /// Static definition (label, widths, placeholder) for this column
    pub fn def(self) -> &'static ColumnDef {
        &COLUMNS[self.index()]
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnKey {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| EditError::UnknownColumn(s.to_string()))
    }
}

/// Static column metadata shown by the grid header
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDef {
    pub key: ColumnKey,
    pub label: &'static str,
    pub default_width: f32,
    pub min_width: f32,
    pub placeholder: &'static str,
}

lazy_static! {
    /// Column table in display order
    pub static ref COLUMNS: Vec<ColumnDef> = vec![
        ColumnDef {
            key: ColumnKey::Heading,
            label: "Scene Heading",
            default_width: 180.0,
            min_width: 80.0,
            placeholder: "INT. LOCATION - DAY",
        },
        ColumnDef {
            key: ColumnKey::Character,
            label: "Character",
            default_width: 140.0,
            min_width: 80.0,
            placeholder: "CHARACTER",
        },
        ColumnDef {
            key: ColumnKey::Dialogue,
            label: "Dialogue",
            default_width: 320.0,
            min_width: 120.0,
            placeholder: "Dialogue…",
        },
        ColumnDef {
            key: ColumnKey::Action,
            label: "Action",
            default_width: 260.0,
            min_width: 120.0,
            placeholder: "Action…",
        },
        ColumnDef {
            key: ColumnKey::Notes,
            label: "Notes",
            default_width: 200.0,
            min_width: 80.0,
            placeholder: "Notes…",
        },
    ];
}

/// One line of screenplay data across the five columns
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Row {
    #[serde(deserialize_with = "lenient_string")]
    pub heading: String,
    #[serde(deserialize_with = "lenient_string")]
    pub character: String,
    #[serde(deserialize_with = "lenient_string")]
    pub dialogue: String,
    #[serde(deserialize_with = "lenient_string")]
    pub action: String,
    #[serde(deserialize_with = "lenient_string")]
    pub notes: String,
}

impl Row {
    /// Create an empty row (all five fields empty)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: ColumnKey) -> &str {
        match key {
            ColumnKey::Heading => &self.heading,
            ColumnKey::Character => &self.character,
            ColumnKey::Dialogue => &self.dialogue,
            ColumnKey::Action => &self.action,
            ColumnKey::Notes => &self.notes,
        }
    }

    pub fn get_mut(&mut self, key: ColumnKey) -> &mut String {
        match key {
            ColumnKey::Heading => &mut self.heading,
            ColumnKey::Character => &mut self.character,
            ColumnKey::Dialogue => &mut self.dialogue,
            ColumnKey::Action => &mut self.action,
            ColumnKey::Notes => &mut self.notes,
        }
    }

    /// Replace one field; returns true when the value actually changed
    pub fn set(&mut self, key: ColumnKey, value: impl Into<String>) -> bool {
        let value = value.into();
        let slot = self.get_mut(key);
        if *slot == value {
            return false;
        }
        *slot = value;
        true
    }

    pub fn is_empty(&self) -> bool {
        ColumnKey::ALL.iter().all(|key| self.get(*key).is_empty())
    }
}

/// A numbered group of rows
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Scene {
    /// Display number; a stable identifier, not a position
    #[serde(default = "default_scene_number", deserialize_with = "lenient_scene_number")]
    pub scene: u32,

    /// UI-only collapse state (never persisted)
    #[serde(skip)]
    pub collapsed: bool,

    #[serde(default, deserialize_with = "lenient_rows")]
    pub rows: Vec<Row>,
}

fn default_scene_number() -> u32 {
    1
}

impl Scene {
    /// Create an expanded scene with a single empty row
    pub fn new(number: u32) -> Self {
        Self {
            scene: number,
            collapsed: false,
            rows: vec![Row::new()],
        }
    }

    /// Visible to arrow navigation: expanded and non-empty
    pub fn is_navigable(&self) -> bool {
        !self.collapsed && !self.rows.is_empty()
    }
}

/// A worksheet-like tab of scenes
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Page {
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub scenes: Vec<Scene>,
}

impl Page {
    /// Create a page holding scene 1 with one empty row
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scenes: vec![Scene::new(1)],
        }
    }

    /// Number for the next scene: max existing number + 1 (gaps are kept)
    pub fn next_scene_number(&self) -> u32 {
        self.scenes.iter().map(|s| s.scene).max().map_or(1, |max| max + 1)
    }

    pub fn row(&self, scene: usize, row: usize) -> Option<&Row> {
        self.scenes.get(scene)?.rows.get(row)
    }

    pub fn row_mut(&mut self, scene: usize, row: usize) -> Option<&mut Row> {
        self.scenes.get_mut(scene)?.rows.get_mut(row)
    }
}

/// The whole screenplay file
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Document {
    pub format: String,

    #[serde(default = "default_version", deserialize_with = "lenient_version")]
    pub version: u32,

    #[serde(default, deserialize_with = "lenient_seq")]
    pub pages: Vec<Page>,
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Fresh document: one page, one scene, one empty row
    pub fn new() -> Self {
        Self::with_page_name(DEFAULT_PAGE_NAME)
    }

    pub fn with_page_name(name: impl Into<String>) -> Self {
        Self {
            format: SCREENPLAY_FORMAT.to_string(),
            version: CURRENT_VERSION,
            pages: vec![Page::new(name)],
        }
    }

    /// Restore the structural invariants after loading untrusted content
    ///
    /// Returns true when anything had to be repaired.
    pub fn normalize(&mut self, default_page_name: &str) -> bool {
        let mut repaired = false;
        if self.pages.is_empty() {
            self.pages.push(Page::new(default_page_name));
            repaired = true;
        }
        for page in &mut self.pages {
            if page.scenes.is_empty() {
                page.scenes.push(Scene::new(1));
                repaired = true;
            }
            for scene in &mut page.scenes {
                if scene.rows.is_empty() {
                    scene.rows.push(Row::new());
                    repaired = true;
                }
            }
        }
        repaired
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }

    pub fn page_mut(&mut self, index: usize) -> Option<&mut Page> {
        self.pages.get_mut(index)
    }

    /// Total number of rows across all pages
    pub fn row_count(&self) -> usize {
        self.pages
            .iter()
            .flat_map(|p| p.scenes.iter())
            .map(|s| s.rows.len())
            .sum()
    }
}
