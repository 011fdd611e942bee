//! Spreadsheet paste ingestion
//!
//! Tab-separated clipboard text (as copied from a spreadsheet) becomes one
//! partial row per non-blank line, filled left to right from the starting column.

use serde::{Deserialize, Serialize};

use crate::models::{ColumnKey, Row};
use crate::text::markup::escape_html;

/// A row with only the pasted columns set
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct PartialRow {
    pub heading: Option<String>,
    pub character: Option<String>,
    pub dialogue: Option<String>,
    pub action: Option<String>,
    pub notes: Option<String>,
}

impl PartialRow {
    pub fn get(&self, key: ColumnKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    pub fn set(&mut self, key: ColumnKey, value: String) {
        *self.slot_mut(key) = Some(value);
    }

    fn slot(&self, key: ColumnKey) -> &Option<String> {
        match key {
            ColumnKey::Heading => &self.heading,
            ColumnKey::Character => &self.character,
            ColumnKey::Dialogue => &self.dialogue,
            ColumnKey::Action => &self.action,
            ColumnKey::Notes => &self.notes,
        }
    }

    fn slot_mut(&mut self, key: ColumnKey) -> &mut Option<String> {
        match key {
            ColumnKey::Heading => &mut self.heading,
            ColumnKey::Character => &mut self.character,
            ColumnKey::Dialogue => &mut self.dialogue,
            ColumnKey::Action => &mut self.action,
            ColumnKey::Notes => &mut self.notes,
        }
    }

    /// Overwrite the covered fields of `row`, leaving the rest untouched
    pub fn merge_into(&self, row: &mut Row) {
        for key in ColumnKey::ALL {
            if let Some(value) = self.get(key) {
                row.set(key, value);
            }
        }
    }

    /// Full row with uncovered fields empty
    pub fn to_row(&self) -> Row {
        let mut row = Row::new();
        self.merge_into(&mut row);
        row
    }
}

/// Parse clipboard text; `None` leaves the paste to the cell's default handling
pub fn parse_paste(text: &str, start_column: ColumnKey) -> Option<Vec<PartialRow>> {
    if !text.contains('\t') {
        return None;
    }

    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    let start = start_column.index();

    let rows: Vec<PartialRow> = normalized
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            let mut row = PartialRow::default();
            for (i, cell) in line.split('\t').enumerate() {
                // cells past the last column are dropped
                let Some(key) = ColumnKey::from_index(start + i) else {
                    break;
                };
                row.set(key, escape_html(cell));
            }
            row
        })
        .collect();

    if rows.is_empty() {
        None
    } else {
        Some(rows)
    }
}
