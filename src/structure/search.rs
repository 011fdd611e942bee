//! Find across the whole document
//!
//! Matching is a case-insensitive substring test over stripped cell text.
//! Results come back in document order (page, scene, row, column) and the
//! cursor over them wraps in both directions.

use serde::Serialize;

use crate::models::{CellAddress, ColumnKey, Document};
use crate::text::markup::strip_html;

/// One matching cell
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub page_index: usize,
    pub scene_index: usize,
    pub row_index: usize,
    pub column_key: ColumnKey,
}

impl SearchMatch {
    /// Address of the match within its page
    pub fn address(&self) -> CellAddress {
        CellAddress::new(self.scene_index, self.row_index, self.column_key)
    }
}

/// All matches for `query`; an empty query matches nothing
pub fn find(doc: &Document, query: &str) -> Vec<SearchMatch> {
    let needle = query.to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for (page_index, page) in doc.pages.iter().enumerate() {
        for (scene_index, scene) in page.scenes.iter().enumerate() {
            for (row_index, row) in scene.rows.iter().enumerate() {
                for column_key in ColumnKey::ALL {
                    let text = row.get(column_key);
                    if text.is_empty() {
                        continue;
                    }
                    if strip_html(text).to_lowercase().contains(&needle) {
                        matches.push(SearchMatch {
                            page_index,
                            scene_index,
                            row_index,
                            column_key,
                        });
                    }
                }
            }
        }
    }
    matches
}

/// Query, its matches and the active match
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchState {
    query: String,
    matches: Vec<SearchMatch>,
    current: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run a new query; returns the match count
    pub fn search(&mut self, doc: &Document, query: &str) -> usize {
        self.query = query.to_string();
        self.matches = find(doc, query);
        self.current = None;
        self.matches.len()
    }

    /// Re-run the current query after the document changed
    pub fn refresh(&mut self, doc: &Document) {
        if self.query.is_empty() {
            return;
        }
        self.matches = find(doc, &self.query);
        self.current = match self.current {
            Some(_) if self.matches.is_empty() => None,
            Some(i) => Some(i.min(self.matches.len() - 1)),
            None => None,
        };
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[SearchMatch] {
        &self.matches
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current(&self) -> Option<SearchMatch> {
        self.current.and_then(|i| self.matches.get(i).copied())
    }

    /// Advance to the next match, wrapping after the last
    pub fn next_match(&mut self) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let next = self.current.map_or(0, |i| (i + 1) % self.matches.len());
        self.current = Some(next);
        self.current()
    }

    /// Step back to the previous match, wrapping before the first
    pub fn prev_match(&mut self) -> Option<SearchMatch> {
        if self.matches.is_empty() {
            return None;
        }
        let len = self.matches.len();
        let prev = self.current.map_or(len - 1, |i| (i + len - 1) % len);
        self.current = Some(prev);
        self.current()
    }
}
