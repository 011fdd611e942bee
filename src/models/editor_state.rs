//! Editor state management
//!
//! `EditorState` is the single owner of the open screenplay plus everything the
//! grid needs that is never written to disk: current page, selected cell, caret,
//! IME mode, column widths, search and a pending destructive confirmation.

use serde::Serialize;

use super::address::CellAddress;
use super::columns::ColumnWidths;
use super::core::{Document, Page, DEFAULT_PAGE_NAME};
use crate::error::EditError;
use crate::structure::search::SearchState;
use crate::text::cursor::CellCaret;
use crate::text::keys::Composition;
use crate::text::markup::plain_len;

/// A destructive edit waiting for the user's confirmation
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PendingAction {
    DeleteScene { page: usize, scene: usize },
    DeletePage { page: usize },
}

/// Complete editor state for one open file
#[derive(Clone, Debug)]
pub struct EditorState {
    document: Document,
    current_page: usize,
    selected: Option<CellAddress>,

    /// Caret inside the selected cell, as last reported by the host
    pub caret: CellCaret,

    /// IME mode of the selected cell
    pub composition: Composition,

    pub columns: ColumnWidths,
    pub search: SearchState,
    pending: Option<PendingAction>,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(Document::new())
    }
}

impl EditorState {
    /// Take ownership of a document, repairing empty containers first
    pub fn new(document: Document) -> Self {
        Self::with_page_name(document, DEFAULT_PAGE_NAME)
    }

    pub fn with_page_name(mut document: Document, default_page_name: &str) -> Self {
        if document.normalize(default_page_name) {
            log::warn!("screenplay had empty pages/scenes; repaired on load");
        }
        Self {
            document,
            current_page: 0,
            selected: None,
            caret: CellCaret::default(),
            composition: Composition::Idle,
            columns: ColumnWidths::new(),
            search: SearchState::new(),
            pending: None,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Mutable access for operations that keep the structural invariants
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    pub fn current_page_index(&self) -> usize {
        self.current_page
    }

    pub fn page(&self) -> &Page {
        &self.document.pages[self.current_page]
    }

    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.document.pages[self.current_page]
    }

    /// Switch pages; the selection belongs to the old page and is cleared
    pub fn set_current_page(&mut self, index: usize) -> Result<(), EditError> {
        if index >= self.document.pages.len() {
            return Err(EditError::PageOutOfRange { page: index });
        }
        if index != self.current_page {
            self.current_page = index;
            self.clear_selection();
        }
        Ok(())
    }

    /// Keep the current page index inside the page list (after deletions)
    pub fn clamp_current_page(&mut self) {
        let last = self.document.pages.len().saturating_sub(1);
        if self.current_page > last {
            self.current_page = last;
            self.clear_selection();
        }
    }

    /// Keep the same page current after the page at `index` was removed
    pub(crate) fn page_removed(&mut self, index: usize) {
        if index < self.current_page {
            self.current_page -= 1;
        } else if index == self.current_page {
            self.clear_selection();
        }
        self.clamp_current_page();
    }

    pub fn selected(&self) -> Option<CellAddress> {
        self.selected
    }

    /// Move the selection; caret and IME state reset for the new cell
    pub fn set_selected(&mut self, address: CellAddress) {
        if self.selected != Some(address) {
            self.caret = CellCaret::default();
            self.composition = Composition::Idle;
        }
        self.selected = Some(address);
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.caret = CellCaret::default();
        self.composition = Composition::Idle;
    }

    /// Drop the selection if a structural edit made it stale
    pub fn validate_selection(&mut self) {
        if let Some(address) = self.selected {
            if !address.resolves_in(self.page()) {
                log::debug!("selection {:?} went stale; cleared", address);
                self.clear_selection();
            }
        }
    }

    /// Content of the selected cell, if any
    pub fn selected_content(&self) -> Option<&str> {
        let address = self.selected?;
        self.page()
            .row(address.scene_index, address.row_index)
            .map(|row| row.get(address.column_key))
    }

    /// Plain-text length of the selected cell (0 without a selection)
    pub fn selected_text_len(&self) -> usize {
        self.selected_content().map_or(0, plain_len)
    }

    /// Run a new find over the whole document; returns the match count
    pub fn run_search(&mut self, query: &str) -> usize {
        self.search.search(&self.document, query)
    }

    /// Re-run the active query after an edit
    pub fn refresh_search(&mut self) {
        self.search.refresh(&self.document);
    }

    pub fn pending(&self) -> Option<PendingAction> {
        self.pending
    }

    pub fn set_pending(&mut self, action: PendingAction) {
        self.pending = Some(action);
    }

    pub fn take_pending(&mut self) -> Option<PendingAction> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColumnKey, Page};

    fn two_page_state() -> EditorState {
        let mut doc = Document::new();
        doc.pages.push(Page::new("Page 2"));
        EditorState::new(doc)
    }

    #[test]
    fn test_new_repairs_empty_document() {
        let doc = Document {
            pages: vec![],
            ..Document::new()
        };
        let state = EditorState::new(doc);
        assert_eq!(state.document().pages.len(), 1);
        assert_eq!(state.page().scenes.len(), 1);
    }

    #[test]
    fn test_switching_page_clears_selection() {
        let mut state = two_page_state();
        state.set_selected(CellAddress::new(0, 0, ColumnKey::Heading));
        state.set_current_page(1).unwrap();
        assert_eq!(state.current_page_index(), 1);
        assert!(state.selected().is_none());
        assert!(state.set_current_page(5).is_err());
    }

    #[test]
    fn test_clamp_current_page() {
        let mut state = two_page_state();
        state.set_current_page(1).unwrap();
        state.document_mut().pages.pop();
        state.clamp_current_page();
        assert_eq!(state.current_page_index(), 0);
    }

    #[test]
    fn test_page_removed_before_current_keeps_page() {
        let mut state = two_page_state();
        state.document_mut().pages.push(Page::new("Page 3"));
        state.set_current_page(2).unwrap();
        state.document_mut().pages.remove(0);
        state.page_removed(0);
        assert_eq!(state.current_page_index(), 1);
        assert_eq!(state.page().name, "Page 3");
    }

    #[test]
    fn test_validate_selection_drops_stale_address() {
        let mut state = EditorState::default();
        state.set_selected(CellAddress::new(0, 3, ColumnKey::Notes));
        state.validate_selection();
        assert!(state.selected().is_none());
    }

    #[test]
    fn test_search_follows_document_edits() {
        let mut state = EditorState::default();
        state.page_mut().scenes[0].rows[0].set(ColumnKey::Dialogue, "Hello");
        assert_eq!(state.run_search("hello"), 1);

        state.page_mut().scenes[0].rows[0].set(ColumnKey::Notes, "hello again");
        state.refresh_search();
        assert_eq!(state.search.matches().len(), 2);
        assert_eq!(state.search.query(), "hello");
    }

    #[test]
    fn test_selected_text_len_uses_plain_text() {
        let mut state = EditorState::default();
        state.page_mut().scenes[0].rows[0].set(ColumnKey::Action, "<b>run</b>&amp;");
        state.set_selected(CellAddress::new(0, 0, ColumnKey::Action));
        assert_eq!(state.selected_text_len(), 4);
    }
}
