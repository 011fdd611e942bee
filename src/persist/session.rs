//! Mutation & persistence bridge
//!
//! `ScreenplaySession` owns the open file's [`EditorState`] and routes every
//! user action through navigation, paste or the structural operations. Content
//! edits are written after a quiet period (see [`Debouncer`]); structural edits
//! are written immediately. Listeners hear about every committed change.

use serde::Serialize;

use super::debounce::{Clock, Debouncer};
use super::store::TextFileStore;
use crate::config::EditorConfig;
use crate::error::EditError;
use crate::layout::graph::{layout_graph, NodePosition};
use crate::models::{
    CellAddress, ColumnKey, ColumnWidth, Direction, Document, EditorState, PendingAction,
};
use crate::parse::{parse_document, parse_paste, serialize_document};
use crate::structure::search::SearchMatch;
use crate::structure::stats::{self, SceneSummary};
use crate::structure::{navigation, operations, NavOutcome};
use crate::text::cursor::CellCaret;
use crate::text::keys::{resolve_key, Composition, KeyAction, KeyInput};
use crate::text::markup::{apply_inline_style, plain_len, InlineStyle};

pub type ListenerId = u64;

type ChangeListener = Box<dyn FnMut(&Document)>;

/// Outcome of the last write attempt
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saved,
    /// In-memory changes not yet written
    Dirty,
    Failed,
}

/// Result of a keydown in the selected cell
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyOutcome {
    pub action: KeyAction,
    pub prevent_default: bool,
    pub selected: Option<CellAddress>,
}

/// How a file open went
#[derive(Serialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OpenOutcome {
    /// Content parsed (possibly after recovery)
    Loaded,
    /// No content; started from a fresh document
    Created,
    /// Content present but unreadable; started from a fresh document
    Replaced,
}

pub struct ScreenplaySession<S: TextFileStore, C: Clock> {
    config: EditorConfig,
    store: S,
    clock: C,
    path: Option<String>,
    state: EditorState,
    debounce: Debouncer,
    status: SaveStatus,
    listeners: Vec<(ListenerId, ChangeListener)>,
    next_listener: ListenerId,
}

impl<S: TextFileStore, C: Clock> ScreenplaySession<S, C> {
    pub fn new(store: S, clock: C, config: EditorConfig) -> Self {
        let state = EditorState::with_page_name(
            Document::with_page_name(config.default_page_name.clone()),
            &config.default_page_name,
        );
        Self {
            debounce: Debouncer::new(config.debounce_ms),
            config,
            store,
            clock,
            path: None,
            state,
            status: SaveStatus::Saved,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn document(&self) -> &Document {
        self.state.document()
    }

    pub fn status(&self) -> SaveStatus {
        self.status
    }

    pub fn has_pending_write(&self) -> bool {
        self.debounce.is_pending()
    }

    pub fn selected(&self) -> Option<CellAddress> {
        self.state.selected()
    }

    /// Current document as persisted JSON
    pub fn serialize(&self) -> String {
        serialize_document(self.state.document())
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    pub fn on_document_change(&mut self, listener: impl FnMut(&Document) + 'static) -> ListenerId {
        let id = self.next_listener;
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn notify(&mut self) {
        let document = self.state.document();
        for (_, listener) in self.listeners.iter_mut() {
            listener(document);
        }
    }

    // ------------------------------------------------------------------
    // File lifecycle
    // ------------------------------------------------------------------

    /// Make `path` the active file; any pending write for the previous file is flushed first
    pub fn open_file(&mut self, path: &str) -> OpenOutcome {
        self.flush();
        log::info!("opening screenplay {}", path);

        let raw = self.store.read_text_file(path);
        let (document, outcome) = match raw.as_deref().map(parse_document) {
            Some(Some(doc)) => (doc, OpenOutcome::Loaded),
            Some(None) if raw.as_deref().map_or(false, |r| !r.trim().is_empty()) => {
                log::warn!(
                    "{} is not a readable screenplay; starting from an empty document",
                    path
                );
                (self.fresh_document(), OpenOutcome::Replaced)
            }
            _ => (self.fresh_document(), OpenOutcome::Created),
        };

        self.path = Some(path.to_string());
        self.state = EditorState::with_page_name(document, &self.config.default_page_name);
        self.status = SaveStatus::Saved;
        self.notify();
        outcome
    }

    /// Flush and forget the active file
    pub fn close_file(&mut self) {
        self.flush();
        if let Some(path) = self.path.take() {
            log::info!("closed screenplay {}", path);
        }
        self.state = EditorState::with_page_name(
            self.fresh_document(),
            &self.config.default_page_name,
        );
        self.status = SaveStatus::Saved;
    }

    fn fresh_document(&self) -> Document {
        Document::with_page_name(self.config.default_page_name.clone())
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    fn try_write(&mut self) -> Result<bool, EditError> {
        let path = self.path.as_deref().ok_or(EditError::NoFile)?;
        let content = serialize_document(self.state.document());
        let ok = self.store.write_text_file(path, &content);
        if ok {
            log::debug!("saved {} ({} bytes)", path, content.len());
            self.status = SaveStatus::Saved;
        } else {
            log::warn!("saving {} failed; changes remain in memory", path);
            self.status = SaveStatus::Failed;
        }
        Ok(ok)
    }

    // With no file open the change stays in memory and the status stays dirty
    fn write_now(&mut self) -> bool {
        match self.try_write() {
            Ok(ok) => ok,
            Err(_) => {
                self.status = SaveStatus::Dirty;
                false
            }
        }
    }

    /// Write the whole document now, dropping any pending debounced write
    pub fn save(&mut self) -> Result<bool, EditError> {
        self.debounce.cancel();
        self.try_write()
    }

    /// Host timer tick: write if the debounce window has elapsed
    pub fn poll(&mut self) -> bool {
        let now = self.clock.now_ms();
        if self.debounce.fire_if_due(now) {
            return self.write_now();
        }
        false
    }

    /// Write a pending debounced change right away
    pub fn flush(&mut self) -> bool {
        if self.debounce.cancel() {
            return self.write_now();
        }
        false
    }

    /// Content edit: schedule a coalesced write
    fn commit_content(&mut self) {
        self.status = SaveStatus::Dirty;
        self.debounce.schedule(self.clock.now_ms());
        self.state.refresh_search();
        self.notify();
    }

    /// Structural edit: write immediately (covers any pending content write)
    fn commit_structural(&mut self) {
        self.debounce.cancel();
        self.state.validate_selection();
        self.write_now();
        self.state.refresh_search();
        self.notify();
    }

    /// Transient change (collapse state): listeners only, nothing written
    fn commit_view(&mut self) {
        self.notify();
    }

    // ------------------------------------------------------------------
    // Cell content
    // ------------------------------------------------------------------

    /// Replace a cell's content on the current page
    pub fn edit_cell(&mut self, address: CellAddress, html: &str) -> Result<bool, EditError> {
        let changed = operations::set_cell(self.state.page_mut(), address, html)?;
        if changed {
            if self.state.selected() == Some(address) {
                let len = plain_len(html);
                self.state.caret.clamp(len);
            }
            self.commit_content();
        }
        Ok(changed)
    }

    pub fn edit_selected(&mut self, html: &str) -> Result<bool, EditError> {
        let address = self.state.selected().ok_or(EditError::NoSelection)?;
        self.edit_cell(address, html)
    }

    /// Wrap the selected text of the selected cell in inline markup
    pub fn format_selection(&mut self, style: InlineStyle) -> Result<bool, EditError> {
        let address = self.state.selected().ok_or(EditError::NoSelection)?;
        let (start, end) = self.state.caret.range();
        if start == end {
            return Ok(false);
        }
        let content = self
            .state
            .selected_content()
            .ok_or(EditError::RowOutOfRange {
                scene: address.scene_index,
                row: address.row_index,
            })?;
        let formatted = apply_inline_style(content, start, end, style);
        self.edit_cell(address, &formatted)
    }

    // ------------------------------------------------------------------
    // Selection & navigation
    // ------------------------------------------------------------------

    fn land(&mut self, outcome: Option<NavOutcome>) -> Option<CellAddress> {
        let outcome = outcome?;
        self.state.set_selected(outcome.address);
        if outcome.grew {
            self.commit_structural();
        }
        Some(outcome.address)
    }

    /// Select a cell; a row index one past the end creates that row
    pub fn select(&mut self, scene: usize, row: usize, column: ColumnKey) -> Option<CellAddress> {
        let outcome = navigation::select(self.state.page_mut(), scene, row, column);
        if outcome.is_none() {
            log::debug!("select({}, {}, {}) ignored: no such scene", scene, row, column);
        }
        self.land(outcome)
    }

    pub fn clear_selection(&mut self) {
        self.state.clear_selection();
    }

    pub fn navigate(&mut self, direction: Direction) -> Option<CellAddress> {
        let from = self.state.selected()?;
        let outcome = navigation::navigate(self.state.page_mut(), from, direction);
        self.land(outcome)
    }

    pub fn tab(&mut self, backward: bool) -> Option<CellAddress> {
        let from = self.state.selected()?;
        let outcome = navigation::tab(self.state.page_mut(), from, backward);
        self.land(outcome)
    }

    /// Caret/selection offsets inside the selected cell, as reported by the host
    pub fn set_caret(&mut self, offset: usize, anchor: usize) {
        let mut caret = CellCaret::new(offset, anchor);
        caret.clamp(self.state.selected_text_len());
        self.state.caret = caret;
    }

    pub fn composition_start(&mut self) {
        self.state.composition = Composition::Composing;
    }

    /// End IME composition, committing the cell's final content if given
    pub fn composition_end(&mut self, committed: Option<&str>) -> Result<bool, EditError> {
        self.state.composition = Composition::Idle;
        match committed {
            Some(html) => self.edit_selected(html),
            None => Ok(false),
        }
    }

    pub fn is_composing(&self) -> bool {
        self.state.composition == Composition::Composing
    }

    /// Dispatch a keydown for the selected cell
    pub fn handle_key(&mut self, input: KeyInput) -> KeyOutcome {
        let action = match self.state.selected() {
            Some(_) => resolve_key(
                &input,
                &self.state.caret,
                self.state.selected_text_len(),
                self.state.composition,
            ),
            None => KeyAction::PassThrough,
        };

        match action {
            KeyAction::Navigate { direction } => {
                self.navigate(direction);
            }
            KeyAction::Tab { backward } => {
                self.tab(backward);
            }
            KeyAction::Format { style } => {
                if let Err(e) = self.format_selection(style) {
                    log::debug!("format {:?} ignored: {}", style, e);
                }
            }
            KeyAction::PassThrough | KeyAction::Suppressed => {}
        }

        KeyOutcome {
            action,
            prevent_default: action.prevents_default(),
            selected: self.state.selected(),
        }
    }

    // ------------------------------------------------------------------
    // Rows & scenes
    // ------------------------------------------------------------------

    pub fn append_row(&mut self, scene: usize) -> Result<usize, EditError> {
        let row = operations::append_row(self.state.page_mut(), scene)?;
        self.commit_structural();
        Ok(row)
    }

    pub fn insert_row_after(&mut self, scene: usize, row: usize) -> Result<usize, EditError> {
        let new_row = operations::insert_row_after(self.state.page_mut(), scene, row)?;
        self.commit_structural();
        Ok(new_row)
    }

    /// Delete a row (no confirmation); the last row of a scene stays
    pub fn delete_row(&mut self, scene: usize, row: usize) -> Result<(), EditError> {
        if let Err(e) = operations::delete_row(self.state.page_mut(), scene, row) {
            log::debug!("delete_row({}, {}) ignored: {}", scene, row, e);
            return Err(e);
        }
        if let Some(sel) = self.state.selected() {
            if sel.scene_index == scene && sel.row_index >= row {
                self.state.clear_selection();
            }
        }
        self.commit_structural();
        Ok(())
    }

    /// Append a scene; returns (index, scene number)
    pub fn add_scene(&mut self) -> (usize, u32) {
        let added = operations::add_scene(self.state.page_mut());
        self.commit_structural();
        added
    }

    pub fn toggle_scene(&mut self, scene: usize) -> Result<bool, EditError> {
        let collapsed = operations::toggle_collapsed(self.state.page_mut(), scene)?;
        self.commit_view();
        Ok(collapsed)
    }

    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        operations::set_all_collapsed(self.state.page_mut(), collapsed);
        self.commit_view();
    }

    /// Ask to delete a scene of the current page; applied by [`Self::confirm_pending`]
    pub fn request_delete_scene(&mut self, scene: usize) -> Result<PendingAction, EditError> {
        if scene >= self.state.page().scenes.len() {
            return Err(EditError::SceneOutOfRange { scene });
        }
        let action = PendingAction::DeleteScene {
            page: self.state.current_page_index(),
            scene,
        };
        self.state.set_pending(action);
        Ok(action)
    }

    /// Ask to delete a page; applied by [`Self::confirm_pending`]
    pub fn request_delete_page(&mut self, page: usize) -> Result<PendingAction, EditError> {
        let pages = self.state.document().pages.len();
        if page >= pages {
            return Err(EditError::PageOutOfRange { page });
        }
        if pages == 1 {
            return Err(EditError::OnlyPage);
        }
        let action = PendingAction::DeletePage { page };
        self.state.set_pending(action);
        Ok(action)
    }

    pub fn cancel_pending(&mut self) -> Option<PendingAction> {
        self.state.take_pending()
    }

    /// Apply the destructive action the user just confirmed
    pub fn confirm_pending(&mut self) -> Result<PendingAction, EditError> {
        let action = self.state.take_pending().ok_or(EditError::NothingPending)?;
        match action {
            PendingAction::DeleteScene { page, scene } => {
                let target = self
                    .state
                    .document_mut()
                    .page_mut(page)
                    .ok_or(EditError::PageOutOfRange { page })?;
                operations::delete_scene(target, scene)?;
                if page == self.state.current_page_index() {
                    self.state.clear_selection();
                }
            }
            PendingAction::DeletePage { page } => {
                operations::delete_page(self.state.document_mut(), page)?;
                self.state.page_removed(page);
            }
        }
        log::info!("applied {:?}", action);
        self.commit_structural();
        Ok(action)
    }

    // ------------------------------------------------------------------
    // Pages
    // ------------------------------------------------------------------

    /// Add a page (default name "Page N") and make it current
    pub fn add_page(&mut self, name: Option<&str>) -> usize {
        let name = match name.map(str::trim).filter(|n| !n.is_empty()) {
            Some(n) => n.to_string(),
            None => format!("Page {}", self.state.document().pages.len() + 1),
        };
        let index = operations::add_page(self.state.document_mut(), name);
        if let Err(e) = self.state.set_current_page(index) {
            log::warn!("new page {} could not be made current: {}", index, e);
        }
        self.commit_structural();
        index
    }

    pub fn rename_page(&mut self, page: usize, name: &str) -> Result<(), EditError> {
        operations::rename_page(self.state.document_mut(), page, name)?;
        self.commit_structural();
        Ok(())
    }

    pub fn set_current_page(&mut self, page: usize) -> Result<(), EditError> {
        self.state.set_current_page(page)
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page_index()
    }

    // ------------------------------------------------------------------
    // Paste
    // ------------------------------------------------------------------

    /// Paste clipboard text at the selected cell
    ///
    /// `Ok(None)` means the text is not tabular and the host should paste normally.
    /// `Ok(Some(n))` is the number of pasted lines.
    pub fn paste(&mut self, text: &str) -> Result<Option<usize>, EditError> {
        let at = self.state.selected().ok_or(EditError::NoSelection)?;
        let Some(rows) = parse_paste(text, at.column_key) else {
            return Ok(None);
        };
        let inserted =
            operations::apply_paste(self.state.page_mut(), at.scene_index, at.row_index, &rows)?;
        log::debug!("pasted {} rows at {:?}", rows.len(), at);
        self.state.set_selected(CellAddress::new(
            at.scene_index,
            at.row_index + inserted,
            at.column_key,
        ));
        self.commit_structural();
        Ok(Some(rows.len()))
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Run a find; returns the number of matches
    pub fn search(&mut self, query: &str) -> usize {
        self.state.run_search(query)
    }

    pub fn clear_search(&mut self) {
        self.state.search.clear();
    }

    pub fn search_matches(&self) -> &[SearchMatch] {
        self.state.search.matches()
    }

    pub fn next_match(&mut self) -> Option<SearchMatch> {
        let found = self.state.search.next_match()?;
        self.reveal(found);
        Some(found)
    }

    pub fn prev_match(&mut self) -> Option<SearchMatch> {
        let found = self.state.search.prev_match()?;
        self.reveal(found);
        Some(found)
    }

    /// Switch to the match's page, expand its scene and select it
    fn reveal(&mut self, found: SearchMatch) {
        if self.state.set_current_page(found.page_index).is_err() {
            return;
        }
        let expanded =
            operations::set_collapsed(self.state.page_mut(), found.scene_index, false).is_ok();
        if expanded && found.address().resolves_in(self.state.page()) {
            self.state.set_selected(found.address());
        }
        self.commit_view();
    }

    // ------------------------------------------------------------------
    // Columns
    // ------------------------------------------------------------------

    pub fn column_widths(&self) -> Vec<ColumnWidth> {
        self.state.columns.snapshot()
    }

    pub fn set_column_width(&mut self, column: ColumnKey, width: f32) -> f32 {
        self.state.columns.set_width(column, width)
    }

    pub fn begin_resize(&mut self, column: ColumnKey, x: f32) {
        self.state.columns.begin_resize(column, x);
    }

    pub fn resize_to(&mut self, x: f32) -> Result<f32, EditError> {
        self.state.columns.resize_to(x)
    }

    pub fn end_resize(&mut self) -> Option<ColumnKey> {
        self.state.columns.end_resize()
    }

    pub fn reset_column_widths(&mut self) {
        self.state.columns.reset();
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    pub fn word_count(&self) -> usize {
        stats::word_count(self.state.document())
    }

    pub fn outline(&self) -> Vec<SceneSummary> {
        stats::outline(self.state.document())
    }

    /// Character relationship graph laid out with the configured canvas
    pub fn relationship_layout(&self) -> Vec<NodePosition> {
        let names = stats::character_names(self.state.document());
        let pairs = stats::character_pairs(self.state.document(), &names);
        layout_graph(&names, &pairs, &self.config.graph)
    }
}
