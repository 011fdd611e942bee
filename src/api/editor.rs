//! `ScreenplayEditor`: the JavaScript-facing editor class
//!
//! Wraps one [`ScreenplaySession`] whose file store and clock are backed by the
//! host. No-op edits return `false`/`null`; only undecodable arguments throw.

use js_sys::Function;
use wasm_bindgen::prelude::*;

use super::helpers::{column_from_str, deserialize, deserialize_tag, noop, serialize, to_js_error};
use super::types::{EditorSnapshot, SceneAdded, SearchSnapshot};
use crate::config::EditorConfig;
use crate::error::ScreenplayError;
use crate::models::{Direction, COLUMNS};
use crate::persist::{Clock, ScreenplaySession, TextFileStore};
use crate::text::{InlineStyle, KeyInput};
use crate::{wasm_info, wasm_log, wasm_warn};

/// File store backed by the host's `readTextFile` / `writeTextFile` callbacks
struct JsFileStore {
    read: Function,
    write: Function,
}

impl TextFileStore for JsFileStore {
    fn read_text_file(&self, path: &str) -> Option<String> {
        match self.read.call1(&JsValue::NULL, &JsValue::from_str(path)) {
            Ok(value) => value.as_string(),
            Err(e) => {
                wasm_warn!("readTextFile({}) threw: {:?}", path, e);
                None
            }
        }
    }

    // Anything but an explicit `false` counts as a successful write
    fn write_text_file(&mut self, path: &str, content: &str) -> bool {
        match self.write.call2(
            &JsValue::NULL,
            &JsValue::from_str(path),
            &JsValue::from_str(content),
        ) {
            Ok(value) => value.as_bool() != Some(false),
            Err(e) => {
                wasm_warn!("writeTextFile({}) threw: {:?}", path, e);
                false
            }
        }
    }
}

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_name = queueMicrotask)]
    fn queue_microtask(callback: &Function);
}

struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }
}

#[wasm_bindgen]
pub struct ScreenplayEditor {
    session: ScreenplaySession<JsFileStore, JsClock>,
}

#[wasm_bindgen]
impl ScreenplayEditor {
    /// Create an editor; `config` may be `undefined`, `null` or a partial object
    #[wasm_bindgen(constructor)]
    pub fn new(
        read_text_file: Function,
        write_text_file: Function,
        config: JsValue,
    ) -> Result<ScreenplayEditor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            let value: serde_json::Value = deserialize(config, "Invalid editor config")?;
            EditorConfig::from_value(value).map_err(|e| to_js_error(ScreenplayError::from(e)))?
        };
        wasm_info!("ScreenplayEditor created (debounce {}ms)", config.debounce_ms);

        let store = JsFileStore {
            read: read_text_file,
            write: write_text_file,
        };
        Ok(ScreenplayEditor {
            session: ScreenplaySession::new(store, JsClock, config),
        })
    }

    // ------------------------------------------------------------------
    // Files & persistence
    // ------------------------------------------------------------------

    /// Returns "loaded", "created" or "replaced"
    #[wasm_bindgen(js_name = openFile)]
    pub fn open_file(&mut self, path: &str) -> Result<JsValue, JsValue> {
        let outcome = self.session.open_file(path);
        serialize(&outcome, "Failed to serialize open outcome")
    }

    #[wasm_bindgen(js_name = closeFile)]
    pub fn close_file(&mut self) {
        self.session.close_file();
    }

    #[wasm_bindgen(js_name = getDocument)]
    pub fn get_document(&self) -> Result<JsValue, JsValue> {
        serialize(self.session.document(), "Failed to serialize document")
    }

    /// The document exactly as it would be written to disk
    #[wasm_bindgen(js_name = getDocumentJson)]
    pub fn get_document_json(&self) -> String {
        self.session.serialize()
    }

    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> Result<JsValue, JsValue> {
        let state = self.session.state();
        let snapshot = EditorSnapshot {
            path: self.session.path().map(str::to_string),
            current_page: state.current_page_index(),
            page_count: state.document().pages.len(),
            selected: state.selected(),
            caret: state.caret,
            composing: self.session.is_composing(),
            status: self.session.status(),
            has_pending_write: self.session.has_pending_write(),
            pending: state.pending(),
            search: SearchSnapshot {
                query: state.search.query().to_string(),
                match_count: state.search.matches().len(),
                current: state.search.current_index(),
            },
        };
        serialize(&snapshot, "Failed to serialize editor state")
    }

    /// Static column table (labels, default widths, placeholders)
    #[wasm_bindgen(js_name = getColumns)]
    pub fn get_columns(&self) -> Result<JsValue, JsValue> {
        serialize(&*COLUMNS, "Failed to serialize columns")
    }

    /// Host timer tick; returns true when a debounced write happened
    pub fn poll(&mut self) -> bool {
        self.session.poll()
    }

    pub fn flush(&mut self) -> bool {
        self.session.flush()
    }

    /// Write immediately; `false` when no file is open or the host write failed
    pub fn save(&mut self) -> bool {
        noop(self.session.save(), "save").unwrap_or(false)
    }

    #[wasm_bindgen(js_name = saveStatus)]
    pub fn save_status(&self) -> Result<JsValue, JsValue> {
        serialize(&self.session.status(), "Failed to serialize save status")
    }

    /// Call `callback(document)` after every committed change
    ///
    /// The callback runs as a microtask once the mutating call has returned, so
    /// it may call back into this editor. It receives the document as it was
    /// when the change was committed.
    #[wasm_bindgen(js_name = onDocumentChange)]
    pub fn on_document_change(&mut self, callback: Function) -> u32 {
        let id = self.session.on_document_change(move |doc| {
            match serde_wasm_bindgen::to_value(doc) {
                Ok(value) => queue_microtask(callback.bind1(&JsValue::NULL, &value).unchecked_ref()),
                Err(e) => wasm_warn!("document listener skipped: {}", e),
            }
        });
        id as u32
    }

    #[wasm_bindgen(js_name = removeListener)]
    pub fn remove_listener(&mut self, id: u32) -> bool {
        self.session.remove_listener(u64::from(id))
    }

    // ------------------------------------------------------------------
    // Cells & selection
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = editCell)]
    pub fn edit_cell(
        &mut self,
        scene: usize,
        row: usize,
        column: &str,
        html: &str,
    ) -> Result<bool, JsValue> {
        let column = column_from_str(column)?;
        let address = crate::models::CellAddress::new(scene, row, column);
        Ok(noop(self.session.edit_cell(address, html), "editCell").unwrap_or(false))
    }

    #[wasm_bindgen(js_name = editSelected)]
    pub fn edit_selected(&mut self, html: &str) -> bool {
        noop(self.session.edit_selected(html), "editSelected").unwrap_or(false)
    }

    /// Returns the selected address, or `null` when the scene does not exist
    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, scene: usize, row: usize, column: &str) -> Result<JsValue, JsValue> {
        let column = column_from_str(column)?;
        let selected = self.session.select(scene, row, column);
        serialize(&selected, "Failed to serialize selection")
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.session.clear_selection();
    }

    /// `direction` is "up", "down", "left" or "right"
    pub fn navigate(&mut self, direction: &str) -> Result<JsValue, JsValue> {
        let direction: Direction = deserialize_tag(direction, "Invalid direction")?;
        let selected = self.session.navigate(direction);
        serialize(&selected, "Failed to serialize selection")
    }

    /// Feed a keydown from the selected cell; the result says whether to preventDefault
    #[wasm_bindgen(js_name = handleKeyDown)]
    pub fn handle_key_down(
        &mut self,
        key: &str,
        shift: bool,
        ctrl: bool,
        meta: bool,
        alt: bool,
    ) -> Result<JsValue, JsValue> {
        let outcome = self
            .session
            .handle_key(KeyInput::from_dom(key, shift, ctrl, meta, alt));
        wasm_log!("keydown {} -> {:?}", key, outcome.action);
        serialize(&outcome, "Failed to serialize key outcome")
    }

    #[wasm_bindgen(js_name = setCaret)]
    pub fn set_caret(&mut self, offset: usize, anchor: usize) {
        self.session.set_caret(offset, anchor);
    }

    #[wasm_bindgen(js_name = compositionStart)]
    pub fn composition_start(&mut self) {
        self.session.composition_start();
    }

    /// End IME composition; `committed` is the cell's final HTML, if any
    #[wasm_bindgen(js_name = compositionEnd)]
    pub fn composition_end(&mut self, committed: Option<String>) -> bool {
        noop(
            self.session.composition_end(committed.as_deref()),
            "compositionEnd",
        )
        .unwrap_or(false)
    }

    /// `style` is "bold", "italic" or "underline"
    #[wasm_bindgen(js_name = formatSelection)]
    pub fn format_selection(&mut self, style: &str) -> Result<bool, JsValue> {
        let style: InlineStyle = deserialize_tag(style, "Invalid inline style")?;
        Ok(noop(self.session.format_selection(style), "formatSelection").unwrap_or(false))
    }

    // ------------------------------------------------------------------
    // Rows, scenes & pages
    // ------------------------------------------------------------------

    /// Returns the new row index, or `undefined` if the scene does not exist
    #[wasm_bindgen(js_name = appendRow)]
    pub fn append_row(&mut self, scene: usize) -> Option<usize> {
        noop(self.session.append_row(scene), "appendRow")
    }

    #[wasm_bindgen(js_name = insertRowAfter)]
    pub fn insert_row_after(&mut self, scene: usize, row: usize) -> Option<usize> {
        noop(self.session.insert_row_after(scene, row), "insertRowAfter")
    }

    #[wasm_bindgen(js_name = deleteRow)]
    pub fn delete_row(&mut self, scene: usize, row: usize) -> bool {
        noop(self.session.delete_row(scene, row), "deleteRow").is_some()
    }

    /// Returns `{ index, number }` of the new scene
    #[wasm_bindgen(js_name = addScene)]
    pub fn add_scene(&mut self) -> Result<JsValue, JsValue> {
        let (index, number) = self.session.add_scene();
        serialize(&SceneAdded { index, number }, "Failed to serialize scene")
    }

    /// Returns the new collapsed state, or `undefined` if the scene does not exist
    #[wasm_bindgen(js_name = toggleScene)]
    pub fn toggle_scene(&mut self, scene: usize) -> Option<bool> {
        noop(self.session.toggle_scene(scene), "toggleScene")
    }

    #[wasm_bindgen(js_name = setAllCollapsed)]
    pub fn set_all_collapsed(&mut self, collapsed: bool) {
        self.session.set_all_collapsed(collapsed);
    }

    #[wasm_bindgen(js_name = requestDeleteScene)]
    pub fn request_delete_scene(&mut self, scene: usize) -> bool {
        noop(self.session.request_delete_scene(scene), "requestDeleteScene").is_some()
    }

    #[wasm_bindgen(js_name = requestDeletePage)]
    pub fn request_delete_page(&mut self, page: usize) -> bool {
        noop(self.session.request_delete_page(page), "requestDeletePage").is_some()
    }

    #[wasm_bindgen(js_name = confirmPending)]
    pub fn confirm_pending(&mut self) -> bool {
        noop(self.session.confirm_pending(), "confirmPending").is_some()
    }

    #[wasm_bindgen(js_name = cancelPending)]
    pub fn cancel_pending(&mut self) -> bool {
        self.session.cancel_pending().is_some()
    }

    /// Add a page and switch to it; returns its index
    #[wasm_bindgen(js_name = addPage)]
    pub fn add_page(&mut self, name: Option<String>) -> usize {
        self.session.add_page(name.as_deref())
    }

    #[wasm_bindgen(js_name = renamePage)]
    pub fn rename_page(&mut self, page: usize, name: &str) -> bool {
        noop(self.session.rename_page(page, name), "renamePage").is_some()
    }

    #[wasm_bindgen(js_name = setCurrentPage)]
    pub fn set_current_page(&mut self, page: usize) -> bool {
        noop(self.session.set_current_page(page), "setCurrentPage").is_some()
    }

    #[wasm_bindgen(js_name = currentPage)]
    pub fn current_page(&self) -> usize {
        self.session.current_page()
    }

    // ------------------------------------------------------------------
    // Paste & search
    // ------------------------------------------------------------------

    /// Returns the number of pasted lines, or `undefined` when the host should paste normally
    pub fn paste(&mut self, text: &str) -> Option<usize> {
        noop(self.session.paste(text), "paste").flatten()
    }

    /// Returns the match count
    pub fn search(&mut self, query: &str) -> usize {
        self.session.search(query)
    }

    #[wasm_bindgen(js_name = nextMatch)]
    pub fn next_match(&mut self) -> Result<JsValue, JsValue> {
        let found = self.session.next_match();
        serialize(&found, "Failed to serialize search match")
    }

    #[wasm_bindgen(js_name = prevMatch)]
    pub fn prev_match(&mut self) -> Result<JsValue, JsValue> {
        let found = self.session.prev_match();
        serialize(&found, "Failed to serialize search match")
    }

    #[wasm_bindgen(js_name = clearSearch)]
    pub fn clear_search(&mut self) {
        self.session.clear_search();
    }

    // ------------------------------------------------------------------
    // Column widths
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = getColumnWidths)]
    pub fn get_column_widths(&self) -> Result<JsValue, JsValue> {
        serialize(&self.session.column_widths(), "Failed to serialize column widths")
    }

    #[wasm_bindgen(js_name = setColumnWidth)]
    pub fn set_column_width(&mut self, column: &str, width: f32) -> Result<f32, JsValue> {
        let column = column_from_str(column)?;
        Ok(self.session.set_column_width(column, width))
    }

    #[wasm_bindgen(js_name = beginColumnResize)]
    pub fn begin_column_resize(&mut self, column: &str, x: f32) -> Result<(), JsValue> {
        let column = column_from_str(column)?;
        self.session.begin_resize(column, x);
        Ok(())
    }

    /// Returns the dragged column's new width, or `undefined` when no drag is active
    #[wasm_bindgen(js_name = columnResizeTo)]
    pub fn column_resize_to(&mut self, x: f32) -> Option<f32> {
        noop(self.session.resize_to(x), "columnResizeTo")
    }

    #[wasm_bindgen(js_name = endColumnResize)]
    pub fn end_column_resize(&mut self) -> bool {
        self.session.end_resize().is_some()
    }

    #[wasm_bindgen(js_name = resetColumnWidths)]
    pub fn reset_column_widths(&mut self) {
        self.session.reset_column_widths();
    }

    // ------------------------------------------------------------------
    // Derived views
    // ------------------------------------------------------------------

    #[wasm_bindgen(js_name = wordCount)]
    pub fn word_count(&self) -> usize {
        self.session.word_count()
    }

    pub fn outline(&self) -> Result<JsValue, JsValue> {
        serialize(&self.session.outline(), "Failed to serialize outline")
    }

    /// Character relationship graph as `[{ id, x, y }]`
    #[wasm_bindgen(js_name = relationshipLayout)]
    pub fn relationship_layout(&self) -> Result<JsValue, JsValue> {
        serialize(
            &self.session.relationship_layout(),
            "Failed to serialize relationship layout",
        )
    }
}

impl Drop for ScreenplayEditor {
    fn drop(&mut self) {
        self.session.flush();
    }
}
