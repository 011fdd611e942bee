//! Column widths and drag-resize state
//!
//! Widths are transient UI state: they start at each column's default width and
//! are never written to the screenplay file.

use serde::Serialize;

use super::core::{ColumnKey, COLUMNS};
use crate::error::EditError;

#[derive(Clone, Copy, Debug, PartialEq)]
struct ResizeDrag {
    column: ColumnKey,
    start_x: f32,
    start_width: f32,
}

/// Current width of every column plus an in-progress drag, if any
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnWidths {
    widths: [f32; 5],
    drag: Option<ResizeDrag>,
}

/// Snapshot handed to the host
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ColumnWidth {
    pub key: ColumnKey,
    pub width: f32,
}

impl Default for ColumnWidths {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnWidths {
    pub fn new() -> Self {
        let mut widths = [0.0; 5];
        for def in COLUMNS.iter() {
            widths[def.key.index()] = def.default_width;
        }
        Self { widths, drag: None }
    }

    pub fn width(&self, key: ColumnKey) -> f32 {
        self.widths[key.index()]
    }

    /// Set a width, clamped to the column's minimum; returns the applied width
    pub fn set_width(&mut self, key: ColumnKey, width: f32) -> f32 {
        let min = key.def().min_width;
        let applied = if width.is_finite() { width.max(min) } else { min };
        self.widths[key.index()] = applied;
        applied
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn begin_resize(&mut self, key: ColumnKey, x: f32) {
        self.drag = Some(ResizeDrag {
            column: key,
            start_x: x,
            start_width: self.width(key),
        });
    }

    /// Update the dragged column for pointer position `x`
    pub fn resize_to(&mut self, x: f32) -> Result<f32, EditError> {
        let drag = self.drag.ok_or(EditError::NotResizing)?;
        Ok(self.set_width(drag.column, drag.start_width + (x - drag.start_x)))
    }

    pub fn end_resize(&mut self) -> Option<ColumnKey> {
        self.drag.take().map(|d| d.column)
    }

    pub fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }

    pub fn snapshot(&self) -> Vec<ColumnWidth> {
        ColumnKey::ALL
            .iter()
            .map(|key| ColumnWidth {
                key: *key,
                width: self.width(*key),
            })
            .collect()
    }
}
