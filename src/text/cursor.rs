//! Caret tracking inside the focused cell
//!
//! Offsets are plain-text character positions (tags are zero-width). The host
//! reports them on every selection change so Left/Right can tell whether the
//! caret sits on an edge of the cell.

use serde::{Deserialize, Serialize};

/// Caret plus selection anchor within one cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellCaret {
    /// Current caret position (selection head)
    pub offset: usize,
    /// Where the selection started; equal to `offset` when nothing is selected
    pub anchor: usize,
}

impl CellCaret {
    pub fn new(offset: usize, anchor: usize) -> Self {
        Self { offset, anchor }
    }

    /// Caret with no selection
    pub fn collapsed(offset: usize) -> Self {
        Self {
            offset,
            anchor: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.offset == self.anchor
    }

    /// Selected range ordered start to end (exclusive end)
    pub fn range(&self) -> (usize, usize) {
        (self.offset.min(self.anchor), self.offset.max(self.anchor))
    }

    /// Collapsed caret at offset 0
    pub fn at_start(&self) -> bool {
        self.is_collapsed() && self.offset == 0
    }

    /// Collapsed caret at (or past) the end of `text_len` characters
    pub fn at_end(&self, text_len: usize) -> bool {
        self.is_collapsed() && self.offset >= text_len
    }

    /// Clamp both ends to the cell's text length
    pub fn clamp(&mut self, text_len: usize) {
        self.offset = self.offset.min(text_len);
        self.anchor = self.anchor.min(text_len);
    }
}
