//! Text handling inside a single cell
//!
//! - `markup`: stripping, escaping and inline formatting of cell fragments
//! - `cursor`: caret/selection offsets reported by the host
//! - `keys`: keydown resolution with IME composition gating

pub mod cursor;
pub mod keys;
pub mod markup;

pub use cursor::CellCaret;
pub use keys::{resolve_key, Composition, Key, KeyAction, KeyInput, Modifiers};
pub use markup::{apply_inline_style, escape_html, plain_len, strip_html, InlineStyle};
