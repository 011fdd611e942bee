//! Keyboard dispatch for grid cells
//!
//! Turns a DOM keydown into a [`KeyAction`]. Navigation and shortcuts are gated
//! by the IME composition mode: nothing fires until the composition ends.

use serde::{Deserialize, Serialize};

use super::cursor::CellCaret;
use super::markup::InlineStyle;
use crate::models::Direction;

/// Keys the grid cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Enter,
    Tab,
    Char(char),
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` value
    pub fn from_dom(key: &str) -> Key {
        match key {
            "ArrowUp" | "Up" => Key::ArrowUp,
            "ArrowDown" | "Down" => Key::ArrowDown,
            "ArrowLeft" | "Left" => Key::ArrowLeft,
            "ArrowRight" | "Right" => Key::ArrowRight,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(ch), None) => Key::Char(ch),
                    _ => Key::Other,
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.meta || self.alt)
    }

    /// Ctrl on Linux/Windows, Cmd on macOS
    pub fn command(&self) -> bool {
        self.ctrl || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub modifiers: Modifiers,
}

impl KeyInput {
    pub fn new(key: Key, modifiers: Modifiers) -> Self {
        Self { key, modifiers }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(key, Modifiers::none())
    }

    pub fn from_dom(key: &str, shift: bool, ctrl: bool, meta: bool, alt: bool) -> Self {
        Self::new(
            Key::from_dom(key),
            Modifiers {
                shift,
                ctrl,
                meta,
                alt,
            },
        )
    }
}

/// IME composition mode of the focused cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Composition {
    #[default]
    Idle,
    Composing,
}

/// What a keydown resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum KeyAction {
    Navigate { direction: Direction },
    Tab { backward: bool },
    Format { style: InlineStyle },
    /// Let the cell edit text normally
    PassThrough,
    /// Composition in progress; the IME owns the key
    Suppressed,
}

impl KeyAction {
    /// Whether the host should call `preventDefault()`
    pub fn prevents_default(&self) -> bool {
        matches!(
            self,
            KeyAction::Navigate { .. } | KeyAction::Tab { .. } | KeyAction::Format { .. }
        )
    }
}

/// Resolve a keydown in the focused cell
///
/// `text_len` is the plain-text length of the cell, used for the Right-arrow edge.
pub fn resolve_key(
    input: &KeyInput,
    caret: &CellCaret,
    text_len: usize,
    composition: Composition,
) -> KeyAction {
    if composition == Composition::Composing {
        return KeyAction::Suppressed;
    }
    let mods = input.modifiers;

    match input.key {
        Key::ArrowUp => KeyAction::Navigate {
            direction: Direction::Up,
        },
        Key::ArrowDown => KeyAction::Navigate {
            direction: Direction::Down,
        },
        Key::ArrowLeft if caret.at_start() => KeyAction::Navigate {
            direction: Direction::Left,
        },
        Key::ArrowRight if caret.at_end(text_len) => KeyAction::Navigate {
            direction: Direction::Right,
        },
        Key::Enter if mods.is_empty() => KeyAction::Navigate {
            direction: Direction::Down,
        },
        Key::Tab => KeyAction::Tab {
            backward: mods.shift,
        },
        Key::Char(ch) if mods.command() && !mods.alt => match InlineStyle::from_shortcut(ch) {
            Some(style) => KeyAction::Format { style },
            None => KeyAction::PassThrough,
        },
        _ => KeyAction::PassThrough,
    }
}
