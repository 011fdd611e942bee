//! Inline markup helpers for cell content
//!
//! Cells hold inline HTML fragments. Plain-text offsets (what the host caret
//! reports) count each decoded character once, so `&amp;` is one position and
//! tags are zero-width.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("static tag pattern"));

/// Entities produced by [`escape_html`] or by the host's rich-text cell
const ENTITIES: [(&str, char); 7] = [
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
    ("&apos;", '\''),
    ("&nbsp;", ' '),
    ("&amp;", '&'),
];

/// Inline formatting available through Ctrl/Cmd+B/I/U
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InlineStyle {
    Bold,
    Italic,
    Underline,
}

impl InlineStyle {
    fn tags(self) -> (&'static str, &'static str) {
        match self {
            InlineStyle::Bold => ("<b>", "</b>"),
            InlineStyle::Italic => ("<i>", "</i>"),
            InlineStyle::Underline => ("<u>", "</u>"),
        }
    }

    /// Style bound to a Ctrl/Cmd shortcut letter
    pub fn from_shortcut(ch: char) -> Option<InlineStyle> {
        match ch.to_ascii_lowercase() {
            'b' => Some(InlineStyle::Bold),
            'i' => Some(InlineStyle::Italic),
            'u' => Some(InlineStyle::Underline),
            _ => None,
        }
    }
}

/// Remove tags and decode the known entities
pub fn strip_html(html: &str) -> String {
    if !html.contains('<') && !html.contains('&') {
        return html.to_string();
    }
    let without_tags = TAG_RE.replace_all(html, "");
    let mut out = String::with_capacity(without_tags.len());
    let mut rest: &str = &without_tags;
    while let Some(ch) = rest.chars().next() {
        if ch == '&' {
            if let Some((entity, decoded)) = ENTITIES.iter().find(|(e, _)| rest.starts_with(e)) {
                out.push(*decoded);
                rest = &rest[entity.len()..];
                continue;
            }
        }
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    out
}

/// Length of the stripped text in characters
pub fn plain_len(html: &str) -> usize {
    strip_html(html).chars().count()
}

/// Escape plain text so it can be stored as a cell fragment
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

fn entity_len(rest: &str) -> Option<usize> {
    ENTITIES
        .iter()
        .find(|(e, _)| rest.starts_with(e))
        .map(|(e, _)| e.len())
}

/// Wrap the plain-text range `start..end` in the style's tag
///
/// Each contiguous text run inside the range gets its own wrapper so the output
/// stays well nested when the range crosses existing tags.
pub fn apply_inline_style(html: &str, start: usize, end: usize, style: InlineStyle) -> String {
    if start >= end {
        return html.to_string();
    }
    let (open, close) = style.tags();
    let mut out = String::with_capacity(html.len() + 16);
    let mut pos = 0usize;
    let mut wrapping = false;
    let mut rest = html;

    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(tag_end) = rest.find('>') {
                if wrapping {
                    out.push_str(close);
                    wrapping = false;
                }
                out.push_str(&rest[..=tag_end]);
                rest = &rest[tag_end + 1..];
                continue;
            }
        }

        let unit = if ch == '&' {
            entity_len(rest).unwrap_or(1)
        } else {
            ch.len_utf8()
        };
        let in_range = pos >= start && pos < end;
        if in_range && !wrapping {
            out.push_str(open);
            wrapping = true;
        } else if !in_range && wrapping {
            out.push_str(close);
            wrapping = false;
        }
        out.push_str(&rest[..unit]);
        rest = &rest[unit..];
        pos += 1;
    }

    if wrapping {
        out.push_str(close);
    }
    out
}
