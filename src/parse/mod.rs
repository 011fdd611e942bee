//! Parsers for persisted screenplay content and clipboard text

pub mod document;
pub mod paste;

pub use document::{
    first_balanced_object, parse_document, parse_document_str, parse_document_value,
    serialize_document,
};
pub use paste::{parse_paste, PartialRow};
