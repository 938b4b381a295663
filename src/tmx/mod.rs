/*!
 * TMX 1.4 codec.
 *
 * Converts between TMX files and `AlignmentDocument`s while preserving
 * everything the editor does not model: TU attributes, `<prop>`/`<note>`
 * children, extra-language variants and inline markup of untouched segments.
 */

pub mod reader;
pub mod writer;
mod xml;

use crate::language_utils::normalize_language_tag;

pub use reader::{parse_tmx, parse_tmx_bytes};
pub use writer::{write_tmx, HeaderDefaults, TmxWriter};

pub(crate) use xml::Element;

/// Opaque, deep-cloneable copy of an original TMX record (`<tu>`, `<tuv>`
/// or `<header>`). Only the codec interprets its contents.
#[derive(Debug, Clone, PartialEq)]
pub struct TmxRecord(pub(crate) Element);

impl TmxRecord {
    pub(crate) fn new(element: Element) -> Self {
        Self(element)
    }

    pub(crate) fn element(&self) -> &Element {
        &self.0
    }

    /// Tag name of the record (`tu`, `tuv`, `header`).
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Normalized language of a `<tuv>` record, if it declares one.
    pub fn language(&self) -> Option<String> {
        tuv_language(&self.0).map(normalize_language_tag)
    }

    /// Plain text of the record's `<seg>`, ignoring inline markup.
    pub fn segment_text(&self) -> String {
        segment_text(&self.0)
    }
}

/// Language attribute of a `<tuv>`: `xml:lang`, falling back to `lang`.
pub(crate) fn tuv_language(tuv: &Element) -> Option<&str> {
    tuv.attribute("xml:lang")
        .filter(|lang| !lang.is_empty())
        .or_else(|| tuv.attribute("lang"))
}

/// Full character data of the `<seg>` child of a `<tuv>`.
pub(crate) fn segment_text(tuv: &Element) -> String {
    tuv.child("seg")
        .map(Element::text_content)
        .unwrap_or_default()
}
