/*!
 * TMX writer.
 *
 * Rows that came from a file are written from a copy of their original
 * `<tu>`; only columns flagged as modified get their `<seg>` replaced with
 * plain text. Rows created by splits are synthesized from scratch.
 */

use std::io::Write;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::xml::{self, Element};
use super::tuv_language;
use crate::document::{AlignmentDocument, AlignmentRow, Column};
use crate::errors::TmxError;
use crate::file_utils::FileManager;
use crate::language_utils::normalize_language_tag;

/// TMX version written on the root element
pub const TMX_VERSION: &str = "1.4";

/// Header attributes used when a document has no preserved `<header>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderDefaults {
    #[serde(default = "default_creation_tool")]
    pub creation_tool: String,

    #[serde(default = "default_creation_tool_version")]
    pub creation_tool_version: String,

    #[serde(default = "default_creation_tool")]
    pub o_tmf: String,

    #[serde(default = "default_segtype")]
    pub segtype: String,

    #[serde(default = "default_adminlang")]
    pub adminlang: String,

    #[serde(default = "default_datatype")]
    pub datatype: String,
}

fn default_creation_tool() -> String {
    "tmxalign".to_string()
}

fn default_creation_tool_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_segtype() -> String {
    "sentence".to_string()
}

fn default_adminlang() -> String {
    "en".to_string()
}

fn default_datatype() -> String {
    "plaintext".to_string()
}

impl Default for HeaderDefaults {
    fn default() -> Self {
        Self {
            creation_tool: default_creation_tool(),
            creation_tool_version: default_creation_tool_version(),
            o_tmf: default_creation_tool(),
            segtype: default_segtype(),
            adminlang: default_adminlang(),
            datatype: default_datatype(),
        }
    }
}

/// Serializes alignment documents to TMX.
#[derive(Debug, Clone, Default)]
pub struct TmxWriter {
    defaults: HeaderDefaults,
}

impl TmxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_header_defaults(defaults: HeaderDefaults) -> Self {
        Self { defaults }
    }

    pub fn header_defaults(&self) -> &HeaderDefaults {
        &self.defaults
    }

    /// Render the document as a complete TMX file.
    pub fn to_bytes(&self, document: &AlignmentDocument) -> Vec<u8> {
        xml::serialize_document(&self.build_tree(document)).into_bytes()
    }

    /// Write the document to `path` atomically, optionally keeping a `.bak`
    /// copy of the file being replaced.
    pub fn write<P: AsRef<Path>>(
        &self,
        document: &AlignmentDocument,
        path: P,
        backup: bool,
    ) -> Result<(), TmxError> {
        let path = path.as_ref();
        let bytes = self.to_bytes(document);
        debug!("Serialized {} rows into {} bytes", document.row_count(), bytes.len());

        FileManager::write_atomic(path, backup, |file| file.write_all(&bytes))?;

        info!("Saved {} rows to {:?}", document.row_count(), path);
        Ok(())
    }

    fn build_tree(&self, document: &AlignmentDocument) -> Element {
        let mut root = Element::new("tmx").with_attribute("version", TMX_VERSION);
        root.push_element(self.build_header(document));

        let mut body = Element::new("body");
        for row in document.rows() {
            body.push_element(build_tu(row, document.source_lang(), document.target_lang()));
        }
        root.push_element(body);
        root
    }

    fn build_header(&self, document: &AlignmentDocument) -> Element {
        if let Some(record) = &document.header.record {
            let mut header = record.element().clone();
            header.set_attribute("srclang", document.source_lang());
            return header;
        }

        let mut header = Element::new("header");
        header.attributes = document.header.attributes.clone();
        let defaults = [
            ("creationtool", &self.defaults.creation_tool),
            ("creationtoolversion", &self.defaults.creation_tool_version),
            ("segtype", &self.defaults.segtype),
            ("o-tmf", &self.defaults.o_tmf),
            ("adminlang", &self.defaults.adminlang),
            ("datatype", &self.defaults.datatype),
        ];
        for (key, value) in defaults {
            if header.attribute(key).is_none() {
                header.set_attribute(key, value);
            }
        }
        header.set_attribute("srclang", document.source_lang());
        header
    }
}

/// Write `document` to `path` with built-in header defaults.
pub fn write_tmx<P: AsRef<Path>>(
    document: &AlignmentDocument,
    path: P,
    backup: bool,
) -> Result<(), TmxError> {
    TmxWriter::new().write(document, path, backup)
}

fn build_tu(row: &AlignmentRow, source_lang: &str, target_lang: &str) -> Element {
    match row.origin() {
        Some(record) => {
            let mut tu = record.element().clone();
            for (col, lang) in [(Column::Source, source_lang), (Column::Target, target_lang)] {
                if row.is_modified(col) {
                    replace_segment(&mut tu, lang, row.text(col));
                }
            }
            tu
        }
        None => {
            let mut tu = Element::new("tu");
            tu.push_element(new_tuv(source_lang, row.source()));
            tu.push_element(new_tuv(target_lang, row.target()));
            for extra in row.extra_translations() {
                tu.push_element(extra.element().clone());
            }
            tu
        }
    }
}

fn new_tuv(lang: &str, text: &str) -> Element {
    let mut seg = Element::new("seg");
    seg.set_text(text);
    let mut tuv = Element::new("tuv").with_attribute("xml:lang", lang);
    tuv.push_element(seg);
    tuv
}

// Modification is destructive to the inline markup of that one segment only.
fn replace_segment(tu: &mut Element, lang: &str, text: &str) {
    let wanted = normalize_language_tag(lang);
    let is_wanted = |element: &Element| {
        element.local_name() == "tuv"
            && tuv_language(element).map(normalize_language_tag).as_deref() == Some(wanted.as_str())
    };

    if !tu.child_elements().any(|element| is_wanted(element)) {
        tu.push_element(Element::new("tuv").with_attribute("xml:lang", lang));
    }
    let Some(tuv) = tu.find_child_mut(is_wanted) else {
        return;
    };

    if tuv.child("seg").is_none() {
        tuv.push_element(Element::new("seg"));
    }
    if let Some(seg) = tuv.child_mut("seg") {
        seg.set_text(text);
    }
}
