/*!
 * TMX parser.
 *
 * Builds an `AlignmentDocument` from TMX bytes. Each `<tu>` becomes one row;
 * variants in the source and target languages fill the two cells, any other
 * variants are carried along verbatim.
 */

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use super::xml::{self, Element};
use super::{segment_text, tuv_language, TmxRecord};
use crate::document::{AlignmentDocument, AlignmentRow, DocumentHeader};
use crate::errors::TmxError;
use crate::language_utils::{is_unspecified, normalize_language_tag, LanguageTally};

/// Languages assumed when a file has no language-tagged variants at all
const FALLBACK_LANGUAGES: (&str, &str) = ("en", "th");

/// Target language reported when only one language is present
const UNKNOWN_LANGUAGE: &str = "unknown";

/// Parse a TMX file into an `AlignmentDocument`.
///
/// Fails with `TmxError::MalformedInput` on XML syntax errors,
/// `TmxError::Structural` when the root is not `<tmx>` or `<body>` is
/// missing, and `TmxError::Io` when the file cannot be read.
pub fn parse_tmx<P: AsRef<Path>>(path: P) -> Result<AlignmentDocument, TmxError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let mut document = parse_tmx_bytes(&bytes)?;
    document.file_path = Some(path.to_path_buf());

    info!(
        "Loaded {:?}: {} rows ({} -> {})",
        path,
        document.row_count(),
        document.source_lang(),
        document.target_lang()
    );
    Ok(document)
}

/// Parse TMX content held in memory. The resulting document has no file path.
pub fn parse_tmx_bytes(bytes: &[u8]) -> Result<AlignmentDocument, TmxError> {
    let root = xml::parse_document(bytes)?;

    if !root.local_name().eq_ignore_ascii_case("tmx") {
        return Err(TmxError::Structural(format!(
            "root element is <{}>, expected <tmx>",
            root.name
        )));
    }

    let (source_lang, target_lang) = detect_languages(&root);
    debug!("Detected languages: {} -> {}", source_lang, target_lang);

    let header = root
        .child("header")
        .map(|header| DocumentHeader {
            attributes: header.attributes.clone(),
            record: Some(TmxRecord::new(header.clone())),
        })
        .unwrap_or_default();

    let body = root
        .child("body")
        .ok_or_else(|| TmxError::Structural("TMX file has no <body> element".to_string()))?;

    let rows: Vec<AlignmentRow> = body
        .children_named("tu")
        .map(|tu| row_from_tu(tu, &source_lang, &target_lang))
        .collect();
    debug!("Parsed {} translation units", rows.len());

    Ok(AlignmentDocument::new(rows, &source_lang, &target_lang).with_header(header))
}

fn row_from_tu(tu: &Element, source_lang: &str, target_lang: &str) -> AlignmentRow {
    let mut source = None;
    let mut target = None;
    let mut extras = Vec::new();

    for tuv in tu.children_named("tuv") {
        let lang = normalize_language_tag(tuv_language(tuv).unwrap_or_default());
        if lang.is_empty() {
            warn!("Translation unit variant without a language; keeping it verbatim");
        }
        if tuv.child("seg").is_none() {
            warn!("Variant '{}' has no <seg>; treating its text as empty", lang);
        }

        // A repeated language replaces the earlier variant's text
        if lang == source_lang {
            if source.replace(segment_text(tuv)).is_some() {
                warn!("Duplicate '{}' variant in one translation unit; using the last", lang);
            }
        } else if lang == target_lang {
            if target.replace(segment_text(tuv)).is_some() {
                warn!("Duplicate '{}' variant in one translation unit; using the last", lang);
            }
        } else {
            extras.push(TmxRecord::new(tuv.clone()));
        }
    }

    AlignmentRow::from_record(
        source.unwrap_or_default(),
        target.unwrap_or_default(),
        TmxRecord::new(tu.clone()),
        extras,
    )
}

/// Determine source and target language codes.
///
/// The source is the header's `srclang` unless absent or `*all*`, in which
/// case the most frequent variant language wins. The target is the most
/// frequent language that differs from the source.
fn detect_languages(root: &Element) -> (String, String) {
    let mut tuvs = Vec::new();
    root.descendants_named("tuv", &mut tuvs);

    let mut tally = LanguageTally::new();
    for tuv in tuvs {
        if let Some(lang) = tuv_language(tuv) {
            tally.record(lang);
        }
    }

    match tally.distinct() {
        0 => {
            return (
                FALLBACK_LANGUAGES.0.to_string(),
                FALLBACK_LANGUAGES.1.to_string(),
            );
        }
        1 => {
            let only = tally.most_frequent().unwrap_or(FALLBACK_LANGUAGES.0);
            return (only.to_string(), UNKNOWN_LANGUAGE.to_string());
        }
        _ => {}
    }

    let declared = root
        .child("header")
        .and_then(|header| header.attribute("srclang"))
        .map(normalize_language_tag)
        .filter(|lang| !lang.is_empty() && !is_unspecified(lang));

    let source = match declared {
        Some(lang) => lang,
        None => tally
            .most_frequent()
            .unwrap_or(FALLBACK_LANGUAGES.0)
            .to_string(),
    };
    let target = tally
        .most_frequent_except(&source)
        .unwrap_or(UNKNOWN_LANGUAGE)
        .to_string();

    (source, target)
}
