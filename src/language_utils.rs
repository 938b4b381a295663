use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for TMX language tags
///
/// TMX files carry BCP-47 style tags (`en`, `EN-US`, `th-TH`) in `xml:lang`
/// attributes. Matching is done on the trimmed, lowercased tag; the ISO
/// lookups below are only used for validation and display names.

/// Sentinel `srclang` value meaning "no particular source language"
pub const UNSPECIFIED_SOURCE: &str = "*all*";

/// Normalize a language tag for comparison (trimmed, lowercase)
pub fn normalize_language_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

/// Check whether a header `srclang` value means "unspecified"
pub fn is_unspecified(tag: &str) -> bool {
    normalize_language_tag(tag) == UNSPECIFIED_SOURCE
}

/// Primary language subtag (`en` for `en-US`, `zh` for `zh_Hant`)
pub fn primary_subtag(tag: &str) -> &str {
    let trimmed = tag.trim();
    trimmed
        .split(['-', '_'])
        .next()
        .unwrap_or(trimmed)
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code).to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        // ISO 639-2/B codes that differ from their 639-2/T form
        let part2t = match normalized_code.as_str() {
            "fre" => Some("fra"),
            "ger" => Some("deu"),
            "dut" => Some("nld"),
            "gre" => Some("ell"),
            "chi" => Some("zho"),
            "cze" => Some("ces"),
            "ice" => Some("isl"),
            "alb" => Some("sqi"),
            "arm" => Some("hye"),
            "baq" => Some("eus"),
            "bur" => Some("mya"),
            "per" => Some("fas"),
            "geo" => Some("kat"),
            "may" => Some("msa"),
            "mac" => Some("mkd"),
            "rum" => Some("ron"),
            "slo" => Some("slk"),
            "wel" => Some("cym"),
            _ => None,
        };
        if let Some(part2t) = part2t {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the English language name for a tag (`th-TH` -> `Thai`)
pub fn get_language_name(tag: &str) -> Result<String> {
    let normalized = normalize_to_part2t(tag)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Human-readable label: `th (Thai)`, or the bare tag when unknown
pub fn display_label(tag: &str) -> String {
    match get_language_name(tag) {
        Ok(name) => format!("{} ({})", tag, name),
        Err(_) => tag.to_string(),
    }
}

/// Frequency count of language tags, ties broken by first appearance
#[derive(Debug, Clone, Default)]
pub struct LanguageTally {
    counts: Vec<(String, usize)>,
}

impl LanguageTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence. Empty tags are ignored.
    pub fn record(&mut self, tag: &str) {
        let normalized = normalize_language_tag(tag);
        if normalized.is_empty() {
            return;
        }
        match self.counts.iter_mut().find(|(lang, _)| *lang == normalized) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((normalized, 1)),
        }
    }

    /// Number of distinct languages seen
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    /// Languages ordered by descending frequency
    pub fn most_common(&self) -> Vec<(&str, usize)> {
        let mut ordered: Vec<(&str, usize)> = self
            .counts
            .iter()
            .map(|(lang, count)| (lang.as_str(), *count))
            .collect();
        // Stable sort keeps first-seen order among equal counts
        ordered.sort_by(|a, b| b.1.cmp(&a.1));
        ordered
    }

    /// The most frequent language, if any
    pub fn most_frequent(&self) -> Option<&str> {
        self.most_common().first().map(|(lang, _)| *lang)
    }

    /// The most frequent language that is not `excluded`
    pub fn most_frequent_except(&self, excluded: &str) -> Option<&str> {
        self.most_common()
            .into_iter()
            .map(|(lang, _)| lang)
            .find(|lang| *lang != excluded)
    }
}
