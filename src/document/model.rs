/*!
 * Core document model types for TMX alignment.
 *
 * Rows and cells are only ever touched through the four primitives on
 * `AlignmentDocument` (`set_cell`, `insert_row`, `remove_row` and the
 * read accessors), which keeps every command trivially invertible.
 */

use std::fmt;
use std::path::PathBuf;

use crate::errors::DocumentError;
use crate::language_utils::normalize_language_tag;
use crate::tmx::TmxRecord;

/// One of the two working columns of the alignment grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    /// Column 0
    Source,
    /// Column 1
    Target,
}

impl Column {
    /// Both columns in display order.
    pub const ALL: [Column; 2] = [Column::Source, Column::Target];

    /// Numeric index used by table views (0 = source, 1 = target).
    pub fn index(self) -> usize {
        match self {
            Self::Source => 0,
            Self::Target => 1,
        }
    }

    /// The sibling column.
    pub fn other(self) -> Self {
        match self {
            Self::Source => Self::Target,
            Self::Target => Self::Source,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Source => "Source",
            Self::Target => "Target",
        }
    }
}

impl TryFrom<usize> for Column {
    type Error = DocumentError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Self::Source),
            1 => Ok(Self::Target),
            other => Err(DocumentError::InvalidColumn(other)),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One aligned source/target pair (one translation unit).
///
/// A row parsed from a file keeps its original `<tu>` record so that
/// attributes, properties, notes and untouched inline markup survive a save.
/// Rows created by a split have no record and never carry extra translations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlignmentRow {
    source: String,
    target: String,
    origin: Option<TmxRecord>,
    extra_translations: Vec<TmxRecord>,
    source_modified: bool,
    target_modified: bool,
}

impl AlignmentRow {
    /// Create a new row with no original record.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            ..Self::default()
        }
    }

    /// Create a row holding `text` in `col` and an empty sibling cell.
    pub fn with_cell(col: Column, text: impl Into<String>) -> Self {
        match col {
            Column::Source => Self::new(text, ""),
            Column::Target => Self::new("", text),
        }
    }

    /// Create a row that remembers the record it was parsed from.
    pub fn from_record(
        source: impl Into<String>,
        target: impl Into<String>,
        origin: TmxRecord,
        extra_translations: Vec<TmxRecord>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            origin: Some(origin),
            extra_translations,
            source_modified: false,
            target_modified: false,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Text of the given column.
    pub fn text(&self, col: Column) -> &str {
        match col {
            Column::Source => &self.source,
            Column::Target => &self.target,
        }
    }

    /// Whether the column was written since the row was parsed or created.
    pub fn is_modified(&self, col: Column) -> bool {
        match col {
            Column::Source => self.source_modified,
            Column::Target => self.target_modified,
        }
    }

    /// True when both cells are empty strings.
    pub fn is_blank(&self) -> bool {
        self.source.is_empty() && self.target.is_empty()
    }

    /// The original `<tu>` record, if the row came from a file.
    pub fn origin(&self) -> Option<&TmxRecord> {
        self.origin.as_ref()
    }

    /// Translation variants for languages other than source and target.
    pub fn extra_translations(&self) -> &[TmxRecord] {
        &self.extra_translations
    }

    // The modified flag is monotonic: once set it is never cleared.
    fn set_text(&mut self, col: Column, text: String) {
        match col {
            Column::Source => {
                self.source = text;
                self.source_modified = true;
            }
            Column::Target => {
                self.target = text;
                self.target_modified = true;
            }
        }
    }
}

/// Document-level metadata preserved from the `<header>` element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentHeader {
    /// Header attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Full header record including `<prop>`/`<note>` children
    pub record: Option<TmxRecord>,
}

/// Summary counts for status lines and the `info` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub rows: usize,
    pub empty_source: usize,
    pub empty_target: usize,
    pub blank_rows: usize,
    pub rows_with_extras: usize,
}

/// In-memory representation of a TMX file as aligned rows.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentDocument {
    rows: Vec<AlignmentRow>,
    source_lang: String,
    target_lang: String,

    /// Preserved header metadata
    pub header: DocumentHeader,

    /// Last known file location; `None` for an unsaved document
    pub file_path: Option<PathBuf>,
}

impl Default for AlignmentDocument {
    fn default() -> Self {
        Self::new(Vec::new(), "en", "th")
    }
}

impl AlignmentDocument {
    /// Create a document from rows. Language codes are normalized.
    pub fn new(rows: Vec<AlignmentRow>, source_lang: &str, target_lang: &str) -> Self {
        Self {
            rows,
            source_lang: normalize_language_tag(source_lang),
            target_lang: normalize_language_tag(target_lang),
            header: DocumentHeader::default(),
            file_path: None,
        }
    }

    /// Attach preserved header metadata.
    pub fn with_header(mut self, header: DocumentHeader) -> Self {
        self.header = header;
        self
    }

    pub fn source_lang(&self) -> &str {
        &self.source_lang
    }

    pub fn target_lang(&self) -> &str {
        &self.target_lang
    }

    /// Language code for a column.
    pub fn language(&self, col: Column) -> &str {
        match col {
            Column::Source => &self.source_lang,
            Column::Target => &self.target_lang,
        }
    }

    /// Replace the working languages. Codes are normalized.
    pub fn set_languages(&mut self, source_lang: &str, target_lang: &str) {
        self.source_lang = normalize_language_tag(source_lang);
        self.target_lang = normalize_language_tag(target_lang);
    }

    pub fn rows(&self) -> &[AlignmentRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Borrow a row, failing when `index` is out of range.
    pub fn row(&self, index: usize) -> Result<&AlignmentRow, DocumentError> {
        self.rows.get(index).ok_or(DocumentError::RowOutOfRange {
            row: index,
            len: self.rows.len(),
        })
    }

    /// Cell text at `(row, col)`.
    pub fn get_cell(&self, row: usize, col: Column) -> Result<&str, DocumentError> {
        Ok(self.row(row)?.text(col))
    }

    /// Overwrite a cell. Always marks the column modified, even when the
    /// text is unchanged.
    pub fn set_cell(
        &mut self,
        row: usize,
        col: Column,
        text: impl Into<String>,
    ) -> Result<(), DocumentError> {
        let len = self.rows.len();
        let target = self
            .rows
            .get_mut(row)
            .ok_or(DocumentError::RowOutOfRange { row, len })?;
        target.set_text(col, text.into());
        Ok(())
    }

    /// Insert `row` at `index` (`0 ..= row_count`), shifting later rows down.
    pub fn insert_row(&mut self, index: usize, row: AlignmentRow) -> Result<(), DocumentError> {
        if index > self.rows.len() {
            return Err(DocumentError::RowOutOfRange {
                row: index,
                len: self.rows.len(),
            });
        }
        self.rows.insert(index, row);
        Ok(())
    }

    /// Remove and return the row at `index`.
    pub fn remove_row(&mut self, index: usize) -> Result<AlignmentRow, DocumentError> {
        if index >= self.rows.len() {
            return Err(DocumentError::RowOutOfRange {
                row: index,
                len: self.rows.len(),
            });
        }
        Ok(self.rows.remove(index))
    }

    /// Count empty cells, blank rows and rows carrying extra languages.
    pub fn stats(&self) -> DocumentStats {
        self.rows.iter().fold(
            DocumentStats {
                rows: self.rows.len(),
                ..DocumentStats::default()
            },
            |mut stats, row| {
                if row.source.is_empty() {
                    stats.empty_source += 1;
                }
                if row.target.is_empty() {
                    stats.empty_target += 1;
                }
                if row.is_blank() {
                    stats.blank_rows += 1;
                }
                if !row.extra_translations.is_empty() {
                    stats.rows_with_extras += 1;
                }
                stats
            },
        )
    }
}
