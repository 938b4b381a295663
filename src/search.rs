/*!
 * Find and replace over document cells.
 *
 * Cells are visited in row-major order, source before target. Queries are
 * literal text; case-insensitive matching goes through `regex` so that
 * non-ASCII scripts fold the same way everywhere.
 */

use std::fmt;

use log::warn;
use regex::{NoExpand, Regex, RegexBuilder};

use crate::document::{AlignmentDocument, Column};

/// Address of one cell in the alignment grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub row: usize,
    pub col: Column,
}

impl CellRef {
    pub fn new(row: usize, col: Column) -> Self {
        Self { row, col }
    }

    fn linear(self) -> usize {
        self.row * 2 + self.col.index()
    }

    fn from_linear(index: usize) -> Self {
        let col = if index % 2 == 0 { Column::Source } else { Column::Target };
        Self::new(index / 2, col)
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} {}", self.row + 1, self.col)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchDirection {
    #[default]
    Forward,
    Backward,
}

/// A compiled literal search pattern.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pattern: String,
    case_sensitive: bool,
    regex: Regex,
}

impl SearchQuery {
    pub fn new(pattern: &str, case_sensitive: bool) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(&regex::escape(pattern))
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self {
            pattern: pattern.to_string(),
            case_sensitive,
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn is_case_sensitive(&self) -> bool {
        self.case_sensitive
    }

    /// An empty query never matches.
    pub fn is_match(&self, text: &str) -> bool {
        !self.pattern.is_empty() && self.regex.is_match(text)
    }

    /// Replace every occurrence, or `None` when nothing matched.
    pub fn replace_all(&self, text: &str, replacement: &str) -> Option<String> {
        self.is_match(text)
            .then(|| self.regex.replace_all(text, NoExpand(replacement)).into_owned())
    }

    /// Replace the first occurrence, or `None` when nothing matched.
    pub fn replace_first(&self, text: &str, replacement: &str) -> Option<String> {
        self.is_match(text)
            .then(|| self.regex.replace(text, NoExpand(replacement)).into_owned())
    }

    /// Next matching cell after (or before) `from`, wrapping around.
    ///
    /// Every cell is visited at most once; `from` itself is checked last.
    /// Without a starting cell the scan begins at the first cell (forward)
    /// or the last cell (backward).
    pub fn find_in(
        &self,
        document: &AlignmentDocument,
        from: Option<CellRef>,
        direction: SearchDirection,
    ) -> Option<CellRef> {
        let total = document.row_count() * 2;
        if total == 0 || self.pattern.is_empty() {
            return None;
        }

        let start = match (from, direction) {
            (None, SearchDirection::Forward) => 0,
            (None, SearchDirection::Backward) => total - 1,
            (Some(cell), SearchDirection::Forward) => (cell.linear().min(total - 1) + 1) % total,
            (Some(cell), SearchDirection::Backward) => (cell.linear().min(total - 1) + total - 1) % total,
        };

        (0..total)
            .map(|step| match direction {
                SearchDirection::Forward => (start + step) % total,
                SearchDirection::Backward => (start + total - step) % total,
            })
            .map(CellRef::from_linear)
            .find(|cell| {
                document
                    .get_cell(cell.row, cell.col)
                    .is_ok_and(|text| self.is_match(text))
            })
    }

    /// Every matching cell in row-major order.
    pub fn matching_cells(&self, document: &AlignmentDocument) -> Vec<CellRef> {
        document
            .rows()
            .iter()
            .enumerate()
            .flat_map(|(row, cells)| {
                Column::ALL
                    .into_iter()
                    .filter(move |col| self.is_match(cells.text(*col)))
                    .map(move |col| CellRef::new(row, col))
            })
            .collect()
    }
}

/// Find the next cell containing `query`.
pub fn find(
    document: &AlignmentDocument,
    query: &str,
    from: Option<CellRef>,
    direction: SearchDirection,
    case_sensitive: bool,
) -> Option<CellRef> {
    match SearchQuery::new(query, case_sensitive) {
        Ok(query) => query.find_in(document, from, direction),
        Err(e) => {
            warn!("Unusable search query {:?}: {}", query, e);
            None
        }
    }
}

/// Replace every occurrence of `query` in `text`; `None` when nothing matched.
pub fn replace_in_text(text: &str, query: &str, replacement: &str, case_sensitive: bool) -> Option<String> {
    SearchQuery::new(query, case_sensitive)
        .ok()?
        .replace_all(text, replacement)
}

/// Replace the first occurrence of `query` in `text`; `None` when nothing matched.
pub fn replace_first(text: &str, query: &str, replacement: &str, case_sensitive: bool) -> Option<String> {
    SearchQuery::new(query, case_sensitive)
        .ok()?
        .replace_first(text, replacement)
}
