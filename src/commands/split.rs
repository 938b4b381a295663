use log::debug;

use super::{Command, CommandState};
use crate::document::{split_at_char, AlignmentDocument, AlignmentRow, Column};
use crate::errors::DocumentError;

/// Split a cell at a character offset.
///
/// The active cell keeps `text[..pos]`. The remainder (minus one leading
/// space, if any) fills the cell below when that cell is blank; otherwise a
/// new row holding the remainder is inserted below. The sibling column is
/// never touched.
///
/// `0 < pos < len` is a caller precondition and is not checked here.
#[derive(Debug)]
pub struct SplitCommand {
    row: usize,
    col: Column,
    pos: usize,
    original_text: String,
    filled_existing: bool,
    state: CommandState,
}

impl SplitCommand {
    pub fn new(
        document: &AlignmentDocument,
        row: usize,
        col: Column,
        pos: usize,
    ) -> Result<Self, DocumentError> {
        Ok(Self {
            row,
            col,
            pos,
            original_text: document.get_cell(row, col)?.to_string(),
            filled_existing: false,
            state: CommandState::Constructed,
        })
    }

    /// Whether the last `apply` filled a blank cell instead of inserting a row.
    pub fn filled_existing(&self) -> bool {
        self.filled_existing
    }

    fn parts(&self) -> (&str, &str) {
        let (left, right) = split_at_char(&self.original_text, self.pos);
        // Avoid a double space after splitting at a word boundary
        (left, right.strip_prefix(' ').unwrap_or(right))
    }
}

impl Command for SplitCommand {
    fn description(&self) -> &str {
        "Split"
    }

    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_apply(self.description())?;

        let (left, right) = self.parts();
        let (left, right) = (left.to_string(), right.to_string());
        document.set_cell(self.row, self.col, left)?;

        let next = self.row + 1;
        let below_is_blank = next < document.row_count() && document.get_cell(next, self.col)?.is_empty();
        if below_is_blank {
            document.set_cell(next, self.col, right)?;
        } else {
            document.insert_row(next, AlignmentRow::with_cell(self.col, right))?;
        }
        self.filled_existing = below_is_blank;

        debug!(
            "Split row {} {} at {} ({})",
            self.row,
            self.col,
            self.pos,
            if below_is_blank { "filled blank below" } else { "inserted row" }
        );
        self.state = CommandState::Applied;
        Ok(())
    }

    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_undo(self.description())?;

        let next = self.row + 1;
        if self.filled_existing {
            document.set_cell(next, self.col, "")?;
        } else {
            document.remove_row(next)?;
        }
        document.set_cell(self.row, self.col, self.original_text.clone())?;

        self.state = CommandState::Undone;
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.state
    }
}
