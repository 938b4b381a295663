use log::debug;

use super::{Command, CommandState};
use crate::document::{AlignmentDocument, AlignmentRow, Column};
use crate::errors::DocumentError;

/// Merge a cell with the cell directly below it in the same column.
///
/// The texts are joined with a single space (no separator when either side
/// is empty). If the row below has nothing in the other column it is removed
/// entirely; otherwise only its active cell is cleared, so the other column
/// keeps its alignment.
#[derive(Debug)]
pub struct MergeCommand {
    row: usize,
    col: Column,
    current_text: String,
    next_text: String,
    removed_row: Option<AlignmentRow>,
    state: CommandState,
}

impl MergeCommand {
    /// Fails when `row` is out of range or is the last row.
    pub fn new(document: &AlignmentDocument, row: usize, col: Column) -> Result<Self, DocumentError> {
        let current_text = document.get_cell(row, col)?.to_string();
        let next_text = document.get_cell(row + 1, col)?.to_string();
        Ok(Self {
            row,
            col,
            current_text,
            next_text,
            removed_row: None,
            state: CommandState::Constructed,
        })
    }

    /// Whether the last `apply` removed the row below.
    pub fn removed_row(&self) -> bool {
        self.removed_row.is_some()
    }

    fn joined(&self) -> String {
        join_with_space(&self.current_text, &self.next_text)
    }
}

/// Join two cell texts with one space, or none when either side is empty.
pub fn join_with_space(first: &str, second: &str) -> String {
    if first.is_empty() || second.is_empty() {
        format!("{first}{second}")
    } else {
        format!("{first} {second}")
    }
}

impl Command for MergeCommand {
    fn description(&self) -> &str {
        "Merge"
    }

    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_apply(self.description())?;

        let next = self.row + 1;
        document.set_cell(self.row, self.col, self.joined())?;

        if document.get_cell(next, self.col.other())?.is_empty() {
            self.removed_row = Some(document.remove_row(next)?);
        } else {
            document.set_cell(next, self.col, "")?;
            self.removed_row = None;
        }

        debug!(
            "Merged row {} into row {} ({}, {})",
            next,
            self.row,
            self.col,
            if self.removed_row.is_some() { "row removed" } else { "cell cleared" }
        );
        self.state = CommandState::Applied;
        Ok(())
    }

    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_undo(self.description())?;

        let next = self.row + 1;
        match self.removed_row.take() {
            Some(row) => document.insert_row(next, row)?,
            None => document.set_cell(next, self.col, self.next_text.clone())?,
        }
        document.set_cell(self.row, self.col, self.current_text.clone())?;

        self.state = CommandState::Undone;
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.state
    }
}
