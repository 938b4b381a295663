use log::debug;

use super::{Command, CommandState};
use crate::document::{AlignmentDocument, AlignmentRow, Column};
use crate::errors::DocumentError;

/// Replace the text of one cell.
#[derive(Debug)]
pub struct EditCellCommand {
    row: usize,
    col: Column,
    old_text: String,
    new_text: String,
    state: CommandState,
}

impl EditCellCommand {
    pub fn new(row: usize, col: Column, old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            row,
            col,
            old_text: old_text.into(),
            new_text: new_text.into(),
            state: CommandState::Constructed,
        }
    }

    /// Build an edit capturing the cell's current text as the undo value.
    pub fn from_document(
        document: &AlignmentDocument,
        row: usize,
        col: Column,
        new_text: impl Into<String>,
    ) -> Result<Self, DocumentError> {
        let old_text = document.get_cell(row, col)?;
        Ok(Self::new(row, col, old_text, new_text))
    }

    /// True when applying would not change the cell text.
    pub fn is_noop(&self) -> bool {
        self.old_text == self.new_text
    }
}

impl Command for EditCellCommand {
    fn description(&self) -> &str {
        "Edit cell"
    }

    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_apply(self.description())?;
        document.set_cell(self.row, self.col, self.new_text.clone())?;
        self.state = CommandState::Applied;
        Ok(())
    }

    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_undo(self.description())?;
        document.set_cell(self.row, self.col, self.old_text.clone())?;
        self.state = CommandState::Undone;
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.state
    }
}

/// Remove a row, keeping it for undo.
///
/// Emptiness is the caller's responsibility; the command removes whatever
/// row sits at `row`.
#[derive(Debug)]
pub struct DeleteEmptyRowCommand {
    row: usize,
    removed: Option<AlignmentRow>,
    state: CommandState,
}

impl DeleteEmptyRowCommand {
    pub fn new(row: usize) -> Self {
        Self {
            row,
            removed: None,
            state: CommandState::Constructed,
        }
    }
}

impl Command for DeleteEmptyRowCommand {
    fn description(&self) -> &str {
        "Delete empty row"
    }

    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_apply(self.description())?;
        self.removed = Some(document.remove_row(self.row)?);
        debug!("Deleted row {}", self.row);
        self.state = CommandState::Applied;
        Ok(())
    }

    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_undo(self.description())?;
        if let Some(row) = self.removed.take() {
            document.insert_row(self.row, row)?;
        }
        self.state = CommandState::Undone;
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.state
    }
}
