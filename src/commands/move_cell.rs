use std::fmt;

use log::debug;

use super::{Command, CommandState};
use crate::document::{AlignmentDocument, Column};
use crate::errors::DocumentError;

/// Direction for moving a cell within its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Row index of the neighbour in this direction, if any.
    pub fn neighbour(self, row: usize, row_count: usize) -> Option<usize> {
        match self {
            Self::Up => row.checked_sub(1),
            Self::Down => Some(row + 1).filter(|next| *next < row_count),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// Swap a cell with its neighbour above or below in the same column.
///
/// A swap is its own inverse, so undo simply swaps back.
#[derive(Debug)]
pub struct MoveCellCommand {
    row: usize,
    neighbour: usize,
    col: Column,
    direction: Direction,
    state: CommandState,
}

impl MoveCellCommand {
    /// Fails when the cell or its neighbour in `direction` does not exist.
    pub fn new(
        document: &AlignmentDocument,
        row: usize,
        col: Column,
        direction: Direction,
    ) -> Result<Self, DocumentError> {
        document.row(row)?;
        let len = document.row_count();
        let neighbour = direction
            .neighbour(row, len)
            .ok_or(DocumentError::RowOutOfRange { row, len })?;

        Ok(Self {
            row,
            neighbour,
            col,
            direction,
            state: CommandState::Constructed,
        })
    }

    /// Row the moved text ends up in.
    pub fn destination(&self) -> usize {
        self.neighbour
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn swap(&self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        let here = document.get_cell(self.row, self.col)?.to_string();
        let there = document.get_cell(self.neighbour, self.col)?.to_string();
        document.set_cell(self.row, self.col, there)?;
        document.set_cell(self.neighbour, self.col, here)
    }
}

impl Command for MoveCellCommand {
    fn description(&self) -> &str {
        "Move cell"
    }

    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_apply(self.description())?;
        self.swap(document)?;
        debug!("Moved row {} {} {}", self.row, self.col, self.direction);
        self.state = CommandState::Applied;
        Ok(())
    }

    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_undo(self.description())?;
        self.swap(document)?;
        self.state = CommandState::Undone;
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.state
    }
}
