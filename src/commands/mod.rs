/*!
 * Undoable alignment commands.
 *
 * Each command captures, at construction time, everything it needs to apply
 * one document transformation and to reverse it exactly. Commands only go
 * through the `AlignmentDocument` primitives, so undo is a mechanical
 * inversion of the primitive calls made by `apply`.
 *
 * Commands do not re-validate the document between calls: the caller must
 * alternate `apply`/`undo` strictly and must not mutate the document
 * out-of-band in between.
 */

use std::fmt;

use crate::document::AlignmentDocument;
use crate::errors::DocumentError;

pub mod edit;
pub mod macro_command;
pub mod merge;
pub mod move_cell;
pub mod split;

pub use edit::{DeleteEmptyRowCommand, EditCellCommand};
pub use macro_command::MacroCommand;
pub use merge::MergeCommand;
pub use move_cell::{Direction, MoveCellCommand};
pub use split::SplitCommand;

/// One reversible document operation.
pub trait Command: fmt::Debug {
    /// Short label for menus and history listings ("Split", "Merge", ...)
    fn description(&self) -> &str;

    /// Apply (or re-apply) the operation.
    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError>;

    /// Reverse the last `apply`.
    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError>;

    fn state(&self) -> CommandState;
}

/// Lifecycle of a command instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandState {
    #[default]
    Constructed,
    Applied,
    Undone,
}

impl CommandState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Constructed => "constructed",
            Self::Applied => "applied",
            Self::Undone => "undone",
        }
    }

    /// Fail unless the command may be applied now.
    pub(crate) fn ensure_can_apply(self, command: &str) -> Result<(), DocumentError> {
        match self {
            Self::Constructed | Self::Undone => Ok(()),
            Self::Applied => Err(self.invalid(command, "apply")),
        }
    }

    /// Fail unless the command may be undone now.
    pub(crate) fn ensure_can_undo(self, command: &str) -> Result<(), DocumentError> {
        match self {
            Self::Applied => Ok(()),
            Self::Constructed | Self::Undone => Err(self.invalid(command, "undo")),
        }
    }

    fn invalid(self, command: &str, action: &'static str) -> DocumentError {
        DocumentError::InvalidTransition {
            command: command.to_string(),
            action,
            state: self.as_str(),
        }
    }
}

impl fmt::Display for CommandState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
