use log::{debug, warn};

use super::{Command, CommandState};
use crate::document::AlignmentDocument;
use crate::errors::DocumentError;

/// An ordered group of commands that undo and redo as one step.
///
/// Children are applied first to last and undone last to first.
#[derive(Debug)]
pub struct MacroCommand {
    label: String,
    children: Vec<Box<dyn Command>>,
    state: CommandState,
}

impl MacroCommand {
    /// Create an empty, not yet applied macro.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            children: Vec::new(),
            state: CommandState::Constructed,
        }
    }

    /// Wrap commands that have already been applied, in application order.
    pub fn from_applied(label: impl Into<String>, children: Vec<Box<dyn Command>>) -> Self {
        Self {
            label: label.into(),
            children,
            state: CommandState::Applied,
        }
    }

    /// Append a child to an unapplied macro.
    pub fn push(&mut self, command: Box<dyn Command>) {
        self.children.push(command);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn children(&self) -> &[Box<dyn Command>] {
        &self.children
    }

    // Roll back the first `count` children after a partial failure
    fn rollback(&mut self, document: &mut AlignmentDocument, count: usize) {
        for child in self.children[..count].iter_mut().rev() {
            if let Err(e) = child.undo(document) {
                warn!("Failed to roll back '{}' inside '{}': {}", child.description(), self.label, e);
            }
        }
    }

    // Re-apply the children from `from` on after a partial undo failure
    fn reapply(&mut self, document: &mut AlignmentDocument, from: usize) {
        for child in self.children[from..].iter_mut() {
            if let Err(e) = child.apply(document) {
                warn!("Failed to re-apply '{}' inside '{}': {}", child.description(), self.label, e);
            }
        }
    }
}

impl Command for MacroCommand {
    fn description(&self) -> &str {
        &self.label
    }

    fn apply(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_apply(self.description())?;

        for index in 0..self.children.len() {
            if let Err(e) = self.children[index].apply(document) {
                self.rollback(document, index);
                return Err(e);
            }
        }

        debug!("Applied macro '{}' ({} commands)", self.label, self.children.len());
        self.state = CommandState::Applied;
        Ok(())
    }

    fn undo(&mut self, document: &mut AlignmentDocument) -> Result<(), DocumentError> {
        self.state.ensure_can_undo(self.description())?;

        for index in (0..self.children.len()).rev() {
            if let Err(e) = self.children[index].undo(document) {
                self.reapply(document, index + 1);
                return Err(e);
            }
        }

        self.state = CommandState::Undone;
        Ok(())
    }

    fn state(&self) -> CommandState {
        self.state
    }
}
