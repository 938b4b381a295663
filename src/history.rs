/*!
 * Undo/redo history for alignment commands.
 *
 * Commands are applied as they are pushed. While a macro is being recorded
 * pushed commands are collected instead of recorded, and the whole group
 * lands on the undo stack as a single `MacroCommand` when the outermost
 * macro ends. Nested begin/end pairs are flattened into the outer group.
 */

use log::debug;

use crate::commands::{Command, MacroCommand};
use crate::document::AlignmentDocument;
use crate::errors::DocumentError;

/// Default number of undo steps kept
pub const DEFAULT_HISTORY_LIMIT: usize = 1000;

#[derive(Debug)]
struct MacroRecording {
    label: String,
    children: Vec<Box<dyn Command>>,
    depth: usize,
}

/// Undo and redo stacks with macro grouping and clean-state tracking.
#[derive(Debug)]
pub struct UndoHistory {
    undo_stack: Vec<Box<dyn Command>>,
    redo_stack: Vec<Box<dyn Command>>,
    max_size: usize,
    // Undo depth at which the document matched the file on disk
    clean_depth: Option<usize>,
    recording: Option<MacroRecording>,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoHistory {
    /// Create a history with the default limit
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_HISTORY_LIMIT)
    }

    /// Create a history keeping at most `max_size` undo steps (0 = unlimited)
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_size,
            clean_depth: Some(0),
            recording: None,
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Apply `command` to the document and record it.
    ///
    /// Recording clears the redo stack. Nothing is recorded when the
    /// command fails to apply.
    pub fn push(
        &mut self,
        mut command: Box<dyn Command>,
        document: &mut AlignmentDocument,
    ) -> Result<(), DocumentError> {
        command.apply(document)?;

        match self.recording.as_mut() {
            Some(recording) => recording.children.push(command),
            None => self.record(command),
        }
        Ok(())
    }

    /// Start grouping subsequent pushes under `label`.
    pub fn begin_macro(&mut self, label: impl Into<String>) {
        match self.recording.as_mut() {
            Some(recording) => recording.depth += 1,
            None => {
                self.recording = Some(MacroRecording {
                    label: label.into(),
                    children: Vec::new(),
                    depth: 1,
                })
            }
        }
    }

    /// Close the innermost open macro.
    ///
    /// Returns true when the outermost macro closed and recorded a step. An
    /// empty macro records nothing.
    pub fn end_macro(&mut self) -> bool {
        let Some(recording) = self.recording.as_mut() else {
            return false;
        };
        recording.depth -= 1;
        if recording.depth > 0 {
            return false;
        }

        let Some(recording) = self.recording.take() else {
            return false;
        };
        if recording.children.is_empty() {
            debug!("Discarding empty macro '{}'", recording.label);
            return false;
        }

        debug!("Recorded macro '{}' ({} commands)", recording.label, recording.children.len());
        self.record(Box::new(MacroCommand::from_applied(recording.label, recording.children)));
        true
    }

    pub fn is_recording_macro(&self) -> bool {
        self.recording.is_some()
    }

    /// Undo the most recent step. Returns false when there is nothing to
    /// undo or a macro is still open.
    pub fn undo(&mut self, document: &mut AlignmentDocument) -> Result<bool, DocumentError> {
        if self.recording.is_some() {
            return Ok(false);
        }
        let Some(mut command) = self.undo_stack.pop() else {
            return Ok(false);
        };

        if let Err(e) = command.undo(document) {
            self.undo_stack.push(command);
            return Err(e);
        }
        debug!("Undid '{}'", command.description());
        self.redo_stack.push(command);
        Ok(true)
    }

    /// Re-apply the most recently undone step. Returns false when there is
    /// nothing to redo or a macro is still open.
    pub fn redo(&mut self, document: &mut AlignmentDocument) -> Result<bool, DocumentError> {
        if self.recording.is_some() {
            return Ok(false);
        }
        let Some(mut command) = self.redo_stack.pop() else {
            return Ok(false);
        };

        if let Err(e) = command.apply(document) {
            self.redo_stack.push(command);
            return Err(e);
        }
        debug!("Redid '{}'", command.description());
        self.undo_stack.push(command);
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.recording.is_none() && !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.recording.is_none() && !self.redo_stack.is_empty()
    }

    /// Label of the step `undo` would revert
    pub fn undo_text(&self) -> Option<&str> {
        self.undo_stack.last().map(|command| command.description())
    }

    /// Label of the step `redo` would re-apply
    pub fn redo_text(&self) -> Option<&str> {
        self.redo_stack.last().map(|command| command.description())
    }

    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Mark the current position as matching the saved file.
    pub fn set_clean(&mut self) {
        self.clean_depth = Some(self.undo_stack.len());
    }

    /// True when the document matches the last clean mark.
    pub fn is_clean(&self) -> bool {
        let recording_changes = self
            .recording
            .as_ref()
            .is_some_and(|recording| !recording.children.is_empty());
        !recording_changes && self.clean_depth == Some(self.undo_stack.len())
    }

    /// Drop all history. The current state becomes clean.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.recording = None;
        self.clean_depth = Some(0);
    }

    fn record(&mut self, command: Box<dyn Command>) {
        if self.clean_depth.is_some_and(|depth| depth > self.undo_stack.len()) {
            // The clean state lived in the redo tail being discarded
            self.clean_depth = None;
        }
        self.redo_stack.clear();
        self.undo_stack.push(command);

        // Trim if exceeded max size
        while self.max_size > 0 && self.undo_stack.len() > self.max_size {
            self.undo_stack.remove(0);
            self.clean_depth = self.clean_depth.and_then(|depth| depth.checked_sub(1));
        }
    }
}
