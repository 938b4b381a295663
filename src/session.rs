use log::{debug, info};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::commands::{
    Command, DeleteEmptyRowCommand, Direction, EditCellCommand, MergeCommand, MoveCellCommand,
    SplitCommand,
};
use crate::document::{char_len, AlignmentDocument, Column};
use crate::errors::SessionError;
use crate::history::UndoHistory;
use crate::search::{CellRef, SearchDirection, SearchQuery};
use crate::tmx::{parse_tmx, TmxWriter};

// @module: Editing session for one alignment document

/// Label of the history entry created by `replace_all`
pub const REPLACE_ALL_LABEL: &str = "Replace All";

/// Notifications sent to session subscribers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A file was opened and replaced the current document
    Loaded,
    /// The document changed through a command, undo, redo or replace-all
    Changed,
    /// The document was written to this path
    Saved(PathBuf),
}

type Listener = Box<dyn FnMut(&SessionEvent)>;

/// Owns a document and its undo history and guards every edit
///
/// Each guarded operation refuses the inputs an interactive editor would
/// refuse, pushes exactly one command on success and returns the cell that
/// should become current.
pub struct EditingSession {
    // @field: Document being edited
    document: AlignmentDocument,

    // @field: Undo/redo stack
    history: UndoHistory,

    // @field: Serializer with configured header defaults
    writer: TmxWriter,

    // @field: Keep .bak copies on save
    backup_on_save: bool,

    listeners: Vec<Listener>,
}

impl fmt::Debug for EditingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditingSession")
            .field("file_path", &self.document.file_path)
            .field("rows", &self.document.row_count())
            .field("dirty", &self.is_dirty())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EditingSession {
    // @method: Create a session with an empty untitled document
    pub fn new(config: &Config) -> Self {
        let document = AlignmentDocument::new(
            Vec::new(),
            &config.source_language,
            &config.target_language,
        );
        Self::with_document(document, config)
    }

    /// Create a session around an existing document
    pub fn with_document(document: AlignmentDocument, config: &Config) -> Self {
        Self {
            document,
            history: UndoHistory::with_max_size(config.history_limit),
            writer: TmxWriter::with_header_defaults(config.writer.clone()),
            backup_on_save: config.backup_on_save,
            listeners: Vec::new(),
        }
    }

    // @method: Open a TMX file in a new session
    pub fn open<P: AsRef<Path>>(path: P, config: &Config) -> Result<Self, SessionError> {
        let mut session = Self::new(config);
        session.load(path)?;
        Ok(session)
    }

    /// Replace the current document with a file; history is cleared
    pub fn load<P: AsRef<Path>>(&mut self, path: P) -> Result<(), SessionError> {
        let document = parse_tmx(path)?;
        self.document = document;
        self.history.clear();
        self.emit(SessionEvent::Loaded);
        Ok(())
    }

    pub fn document(&self) -> &AlignmentDocument {
        &self.document
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    // @checks: Unsaved changes since the last open or save
    pub fn is_dirty(&self) -> bool {
        !self.history.is_clean()
    }

    /// File name shown to the user, or `Untitled`
    pub fn display_name(&self) -> String {
        self.document
            .file_path
            .as_deref()
            .and_then(Path::file_name)
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Untitled".to_string())
    }

    // @returns: Window title with a dirty marker
    pub fn title(&self) -> String {
        if self.is_dirty() {
            format!("{} \u{2022}", self.display_name())
        } else {
            self.display_name()
        }
    }

    // @returns: One-line summary: name | rows | languages
    pub fn status_line(&self) -> String {
        format!(
            "{} | {} rows | {} \u{2192} {}",
            self.title(),
            self.document.row_count(),
            self.document.source_lang(),
            self.document.target_lang()
        )
    }

    /// Register a change listener
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&SessionEvent) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Save to the document's current path
    pub fn save(&mut self) -> Result<PathBuf, SessionError> {
        let path = self.document.file_path.clone().ok_or(SessionError::NoFilePath)?;
        self.writer.write(&self.document, &path, self.backup_on_save)?;

        self.history.set_clean();
        info!("Session saved: {}", self.status_line());
        self.emit(SessionEvent::Saved(path.clone()));
        Ok(path)
    }

    /// Save under a new path, which becomes the document's path
    pub fn save_as<P: AsRef<Path>>(&mut self, path: P) -> Result<PathBuf, SessionError> {
        self.document.file_path = Some(path.as_ref().to_path_buf());
        self.save()
    }

    /// Split a cell at a character offset strictly inside its text
    pub fn split_cell(&mut self, row: usize, col: Column, pos: usize) -> Result<CellRef, SessionError> {
        let text = self.document.get_cell(row, col)?;
        if text.is_empty() {
            return Err(SessionError::EmptyCell);
        }
        let len = char_len(text);
        if pos == 0 || pos >= len {
            return Err(SessionError::SplitPositionOutOfBounds { pos, len });
        }

        let command = SplitCommand::new(&self.document, row, col, pos)?;
        self.push(Box::new(command))?;
        Ok(CellRef::new(row + 1, col))
    }

    /// Merge a cell with the one below it
    pub fn merge_with_next(&mut self, row: usize, col: Column) -> Result<CellRef, SessionError> {
        let current = self.document.get_cell(row, col)?;
        if row + 1 >= self.document.row_count() {
            return Err(SessionError::NoRowBelow);
        }
        let next = self.document.get_cell(row + 1, col)?;
        if current.is_empty() && next.is_empty() {
            return Err(SessionError::NothingToMerge);
        }

        let command = MergeCommand::new(&self.document, row, col)?;
        self.push(Box::new(command))?;
        Ok(CellRef::new(row, col))
    }

    /// Move a cell one row up or down within its column
    pub fn move_cell(
        &mut self,
        row: usize,
        col: Column,
        direction: Direction,
    ) -> Result<CellRef, SessionError> {
        self.document.row(row)?;
        if direction.neighbour(row, self.document.row_count()).is_none() {
            return Err(SessionError::MoveOutOfBounds { row });
        }

        let command = MoveCellCommand::new(&self.document, row, col, direction)?;
        let destination = command.destination();
        self.push(Box::new(command))?;
        Ok(CellRef::new(destination, col))
    }

    /// Replace a cell's text; returns false when the text is unchanged
    pub fn edit_cell(
        &mut self,
        row: usize,
        col: Column,
        new_text: impl Into<String>,
    ) -> Result<bool, SessionError> {
        let command = EditCellCommand::from_document(&self.document, row, col, new_text)?;
        if command.is_noop() {
            return Ok(false);
        }
        self.push(Box::new(command))?;
        Ok(true)
    }

    /// Delete a row whose cells are both blank
    ///
    /// Returns the row that takes its place (or the new last row), if any.
    pub fn delete_empty_row(&mut self, row: usize) -> Result<Option<usize>, SessionError> {
        if !self.document.row(row)?.is_blank() {
            return Err(SessionError::RowNotEmpty(row));
        }

        self.push(Box::new(DeleteEmptyRowCommand::new(row)))?;
        let remaining = self.document.row_count();
        Ok((remaining > 0).then(|| row.min(remaining - 1)))
    }

    pub fn undo(&mut self) -> Result<bool, SessionError> {
        let undone = self.history.undo(&mut self.document)?;
        if undone {
            self.emit(SessionEvent::Changed);
        }
        Ok(undone)
    }

    pub fn redo(&mut self) -> Result<bool, SessionError> {
        let redone = self.history.redo(&mut self.document)?;
        if redone {
            self.emit(SessionEvent::Changed);
        }
        Ok(redone)
    }

    /// Next cell containing `query`, wrapping around the document
    pub fn find(
        &self,
        query: &str,
        from: Option<CellRef>,
        direction: SearchDirection,
        case_sensitive: bool,
    ) -> Result<Option<CellRef>, SessionError> {
        let query = SearchQuery::new(query, case_sensitive)?;
        Ok(query.find_in(&self.document, from, direction))
    }

    /// Replace the first occurrence of `query` in one cell
    ///
    /// Returns false when the cell does not contain the query.
    pub fn replace_current(
        &mut self,
        cell: CellRef,
        query: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> Result<bool, SessionError> {
        let query = SearchQuery::new(query, case_sensitive)?;
        let text = self.document.get_cell(cell.row, cell.col)?;
        let Some(new_text) = query.replace_first(text, replacement) else {
            return Ok(false);
        };
        self.edit_cell(cell.row, cell.col, new_text)
    }

    /// Replace every occurrence in every cell as a single undo step
    ///
    /// Returns the number of cells changed.
    pub fn replace_all(
        &mut self,
        query: &str,
        replacement: &str,
        case_sensitive: bool,
    ) -> Result<usize, SessionError> {
        let query = SearchQuery::new(query, case_sensitive)?;
        let edits: Vec<EditCellCommand> = query
            .matching_cells(&self.document)
            .into_iter()
            .filter_map(|cell| {
                let old_text = self.document.get_cell(cell.row, cell.col).ok()?;
                let new_text = query.replace_all(old_text, replacement)?;
                (new_text != old_text).then(|| EditCellCommand::new(cell.row, cell.col, old_text, new_text))
            })
            .collect();

        let count = edits.len();
        if count == 0 {
            return Ok(0);
        }

        self.history.begin_macro(REPLACE_ALL_LABEL);
        let mut result = Ok(());
        for command in edits {
            result = self.history.push(Box::new(command), &mut self.document);
            if result.is_err() {
                break;
            }
        }
        self.history.end_macro();
        self.emit(SessionEvent::Changed);
        result?;

        debug!("Replaced {:?} in {} cells", query.pattern(), count);
        Ok(count)
    }

    fn push(&mut self, command: Box<dyn Command>) -> Result<(), SessionError> {
        self.history.push(command, &mut self.document)?;
        self.emit(SessionEvent::Changed);
        Ok(())
    }

    fn emit(&mut self, event: SessionEvent) {
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
