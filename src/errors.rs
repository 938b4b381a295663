/*!
 * Error types for tmxalign.
 *
 * This module contains custom error types for the different layers of the
 * editor core, using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the alignment document and its commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// A row index outside `0..len`
    #[error("Row {row} is out of range (document has {len} rows)")]
    RowOutOfRange {
        /// Requested row index
        row: usize,
        /// Row count at the time of the request
        len: usize,
    },

    /// A column index other than 0 (source) or 1 (target)
    #[error("Column {0} is out of range (expected 0 or 1)")]
    InvalidColumn(usize),

    /// A command was applied or reverted out of order
    #[error("Cannot {action} '{command}' while it is {state}")]
    InvalidTransition {
        /// Command description
        command: String,
        /// Attempted transition ("apply" or "revert")
        action: &'static str,
        /// Current command state
        state: &'static str,
    },
}

/// Errors that can occur while reading or writing TMX files
#[derive(Error, Debug)]
pub enum TmxError {
    /// The input is not well-formed XML
    #[error("Malformed XML at byte {position}: {message}")]
    MalformedInput {
        /// Byte offset reported by the XML reader
        position: u64,
        /// Reader diagnostic
        message: String,
    },

    /// Well-formed XML that is not a TMX document
    #[error("Invalid TMX structure: {0}")]
    Structural(String),

    /// Filesystem failure during read, temp-file write, backup copy or rename
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned by guarded editing-session operations
#[derive(Error, Debug)]
pub enum SessionError {
    /// Split requested on an empty cell
    #[error("Cell is empty, nothing to split")]
    EmptyCell,

    /// Split position not strictly inside the text
    #[error("Split position {pos} must lie strictly inside the text (length {len})")]
    SplitPositionOutOfBounds {
        /// Requested character offset
        pos: usize,
        /// Text length in characters
        len: usize,
    },

    /// Merge requested on the last row
    #[error("No row below to merge with")]
    NoRowBelow,

    /// Merge requested where both cells are blank
    #[error("Both cells are empty, nothing to merge")]
    NothingToMerge,

    /// Move would leave the document
    #[error("Cannot move cell in row {row} past the edge of the document")]
    MoveOutOfBounds {
        /// Row of the cell being moved
        row: usize,
    },

    /// Delete requested on a row with text
    #[error("Row {0} is not empty; both source and target must be blank to delete")]
    RowNotEmpty(usize),

    /// Save requested on an untitled document
    #[error("Document has no file path; use save-as")]
    NoFilePath,

    /// Search text could not be compiled into a matcher
    #[error("Invalid search query: {0}")]
    InvalidQuery(#[from] regex::Error),

    /// Error from the document or a command
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Error from the TMX codec
    #[error("TMX error: {0}")]
    Tmx(#[from] TmxError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the TMX codec
    #[error("TMX error: {0}")]
    Tmx(#[from] TmxError),

    /// Error from an editing session
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the document model
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
