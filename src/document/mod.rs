/*!
 * Alignment document model.
 *
 * This module provides the in-memory representation of a TMX file as an
 * ordered sequence of aligned source/target rows:
 * - Cell-level get/set with per-column modification tracking
 * - Row insert/remove primitives used by every alignment command
 * - Opaque carriage of the original TMX records for round-trip output
 */

pub mod model;
pub mod text;

pub use model::{AlignmentDocument, AlignmentRow, Column, DocumentHeader, DocumentStats};
pub use text::{char_len, split_at_char};
