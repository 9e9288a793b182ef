//! # Quill Buffer
//!
//! Line-oriented text buffer with a cursor and a batching undo log.
//!
//! ## Key Concepts for Learning Rust
//!
//! ### Ownership & Borrowing
//! - `Buffer` owns its lines and its `UndoLog`; nothing else aliases them
//! - `lines()` hands out a borrowed slice (`&[String]`), no copying
//! - Mutations require `&mut self` (exclusive access)
//!
//! ### Enums as Data
//! - Every edit is an `Edit` variant carrying exactly the data it needs
//! - Undo steps are `UndoAction` variants matched exhaustively by the buffer

mod buffer;
mod cursor;
mod history;

pub use buffer::{Buffer, BufferConfig};
pub use cursor::{Movement, Position};
pub use history::{DeleteDirection, Edit, EditKind, UndoAction, UndoLog, coalesce};

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("Position {row}:{column} is out of bounds")]
    PositionOutOfBounds { row: usize, column: usize },

    #[error("Row {row} is past the end of the buffer ({line_count} lines)")]
    RowOutOfRange { row: usize, line_count: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
