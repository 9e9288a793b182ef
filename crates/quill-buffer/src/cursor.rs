//! Cursor positions and movement directions.
//!
//! ## Learning: Ordering on Positions
//!
//! `Position` derives nothing for ordering; `Ord` is written by hand so
//! rows compare first and columns break ties, matching reading order.

use serde::{Deserialize, Serialize};

/// A position in the text buffer (row and column).
///
/// Both row and column are 0-indexed. The column counts characters,
/// not bytes, and may equal the line length (end of line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Row number (0-indexed)
    pub row: usize,
    /// Column number (0-indexed, in characters not bytes)
    pub column: usize,
}

impl Position {
    /// Creates a new position.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Position at the start of the buffer.
    pub const ZERO: Position = Position { row: 0, column: 0 };

    /// Returns the same position on another column.
    pub fn with_column(self, column: usize) -> Position {
        Position { column, ..self }
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        match self.row.cmp(&other.row) {
            std::cmp::Ordering::Equal => self.column.cmp(&other.column),
            other => other,
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Display as 1-indexed for user-facing output
        write!(f, "{}:{}", self.row + 1, self.column + 1)
    }
}

/// A single-step cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Movement {
    /// One row up, column clamped to the new line
    Up,
    /// One row down, column clamped to the new line
    Down,
    /// One character left, wrapping to the end of the previous line
    Left,
    /// One character right, wrapping to the start of the next line
    Right,
    /// Start of the current line
    Home,
    /// End of the current line
    End,
}
