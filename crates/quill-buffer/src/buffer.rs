//! Line-oriented text buffer with a single cursor.
//!
//! ## Why a Vec of Lines?
//!
//! Every edit the buffer supports happens at the cursor and touches at
//! most two adjacent lines, so the natural representation is the
//! lines themselves:
//! - **Character edits** only rewrite the current `String`
//! - **Splits and joins** insert or remove one element of the `Vec`
//! - **Row navigation** is plain index arithmetic on `cursor.row`
//!
//! ## Learning: Indices, Not Pointers
//!
//! The cursor stores a row *index* rather than a reference into the
//! `Vec`. After `lines.insert` or `lines.remove` the index is simply
//! updated; there is never a reference that could dangle.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::history::{Edit, UndoAction, UndoLog};
use crate::{BufferError, BufferResult, Movement, Position};

/// A text buffer: a non-empty sequence of lines, a cursor, and the
/// undo log every edit is recorded in.
///
/// # Thread Safety
///
/// `Buffer` is `Send` but is meant to be driven by a single owner.
/// All operations are synchronous.
#[derive(Debug, Clone)]
pub struct Buffer {
    /// Line contents, without terminators. Never empty.
    lines: Vec<String>,

    /// Cursor position; `column` may equal the line length
    cursor: Position,

    /// Primitive edit records for undo
    undo_log: UndoLog,

    /// Whether the buffer has changed since the last load/save
    modified: bool,

    /// Buffer-specific settings
    config: BufferConfig,
}

/// Configuration for buffer behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    /// Number of spaces a tab expands to
    pub tab_width: usize,

    /// Maximum undo records to keep (0 = unbounded)
    pub undo_limit: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            undo_limit: 0,
        }
    }
}

impl Buffer {
    /// Creates a buffer holding one empty line.
    ///
    /// # Example
    /// ```
    /// use quill_buffer::{Buffer, Position};
    ///
    /// let buffer = Buffer::new();
    /// assert_eq!(buffer.line_count(), 1);
    /// assert_eq!(buffer.cursor(), Position::ZERO);
    /// ```
    pub fn new() -> Self {
        Self::with_config(BufferConfig::default())
    }

    /// Creates an empty buffer with custom configuration.
    pub fn with_config(config: BufferConfig) -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Position::ZERO,
            undo_log: UndoLog::with_limit(config.undo_limit),
            modified: false,
            config,
        }
    }

    // ==================== Whole-Content Operations ====================

    /// Replaces the content with a single empty line, moves the cursor
    /// to the origin and discards all undo history.
    pub fn reset(&mut self) {
        self.lines.clear();
        self.lines.push(String::new());
        self.cursor = Position::ZERO;
        self.undo_log.clear();
        self.modified = false;
    }

    /// Loads the buffer from a file.
    ///
    /// On error the buffer is left exactly as it was.
    pub fn load(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        self.load_from_reader(BufReader::new(file))?;

        tracing::debug!(path = %path.display(), lines = self.lines.len(), "loaded buffer");
        Ok(())
    }

    /// Loads the buffer from any buffered reader.
    ///
    /// The whole source is read before anything is replaced, so a read
    /// error leaves the buffer untouched.
    pub fn load_from_reader<R: BufRead>(&mut self, mut reader: R) -> BufferResult<()> {
        let mut lines = Vec::new();
        let mut raw = String::new();
        while reader.read_line(&mut raw)? > 0 {
            lines.push(strip_terminator(&raw));
            raw.clear();
        }
        if lines.is_empty() {
            lines.push(String::new());
        }

        self.reset();
        self.lines = lines;
        Ok(())
    }

    /// Saves every line, each followed by `\n`, to a file.
    ///
    /// The destination is truncated and written in place, so symlinks are
    /// followed and an unwritable file is an error.
    pub fn save(&mut self, path: impl AsRef<Path>) -> BufferResult<()> {
        let path = path.as_ref();

        let result = File::create(path).map_err(BufferError::from).and_then(|file| {
            let mut writer = BufWriter::new(file);
            self.save_to_writer(&mut writer)?;
            writer.flush()?;
            Ok(())
        });

        if let Err(e) = result {
            tracing::warn!(path = %path.display(), error = %e, "failed to save buffer");
            return Err(e);
        }

        self.modified = false;
        tracing::debug!(path = %path.display(), lines = self.lines.len(), "saved buffer");
        Ok(())
    }

    /// Writes every line, each followed by `\n`, to `writer`.
    pub fn save_to_writer<W: Write>(&self, mut writer: W) -> BufferResult<()> {
        for line in &self.lines {
            writer.write_all(line.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    // ==================== Cursor Movement ====================

    /// Moves the cursor one step. Movement past an edge of the buffer
    /// is a no-op.
    pub fn move_cursor(&mut self, movement: Movement) {
        let Position { row, column } = self.cursor;
        let last_row = self.lines.len() - 1;

        match movement {
            Movement::Up => {
                if row > 0 {
                    self.cursor.row -= 1;
                    self.clamp_column();
                }
            }
            Movement::Down => {
                if row < last_row {
                    self.cursor.row += 1;
                    self.clamp_column();
                }
            }
            Movement::Left => {
                if column > 0 {
                    self.cursor.column -= 1;
                } else if row > 0 {
                    self.cursor = Position::new(row - 1, self.line_len(row - 1));
                }
            }
            Movement::Right => {
                if column < self.line_len(row) {
                    self.cursor.column += 1;
                } else if row < last_row {
                    self.cursor = Position::new(row + 1, 0);
                }
            }
            Movement::Home => self.cursor.column = 0,
            Movement::End => self.cursor.column = self.line_len(row),
        }
    }

    /// Keeps the column inside the current line after a row change.
    fn clamp_column(&mut self) {
        let len = self.line_len(self.cursor.row);
        if self.cursor.column > len {
            self.cursor.column = len;
        }
    }

    // ==================== Editing ====================

    /// Inserts a character at the cursor and advances past it.
    ///
    /// A tab becomes `tab_width` spaces, each logged on its own. `\n`
    /// splits the line like [`Buffer::enter`]; `\r` is dropped.
    pub fn insert_char(&mut self, ch: char) {
        match ch {
            '\t' => {
                for _ in 0..self.config.tab_width {
                    self.insert_char(' ');
                }
            }
            '\n' => self.enter(),
            '\r' => {}
            _ => {
                let line = &mut self.lines[self.cursor.row];
                let idx = byte_index(line, self.cursor.column);
                line.insert(idx, ch);
                self.cursor.column += 1;

                self.undo_log.submit(Edit::insert(self.cursor, ch));
                self.modified = true;
            }
        }
    }

    /// Inserts each character of `text` as if typed.
    pub fn insert_str(&mut self, text: &str) {
        for ch in text.chars() {
            self.insert_char(ch);
        }
    }

    /// Deletes the character at the cursor, or joins the next line
    /// onto this one when the cursor is at end of line.
    pub fn delete_forward(&mut self) {
        let Position { row, column } = self.cursor;

        if column == self.line_len(row) {
            if row + 1 < self.lines.len() {
                self.join_below(self.cursor);
                self.undo_log.submit(Edit::join(self.cursor));
                self.modified = true;
            }
            return;
        }

        let line = &mut self.lines[row];
        let ch = line.remove(byte_index(line, column));

        self.undo_log.submit(Edit::delete_forward(self.cursor, ch));
        self.modified = true;
    }

    /// Deletes the character before the cursor, or joins this line onto
    /// the previous one when the cursor is at column 0.
    pub fn backspace(&mut self) {
        let Position { row, column } = self.cursor;

        if column == 0 {
            if row > 0 {
                let join_point = Position::new(row - 1, self.line_len(row - 1));
                self.join_below(join_point);
                self.undo_log.submit(Edit::join(self.cursor));
                self.modified = true;
            }
            return;
        }

        let line = &mut self.lines[row];
        let ch = line.remove(byte_index(line, column - 1));
        self.cursor.column -= 1;

        self.undo_log.submit(Edit::backspace(self.cursor, ch));
        self.modified = true;
    }

    /// Splits the current line at the cursor; the cursor moves to the
    /// start of the new line.
    pub fn enter(&mut self) {
        self.undo_log.submit(Edit::split(self.cursor));
        self.split_at(self.cursor);
        self.modified = true;
    }

    /// Splits `at.row` at `at.column` and puts the cursor at the start
    /// of the lower half. `at` must be a valid position.
    fn split_at(&mut self, at: Position) {
        let line = &mut self.lines[at.row];
        let tail = line.split_off(byte_index(line, at.column));
        self.lines.insert(at.row + 1, tail);
        self.cursor = Position::new(at.row + 1, 0);
    }

    /// Moves the line below `at.row` into it at `at.column` and puts the
    /// cursor on the join point. `at.row` must not be the last row.
    fn join_below(&mut self, at: Position) {
        let next = self.lines.remove(at.row + 1);
        let line = &mut self.lines[at.row];
        line.insert_str(byte_index(line, at.column), &next);
        self.cursor = at;
    }

    // ==================== Undo ====================

    /// Reverts the most recent undo step.
    ///
    /// Returns `Ok(false)` if there was nothing to undo. The replayed
    /// change is not itself recorded.
    pub fn undo(&mut self) -> BufferResult<bool> {
        let Some(action) = self.undo_log.get() else {
            return Ok(false);
        };

        tracing::debug!(?action, "undo");
        self.apply(action)?;
        self.modified = true;
        Ok(true)
    }

    /// Applies an undo step directly to the lines.
    fn apply(&mut self, action: UndoAction) -> BufferResult<()> {
        let at = action.position();
        self.check_position(at)?;

        match action {
            UndoAction::InsertText { at, text, cursor } => {
                let line = &mut self.lines[at.row];
                line.insert_str(byte_index(line, at.column), &text);
                let column = cursor.min(self.line_len(at.row));
                self.cursor = at.with_column(column);
            }
            UndoAction::DeleteRange { at, count } => {
                let end = at.column + count;
                if end > self.line_len(at.row) {
                    return Err(BufferError::PositionOutOfBounds {
                        row: at.row,
                        column: end,
                    });
                }
                let line = &mut self.lines[at.row];
                let range = byte_index(line, at.column)..byte_index(line, end);
                line.replace_range(range, "");
                self.cursor = at;
            }
            UndoAction::Split { at } => self.split_at(at),
            UndoAction::Join { at } => {
                if at.row + 1 >= self.lines.len() {
                    return Err(BufferError::PositionOutOfBounds {
                        row: at.row + 1,
                        column: 0,
                    });
                }
                self.join_below(at);
            }
        }

        Ok(())
    }

    /// Returns true if there are records to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_log.is_empty()
    }

    /// Returns the number of primitive records in the undo log.
    pub fn undo_depth(&self) -> usize {
        self.undo_log.len()
    }

    // ==================== Queries ====================

    /// Returns the cursor position.
    #[inline]
    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Returns up to `count` lines starting at `start_row`.
    ///
    /// `start_row` may equal the line count, which yields an empty
    /// slice; anything past that is an error.
    pub fn lines(&self, start_row: usize, count: usize) -> BufferResult<&[String]> {
        let line_count = self.lines.len();
        if start_row > line_count {
            return Err(BufferError::RowOutOfRange {
                row: start_row,
                line_count,
            });
        }

        let end = start_row.saturating_add(count).min(line_count);
        Ok(&self.lines[start_row..end])
    }

    /// Returns a single line, if it exists.
    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Returns the number of lines (always at least 1).
    #[inline]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Returns the whole content with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// Returns true if the buffer changed since the last load, reset or save.
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Length of a line in characters.
    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    /// Checks that `at` names an existing row and a column within it.
    fn check_position(&self, at: Position) -> BufferResult<()> {
        if at.row >= self.lines.len() || at.column > self.line_len(at.row) {
            return Err(BufferError::PositionOutOfBounds {
                row: at.row,
                column: at.column,
            });
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for Buffer {
    fn from(s: &str) -> Self {
        let mut buffer = Buffer::new();
        buffer.lines = s.split_terminator('\n').map(strip_terminator).collect();
        if buffer.lines.is_empty() {
            buffer.lines.push(String::new());
        }
        buffer
    }
}

impl From<String> for Buffer {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

/// Converts a character column into a byte index within `line`.
///
/// Columns past the end map to the end of the line.
fn byte_index(line: &str, column: usize) -> usize {
    line.char_indices()
        .nth(column)
        .map_or(line.len(), |(idx, _)| idx)
}

/// Drops a trailing `\n` and then at most one `\r`.
fn strip_terminator(line: &str) -> String {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line).to_string()
}
