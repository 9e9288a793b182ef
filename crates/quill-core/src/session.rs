//! Editing session: a buffer bound to a file and a dictionary.
//!
//! ## Learning: The Facade Pattern
//!
//! `Session` gives callers one object to drive. It owns the buffer,
//! remembers where the text came from, and feeds lines to whatever
//! [`Dictionary`] is installed. The buffer itself knows nothing about
//! files on disk or spelling.

use quill_buffer::{Buffer, Position};
use serde::Serialize;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::spelling::{Dictionary, SpellChecker};
use crate::{CoreError, CoreResult};

/// One unknown word found in the buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Misspelling {
    /// Row the word is on
    pub row: usize,
    /// Column range of the word
    pub columns: Range<usize>,
    /// The word as written
    pub word: String,
    /// Corrections, best first
    pub suggestions: Vec<String>,
}

/// Invalid-token ranges for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineReport {
    /// Row index (0-based)
    pub row: usize,
    /// Half-open character ranges of misspelled words, left to right
    pub ranges: Vec<Range<usize>>,
}

/// The editing session state.
pub struct Session {
    /// The text being edited
    buffer: Buffer,

    /// Installed dictionary, if any
    dictionary: Option<Box<dyn Dictionary>>,

    /// Session configuration
    config: Config,

    /// File the buffer was opened from or last saved to
    path: Option<PathBuf>,
}

impl Session {
    /// Creates a session with an empty buffer.
    pub fn new(config: Config) -> Self {
        Self {
            buffer: Buffer::with_config(config.editor.buffer_config()),
            dictionary: None,
            config,
            path: None,
        }
    }

    // ==================== Files ====================

    /// Loads a file into the buffer, discarding undo history.
    ///
    /// On error the buffer and the remembered path are unchanged.
    pub fn open(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.buffer.load(path)?;
        self.path = Some(path.to_path_buf());

        tracing::info!(path = %path.display(), lines = self.buffer.line_count(), "opened file");
        Ok(())
    }

    /// Saves the buffer to the file it came from.
    pub fn save(&mut self) -> CoreResult<()> {
        let path = self.path.clone().ok_or(CoreError::NoPath)?;
        self.buffer.save(&path)?;
        Ok(())
    }

    /// Saves the buffer to a new file and remembers it.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.buffer.save(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Returns the associated file path, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ==================== Buffer Access ====================

    /// Returns the buffer.
    pub fn buffer(&self) -> &Buffer {
        &self.buffer
    }

    /// Returns a mutable reference to the buffer.
    pub fn buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffer
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    // ==================== Spelling ====================

    /// Loads a word list and installs it as the dictionary.
    ///
    /// Returns the number of words loaded.
    pub fn load_dictionary(&mut self, path: impl AsRef<Path>) -> CoreResult<usize> {
        let mut checker = SpellChecker::new();
        let words = checker.load(path)?;
        self.set_dictionary(checker);
        Ok(words)
    }

    /// Installs a dictionary, replacing any previous one.
    pub fn set_dictionary(&mut self, dictionary: impl Dictionary + 'static) {
        self.dictionary = Some(Box::new(dictionary));
    }

    /// Returns true if a dictionary is installed.
    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    fn dictionary(&self) -> CoreResult<&dyn Dictionary> {
        self.dictionary.as_deref().ok_or(CoreError::NoDictionary)
    }

    /// Returns invalid-token ranges for up to `count` rows starting at
    /// `start_row`. Rows without problems are left out.
    pub fn check_lines(&self, start_row: usize, count: usize) -> CoreResult<Vec<LineReport>> {
        let dictionary = self.dictionary()?;
        let lines = self.buffer.lines(start_row, count)?;

        Ok(lines
            .iter()
            .enumerate()
            .filter_map(|(offset, line)| {
                let ranges = dictionary.find_invalid_ranges(line);
                (!ranges.is_empty()).then_some(LineReport {
                    row: start_row + offset,
                    ranges,
                })
            })
            .collect())
    }

    /// Returns every unknown word in the buffer with its corrections.
    pub fn misspellings(&self) -> CoreResult<Vec<Misspelling>> {
        let dictionary = self.dictionary()?;
        let max = self.config.spelling.max_suggestions;
        let mut found = Vec::new();

        for report in self.check_lines(0, self.buffer.line_count())? {
            let Some(line) = self.buffer.line(report.row) else {
                continue;
            };
            for columns in report.ranges {
                let word: String = line
                    .chars()
                    .skip(columns.start)
                    .take(columns.len())
                    .collect();
                let suggestions = dictionary.suggest(&word, max);
                found.push(Misspelling {
                    row: report.row,
                    columns,
                    word,
                    suggestions,
                });
            }
        }

        tracing::debug!(count = found.len(), "spell check finished");
        Ok(found)
    }

    /// Returns corrections for `word`, empty if it is already valid.
    pub fn suggestions_for(&self, word: &str) -> CoreResult<Vec<String>> {
        let dictionary = self.dictionary()?;
        Ok(dictionary.suggest(word, self.config.spelling.max_suggestions))
    }

    /// Returns the word touching the cursor, if any.
    ///
    /// Words are runs of ASCII letters and apostrophes. A cursor just
    /// past the last letter still counts as touching it.
    pub fn word_at_cursor(&self) -> Option<String> {
        let Position { row, column } = self.buffer.cursor();
        let chars: Vec<char> = self.buffer.line(row)?.chars().collect();
        let is_word = |c: &char| c.is_ascii_alphabetic() || *c == '\'';

        let mut start = column.min(chars.len());
        while start > 0 && is_word(&chars[start - 1]) {
            start -= 1;
        }
        let mut end = column.min(chars.len());
        while end < chars.len() && is_word(&chars[end]) {
            end += 1;
        }

        (start < end).then(|| chars[start..end].iter().collect())
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
