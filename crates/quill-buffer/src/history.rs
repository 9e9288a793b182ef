//! Undo log: primitive edit records and their coalescing.
//!
//! ## Learning: Record Small, Undo Big
//!
//! The buffer logs every keystroke as its own [`Edit`]. Undoing one
//! keystroke at a time would be tedious, so [`UndoLog::get`] pops a
//! whole run of related records and folds them into one [`UndoAction`]:
//!
//! - consecutive typed characters become one `DeleteRange`
//! - consecutive deletions (forward or backspace) become one `InsertText`
//! - line splits and joins are always undone one at a time
//!
//! The folding lives in [`coalesce`], a plain function over the record
//! stack, so it can be tested without a buffer.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::Position;

/// The kind of a primitive edit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    /// A character was typed
    CharInsert,
    /// A character was removed
    CharDelete,
    /// A line was split in two
    LineSplit,
    /// Two lines were merged
    LineJoin,
}

/// Which key removed a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeleteDirection {
    /// The character at the cursor was removed; the cursor stayed put
    Forward,
    /// The character before the cursor was removed; the cursor moved left
    Backward,
}

/// A single primitive edit, as submitted by the buffer.
///
/// Positions follow the buffer's logging conventions:
/// - `CharInsert`: the column *after* the inserted character
/// - `CharDelete`: the column the deleted character occupied
/// - `LineSplit`: the cursor before the split
/// - `LineJoin`: the join point (end of the upper line's old text)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edit {
    CharInsert {
        at: Position,
        ch: char,
    },
    CharDelete {
        at: Position,
        ch: char,
        direction: DeleteDirection,
    },
    LineSplit {
        at: Position,
    },
    LineJoin {
        at: Position,
    },
}

impl Edit {
    /// Creates a character-insert record.
    pub fn insert(at: Position, ch: char) -> Self {
        Edit::CharInsert { at, ch }
    }

    /// Creates a record for a character removed with forward delete.
    pub fn delete_forward(at: Position, ch: char) -> Self {
        Edit::CharDelete {
            at,
            ch,
            direction: DeleteDirection::Forward,
        }
    }

    /// Creates a record for a character removed with backspace.
    pub fn backspace(at: Position, ch: char) -> Self {
        Edit::CharDelete {
            at,
            ch,
            direction: DeleteDirection::Backward,
        }
    }

    /// Creates a line-split record.
    pub fn split(at: Position) -> Self {
        Edit::LineSplit { at }
    }

    /// Creates a line-join record.
    pub fn join(at: Position) -> Self {
        Edit::LineJoin { at }
    }

    /// Returns the kind of this record.
    pub fn kind(&self) -> EditKind {
        match self {
            Edit::CharInsert { .. } => EditKind::CharInsert,
            Edit::CharDelete { .. } => EditKind::CharDelete,
            Edit::LineSplit { .. } => EditKind::LineSplit,
            Edit::LineJoin { .. } => EditKind::LineJoin,
        }
    }

    /// Returns the logged position.
    pub fn position(&self) -> Position {
        match *self {
            Edit::CharInsert { at, .. }
            | Edit::CharDelete { at, .. }
            | Edit::LineSplit { at }
            | Edit::LineJoin { at } => at,
        }
    }

    /// Returns the affected character, for character edits.
    pub fn character(&self) -> Option<char> {
        match *self {
            Edit::CharInsert { ch, .. } | Edit::CharDelete { ch, .. } => Some(ch),
            Edit::LineSplit { .. } | Edit::LineJoin { .. } => None,
        }
    }
}

/// One user-level undo step, ready to be applied to the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UndoAction {
    /// Put deleted text back at `at`, then leave the cursor on `cursor`
    InsertText {
        at: Position,
        text: String,
        cursor: usize,
    },
    /// Remove `count` typed characters starting at `at`
    DeleteRange { at: Position, count: usize },
    /// Merge the line below `at.row` back onto it at `at.column`
    Join { at: Position },
    /// Split `at.row` at `at.column`
    Split { at: Position },
}

impl UndoAction {
    /// Returns the position the action applies to.
    pub fn position(&self) -> Position {
        match *self {
            UndoAction::InsertText { at, .. }
            | UndoAction::DeleteRange { at, .. }
            | UndoAction::Join { at }
            | UndoAction::Split { at } => at,
        }
    }
}

/// Stack of primitive edit records.
///
/// ## Learning: VecDeque
///
/// New records go on the back and undo pops from the back, so a `Vec`
/// would do, except that a bounded log also drops its oldest record
/// from the front.
#[derive(Debug, Clone, Default)]
pub struct UndoLog {
    /// Submitted records, oldest first
    records: VecDeque<Edit>,
    /// Maximum number of records to keep (0 = unbounded)
    limit: usize,
}

impl UndoLog {
    /// Creates an unbounded log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a log that keeps at most `limit` records.
    ///
    /// A limit of 0 means unbounded.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit,
        }
    }

    /// Pushes one record.
    pub fn submit(&mut self, edit: Edit) {
        self.records.push_back(edit);

        if self.limit > 0 && self.records.len() > self.limit {
            self.records.pop_front();
        }
    }

    /// Pops the next undo step, or `None` if the log is empty.
    pub fn get(&mut self) -> Option<UndoAction> {
        let action = coalesce(&mut self.records);
        if let Some(action) = &action {
            tracing::trace!(?action, remaining = self.records.len(), "coalesced undo step");
        }
        action
    }

    /// Discards all records.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Returns the number of stored records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns the most recent record without consuming it.
    pub fn peek(&self) -> Option<&Edit> {
        self.records.back()
    }
}

/// Pops a run of related records off the back of `records` and folds
/// them into a single inverse action.
///
/// Deletions batch while the next record is on the same row and its
/// column equals the last popped column (forward delete keeps the
/// index) or that column plus one (backspace walks left). The two
/// tests are not told apart, so a run mixing both keys on one spot
/// folds into a single step.
pub fn coalesce(records: &mut VecDeque<Edit>) -> Option<UndoAction> {
    let top = records.pop_back()?;

    let action = match top {
        Edit::CharDelete { at, ch, direction } => {
            let mut text = vec![ch];
            // Index in `text` of the most recently restored character
            let mut insertion = 0;
            let mut last = at;
            let mut first_direction = direction;

            while let Some(&Edit::CharDelete {
                at: next,
                ch,
                direction,
            }) = records.back()
            {
                if next.row != last.row {
                    break;
                }
                if next.column == last.column {
                    text.insert(insertion, ch);
                } else if next.column == last.column + 1 {
                    insertion += 1;
                    text.insert(insertion, ch);
                } else {
                    break;
                }
                last = next;
                first_direction = direction;
                records.pop_back();
            }

            let cursor = match first_direction {
                DeleteDirection::Forward => last.column,
                DeleteDirection::Backward => last.column + 1,
            };

            UndoAction::InsertText {
                at,
                text: text.into_iter().collect(),
                cursor,
            }
        }
        Edit::CharInsert { at, .. } => {
            let mut last = at;
            let mut count = 1;

            while let Some(&Edit::CharInsert { at: next, .. }) = records.back() {
                if next.row != last.row || next.column + 1 != last.column {
                    break;
                }
                last = next;
                count += 1;
                records.pop_back();
            }

            UndoAction::DeleteRange {
                at: last.with_column(last.column.saturating_sub(1)),
                count,
            }
        }
        Edit::LineSplit { at } => UndoAction::Join { at },
        Edit::LineJoin { at } => UndoAction::Split { at },
    };

    Some(action)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: usize, column: usize) -> Position {
        Position::new(row, column)
    }

    #[test]
    fn test_empty_log_yields_nothing() {
        let mut log = UndoLog::new();
        assert!(log.is_empty());
        assert_eq!(log.get(), None);
    }

    #[test]
    fn test_typed_run_becomes_one_delete() {
        let mut log = UndoLog::new();
        log.submit(Edit::insert(pos(0, 1), 'c'));
        log.submit(Edit::insert(pos(0, 2), 'a'));
        log.submit(Edit::insert(pos(0, 3), 't'));

        assert_eq!(
            log.get(),
            Some(UndoAction::DeleteRange {
                at: pos(0, 0),
                count: 3
            })
        );
        assert!(log.is_empty());
    }

    #[test]
    fn test_typing_after_a_jump_is_a_separate_step() {
        let mut log = UndoLog::new();
        log.submit(Edit::insert(pos(0, 1), 'a'));
        log.submit(Edit::insert(pos(0, 2), 'b'));
        log.submit(Edit::insert(pos(0, 6), 'x'));
        log.submit(Edit::insert(pos(0, 7), 'y'));

        assert_eq!(
            log.get(),
            Some(UndoAction::DeleteRange {
                at: pos(0, 5),
                count: 2
            })
        );
        assert_eq!(
            log.get(),
            Some(UndoAction::DeleteRange {
                at: pos(0, 0),
                count: 2
            })
        );
        assert_eq!(log.get(), None);
    }

    #[test]
    fn test_typing_on_another_row_is_a_separate_step() {
        let mut log = UndoLog::new();
        log.submit(Edit::insert(pos(0, 1), 'a'));
        log.submit(Edit::insert(pos(1, 2), 'b'));

        assert_eq!(
            log.get(),
            Some(UndoAction::DeleteRange {
                at: pos(1, 1),
                count: 1
            })
        );
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_backspace_run_restores_left_to_right() {
        // "cat" erased with three backspaces from column 3
        let mut log = UndoLog::new();
        log.submit(Edit::backspace(pos(0, 2), 't'));
        log.submit(Edit::backspace(pos(0, 1), 'a'));
        log.submit(Edit::backspace(pos(0, 0), 'c'));

        assert_eq!(
            log.get(),
            Some(UndoAction::InsertText {
                at: pos(0, 0),
                text: "cat".to_string(),
                cursor: 3,
            })
        );
    }

    #[test]
    fn test_forward_delete_run_restores_left_to_right() {
        // "cat" erased with three forward deletes from column 0
        let mut log = UndoLog::new();
        log.submit(Edit::delete_forward(pos(0, 0), 'c'));
        log.submit(Edit::delete_forward(pos(0, 0), 'a'));
        log.submit(Edit::delete_forward(pos(0, 0), 't'));

        assert_eq!(
            log.get(),
            Some(UndoAction::InsertText {
                at: pos(0, 0),
                text: "cat".to_string(),
                cursor: 0,
            })
        );
    }

    #[test]
    fn test_mixed_delete_run_folds_into_one_step() {
        // "cat" with the cursor after 'c': delete 'a', then backspace 'c'
        let mut log = UndoLog::new();
        log.submit(Edit::delete_forward(pos(0, 1), 'a'));
        log.submit(Edit::backspace(pos(0, 0), 'c'));

        assert_eq!(
            log.get(),
            Some(UndoAction::InsertText {
                at: pos(0, 0),
                text: "ca".to_string(),
                cursor: 1,
            })
        );
    }

    #[test]
    fn test_deletes_split_by_other_edits() {
        let mut log = UndoLog::new();
        log.submit(Edit::backspace(pos(0, 4), 'x'));
        log.submit(Edit::insert(pos(0, 5), 'y'));
        log.submit(Edit::backspace(pos(0, 4), 'y'));

        assert_eq!(
            log.get(),
            Some(UndoAction::InsertText {
                at: pos(0, 4),
                text: "y".to_string(),
                cursor: 5,
            })
        );
        assert_eq!(log.peek().map(Edit::kind), Some(EditKind::CharInsert));
    }

    #[test]
    fn test_structural_edits_never_batch() {
        let mut log = UndoLog::new();
        log.submit(Edit::split(pos(0, 2)));
        log.submit(Edit::split(pos(1, 0)));
        log.submit(Edit::join(pos(1, 3)));

        assert_eq!(log.get(), Some(UndoAction::Split { at: pos(1, 3) }));
        assert_eq!(log.get(), Some(UndoAction::Join { at: pos(1, 0) }));
        assert_eq!(log.get(), Some(UndoAction::Join { at: pos(0, 2) }));
        assert_eq!(log.get(), None);
    }

    #[test]
    fn test_clear_discards_everything() {
        let mut log = UndoLog::new();
        log.submit(Edit::insert(pos(0, 1), 'a'));
        log.submit(Edit::split(pos(0, 1)));
        log.clear();

        assert!(log.is_empty());
        assert_eq!(log.get(), None);
    }

    #[test]
    fn test_limit_drops_oldest_records() {
        let mut log = UndoLog::with_limit(2);
        log.submit(Edit::split(pos(0, 0)));
        log.submit(Edit::split(pos(1, 0)));
        log.submit(Edit::split(pos(2, 0)));

        assert_eq!(log.len(), 2);
        assert_eq!(log.get(), Some(UndoAction::Join { at: pos(2, 0) }));
        assert_eq!(log.get(), Some(UndoAction::Join { at: pos(1, 0) }));
        assert_eq!(log.get(), None);
    }

    #[test]
    fn test_record_accessors() {
        let edit = Edit::backspace(pos(3, 1), 'q');
        assert_eq!(edit.kind(), EditKind::CharDelete);
        assert_eq!(edit.position(), pos(3, 1));
        assert_eq!(edit.character(), Some('q'));
        assert_eq!(Edit::join(pos(0, 0)).character(), None);
    }
}
