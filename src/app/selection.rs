//! Cursor and mark bookkeeping for a single buffer.
//!
//! Marks are positional: they index into the current listing and are dropped whenever
//! the listing is rebuilt. Index 0 (`.`) and index 1 (`..`) can never be marked.

use std::collections::BTreeSet;

/// First listing index that may carry a mark.
pub const FIRST_MARKABLE: usize = 2;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Selection {
    cursor: usize,
    marked: BTreeSet<usize>,
}

impl Selection {
    #[inline]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[inline]
    pub fn marked(&self) -> &BTreeSet<usize> {
        &self.marked
    }

    #[inline]
    pub fn is_marked(&self, idx: usize) -> bool {
        self.marked.contains(&idx)
    }

    #[inline]
    pub fn has_marks(&self) -> bool {
        !self.marked.is_empty()
    }

    pub fn move_up(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        true
    }

    pub fn move_down(&mut self, len: usize) -> bool {
        if self.cursor + 1 >= len {
            return false;
        }
        self.cursor += 1;
        true
    }

    pub fn jump_first(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_last(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }

    /// Places the cursor at `idx`, clamped into the listing.
    pub fn set_cursor(&mut self, idx: usize, len: usize) {
        self.cursor = idx.min(len.saturating_sub(1));
    }

    /// Keeps the cursor inside a listing that may have shrunk.
    pub fn clamp(&mut self, len: usize) {
        self.set_cursor(self.cursor, len);
    }

    /// Flips the mark on the cursor row. Returns false for `.` and `..`.
    pub fn toggle_mark(&mut self, len: usize) -> bool {
        if self.cursor < FIRST_MARKABLE || self.cursor >= len {
            return false;
        }
        if !self.marked.remove(&self.cursor) {
            self.marked.insert(self.cursor);
        }
        true
    }

    /// Marks (or unmarks) from the cursor.
    ///
    /// On `.` every markable row is affected, on `..` nothing is. Anywhere else only the
    /// cursor row changes and the cursor advances, so repeated presses sweep downward.
    pub fn mark_from_cursor(&mut self, len: usize, mark: bool) {
        match self.cursor {
            0 => {
                if mark {
                    self.marked.extend(FIRST_MARKABLE..len);
                } else {
                    self.marked.clear();
                }
            }
            1 => {}
            idx if idx < len => {
                if mark {
                    self.marked.insert(idx);
                } else {
                    self.marked.remove(&idx);
                }
                self.move_down(len);
            }
            _ => {}
        }
    }

    pub fn clear_marks(&mut self) {
        self.marked.clear();
    }

    /// Resets to a fresh listing: no marks, cursor at the top.
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.marked.clear();
    }
}
