//! Regex search over the entry names of a buffer.
//!
//! The buffer remembers the last submitted pattern so `n`/`N` can repeat it. Matching
//! moves the cursor to the nearest match in the requested direction, never wrapping and
//! never landing on `.` or `..`.

use crate::core::fm::Entry;
use crate::error::Result;

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, Default, Clone)]
pub struct SearchState {
    pattern: Option<Regex>,
}

impl SearchState {
    pub fn last_query(&self) -> Option<&str> {
        self.pattern.as_ref().map(Regex::as_str)
    }

    /// Compiles and stores `query`. An invalid pattern leaves the previous query in place.
    pub fn set_query(&mut self, query: &str) -> Result<()> {
        let re = Regex::new(query)?;
        tracing::debug!(query, "search pattern set");
        self.pattern = Some(re);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.pattern = None;
    }

    /// Index of the nearest matching entry from `cursor` in `direction`.
    ///
    /// Forward scans `cursor+1..len`, backward scans `cursor-1` down to 1.
    pub fn find(&self, entries: &[Entry], cursor: usize, direction: Direction) -> Option<usize> {
        let re = self.pattern.as_ref()?;
        let matches = |&i: &usize| {
            let entry = &entries[i];
            !entry.is_dot_ref() && re.is_match(&entry.name_str())
        };

        match direction {
            Direction::Forward => (cursor + 1..entries.len()).find(matches),
            Direction::Backward => (1..cursor.min(entries.len())).rev().find(matches),
        }
    }
}
