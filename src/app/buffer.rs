//! A single browsable directory view.
//!
//! A [Buffer] owns the snapshot of one directory along with its cursor, marks, scroll
//! position and last search. Anything that may change what the directory contains
//! queues a [Reload]; the session consumes it before the next frame with
//! [Buffer::synchronize].

use crate::app::search::{Direction, SearchState};
use crate::app::selection::Selection;
use crate::app::viewport::Viewport;
use crate::core::fm::{self, Entry};
use crate::error::{IeError, Result};

use std::ffi::{OsStr, OsString};
use std::mem;
use std::path::{Path, PathBuf};

/// Pending re-snapshot of a buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reload {
    /// Same directory, contents changed. The cursor stays, or moves onto `focus` if present.
    InPlace { focus: Option<OsString> },
    /// The buffer moved to a new directory; `previous` is restored if it cannot be listed.
    Enter { previous: PathBuf },
    /// Fresh listing with the cursor on top.
    Reset,
}

#[derive(Debug)]
pub struct Buffer {
    path: PathBuf,
    entries: Vec<Entry>,
    selection: Selection,
    viewport: Viewport,
    search: SearchState,
    reload: Option<Reload>,
}

impl Buffer {
    /// A buffer on `path` whose listing is loaded on the next synchronize.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            entries: Vec::new(),
            selection: Selection::default(),
            viewport: Viewport::default(),
            search: SearchState::default(),
            reload: Some(Reload::Reset),
        }
    }

    /// A buffer with an already built listing. Nothing is read from disk.
    pub fn with_entries(path: PathBuf, entries: Vec<Entry>) -> Self {
        Self {
            entries,
            reload: None,
            ..Self::new(path)
        }
    }

    // Getters / accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn cursor(&self) -> usize {
        self.selection.cursor()
    }

    #[inline]
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn last_query(&self) -> Option<&str> {
        self.search.last_query()
    }

    #[inline]
    pub fn pending_reload(&self) -> Option<&Reload> {
        self.reload.as_ref()
    }

    pub fn selected_entry(&self) -> Option<&Entry> {
        self.entries.get(self.cursor())
    }

    pub fn position_of(&self, name: &OsStr) -> Option<usize> {
        self.entries.iter().position(|e| e.name() == name)
    }

    pub fn dir_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.is_dot_ref() && e.is_dir())
            .count()
    }

    // Reload handling

    /// Queues a re-snapshot. A pending directory change is never downgraded, so a failed
    /// enter can still fall back to the last directory that listed.
    pub fn request_reload(&mut self, reload: Reload) {
        self.reload = match (self.reload.take(), reload) {
            (Some(Reload::Enter { previous }), _) => Some(Reload::Enter { previous }),
            (_, next) => Some(next),
        };
    }

    /// Moves the buffer to `path`. The listing follows on the next synchronize.
    pub fn set_path(&mut self, path: PathBuf) {
        let previous = mem::replace(&mut self.path, path);
        tracing::debug!(from = %previous.display(), to = %self.path.display(), "buffer path changed");
        self.request_reload(Reload::Enter { previous });
    }

    /// Consumes the pending reload, if any.
    ///
    /// Returns whether the listing was rebuilt. On failure the old listing stays; a failed
    /// directory change also restores the previous path and reports [IeError::CannotEnter].
    pub fn synchronize(&mut self) -> Result<bool> {
        let Some(reload) = self.reload.take() else {
            return Ok(false);
        };

        match fm::snapshot(&self.path) {
            Ok(entries) => {
                self.install(entries, reload);
                Ok(true)
            }
            Err(err) => {
                let Reload::Enter { previous } = reload else {
                    return Err(err);
                };
                let failed = mem::replace(&mut self.path, previous);
                tracing::warn!(path = %failed.display(), error = %err, "reverting directory change");
                match err {
                    IeError::ListDir { source, .. } => Err(IeError::CannotEnter {
                        path: failed,
                        source,
                    }),
                    other => Err(other),
                }
            }
        }
    }

    fn install(&mut self, entries: Vec<Entry>, reload: Reload) {
        self.entries = entries;
        self.selection.clear_marks();
        self.search.clear();

        match reload {
            Reload::InPlace { focus } => match focus.and_then(|name| self.position_of(&name)) {
                Some(idx) => self.selection.set_cursor(idx, self.entries.len()),
                None => self.selection.clamp(self.entries.len()),
            },
            Reload::Enter { .. } | Reload::Reset => {
                self.selection.reset();
                self.viewport.reset();
            }
        }
        self.follow();
    }

    // Cursor & marks

    fn follow(&mut self) {
        self.viewport
            .follow(self.selection.cursor(), self.entries.len());
    }

    pub fn set_screen_height(&mut self, height: u16) {
        if self.viewport.screen_height() != height {
            self.viewport.set_screen_height(height);
            self.follow();
        }
    }

    pub fn move_up(&mut self) {
        self.selection.move_up();
        self.follow();
    }

    pub fn move_down(&mut self) {
        self.selection.move_down(self.entries.len());
        self.follow();
    }

    pub fn jump_first(&mut self) {
        self.selection.jump_first();
        self.follow();
    }

    pub fn jump_last(&mut self) {
        self.selection.jump_last(self.entries.len());
        self.follow();
    }

    pub fn select(&mut self, idx: usize) {
        self.selection.set_cursor(idx, self.entries.len());
        self.follow();
    }

    pub fn toggle_mark(&mut self) -> bool {
        self.selection.toggle_mark(self.entries.len())
    }

    pub fn mark_from_cursor(&mut self, mark: bool) {
        self.selection.mark_from_cursor(self.entries.len(), mark);
        self.follow();
    }

    pub fn clear_marks(&mut self) {
        self.selection.clear_marks();
    }

    /// Names a delete acts on: the marked entries, or the cursor entry when nothing is
    /// marked. `.` and `..` are never included.
    pub fn action_targets(&self) -> Vec<String> {
        let pick = |e: &Entry| (!e.is_dot_ref()).then(|| e.name_str().into_owned());
        if self.selection.has_marks() {
            self.selection
                .marked()
                .iter()
                .filter_map(|&i| self.entries.get(i))
                .filter_map(pick)
                .collect()
        } else {
            self.selected_entry().and_then(pick).into_iter().collect()
        }
    }

    // Search

    pub fn set_query(&mut self, query: &str) -> Result<()> {
        self.search.set_query(query)
    }

    /// Moves to the nearest match of the last query. Returns false when nothing matched.
    pub fn search(&mut self, direction: Direction) -> bool {
        match self
            .search
            .find(&self.entries, self.selection.cursor(), direction)
        {
            Some(idx) => {
                self.select(idx);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn names(buf: &Buffer) -> Vec<String> {
        buf.entries()
            .iter()
            .map(|e| e.name_str().into_owned())
            .collect()
    }

    #[test]
    fn first_synchronize_loads_listing() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        File::create(tmp.path().join("b"))?;
        File::create(tmp.path().join("a"))?;

        let mut buf = Buffer::new(tmp.path().to_path_buf());
        assert!(buf.synchronize()?);
        assert_eq!(names(&buf), [".", "..", "a", "b"]);
        assert!(!buf.synchronize()?);
        Ok(())
    }

    #[test]
    fn reload_clears_marks_and_query() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        File::create(tmp.path().join("a"))?;
        let mut buf = Buffer::new(tmp.path().to_path_buf());
        buf.synchronize()?;

        buf.mark_from_cursor(true);
        buf.set_query("a")?;
        buf.request_reload(Reload::InPlace { focus: None });
        buf.synchronize()?;

        assert!(!buf.selection().has_marks());
        assert_eq!(buf.last_query(), None);
        Ok(())
    }

    #[test]
    fn in_place_reload_focuses_named_entry() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        for n in ["a", "b", "c"] {
            File::create(tmp.path().join(n))?;
        }
        let mut buf = Buffer::new(tmp.path().to_path_buf());
        buf.synchronize()?;

        fs::rename(tmp.path().join("a"), tmp.path().join("z"))?;
        buf.request_reload(Reload::InPlace {
            focus: Some("z".into()),
        });
        buf.synchronize()?;
        assert_eq!(buf.selected_entry().map(|e| e.name_str().into_owned()), Some("z".into()));
        Ok(())
    }

    #[test]
    fn cursor_clamped_after_shrink() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        File::create(tmp.path().join("a"))?;
        File::create(tmp.path().join("b"))?;
        let mut buf = Buffer::new(tmp.path().to_path_buf());
        buf.synchronize()?;
        buf.jump_last();
        assert_eq!(buf.cursor(), 3);

        fs::remove_file(tmp.path().join("b"))?;
        buf.request_reload(Reload::InPlace { focus: None });
        buf.synchronize()?;
        assert_eq!(buf.cursor(), 2);
        Ok(())
    }

    #[test]
    fn failed_enter_restores_previous_dir() -> Result<(), Box<dyn Error>> {
        let tmp = TempDir::new()?;
        File::create(tmp.path().join("keep"))?;
        let mut buf = Buffer::new(tmp.path().to_path_buf());
        buf.synchronize()?;

        buf.set_path(tmp.path().join("vanished"));
        let err = buf.synchronize();
        assert!(matches!(err, Err(IeError::CannotEnter { .. })));
        assert_eq!(buf.path(), tmp.path());
        assert!(names(&buf).contains(&"keep".to_string()));
        Ok(())
    }

    #[test]
    fn targets_prefer_marks_and_skip_dot_refs() {
        let entries = [".", "..", "x", "y", "z"]
            .iter()
            .map(|n| Entry::new(*n, None))
            .collect();
        let mut buf = Buffer::with_entries(PathBuf::from("/tmp"), entries);

        assert!(buf.action_targets().is_empty());
        buf.select(3);
        assert_eq!(buf.action_targets(), ["y"]);

        buf.jump_first();
        buf.mark_from_cursor(true);
        assert_eq!(buf.action_targets(), ["x", "y", "z"]);
    }

    #[test]
    fn screen_height_change_rescrolls() {
        let entries = (0..10).map(|i| Entry::new(format!("e{i}"), None)).collect();
        let mut buf = Buffer::with_entries(PathBuf::from("/tmp"), entries);
        buf.set_screen_height(7);
        buf.select(8);
        assert_eq!(buf.viewport().offset(), 4);
        buf.set_screen_height(12);
        assert_eq!(buf.viewport().offset(), 0);
    }
}
