//! The ordered set of open buffers and which one is active.
//!
//! Buffers are only ever appended. Switching to a buffer resets its cursor and
//! re-reads its directory.

use crate::app::buffer::{Buffer, Reload};

use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct BufferStack {
    buffers: Vec<Buffer>,
    active: usize,
}

impl BufferStack {
    pub fn new(path: PathBuf) -> Self {
        Self {
            buffers: vec![Buffer::new(path)],
            active: 0,
        }
    }

    #[inline]
    pub fn active(&self) -> &Buffer {
        &self.buffers[self.active]
    }

    #[inline]
    pub fn active_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.active]
    }

    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    /// Always false: a stack holds at least one buffer.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Opens a new buffer on `path` and makes it active.
    pub fn push(&mut self, path: PathBuf) -> usize {
        tracing::info!(path = %path.display(), index = self.buffers.len(), "new buffer");
        self.buffers.push(Buffer::new(path));
        self.active = self.buffers.len() - 1;
        self.active
    }

    /// Activates buffer `index`. Out of range or already active is a no-op returning false.
    pub fn switch(&mut self, index: usize) -> bool {
        if index >= self.buffers.len() || index == self.active {
            return false;
        }
        self.active = index;
        self.buffers[index].request_reload(Reload::Reset);
        tracing::debug!(index, "switched buffer");
        true
    }

    /// Directory of every buffer, in stack order.
    pub fn labels(&self) -> impl Iterator<Item = &Path> {
        self.buffers.iter().map(Buffer::path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_activates_new_buffer() {
        let mut stack = BufferStack::new(PathBuf::from("/a"));
        assert_eq!(stack.push(PathBuf::from("/b")), 1);
        assert_eq!(stack.active().path(), Path::new("/b"));
        assert_eq!(stack.labels().collect::<Vec<_>>(), [Path::new("/a"), Path::new("/b")]);
    }

    #[test]
    fn switch_ignores_bad_index_and_self() {
        let mut stack = BufferStack::new(PathBuf::from("/a"));
        stack.push(PathBuf::from("/b"));
        assert!(!stack.switch(7));
        assert!(!stack.switch(1));
        assert_eq!(stack.active_index(), 1);
    }

    #[test]
    fn switch_forces_fresh_listing() {
        let mut stack = BufferStack::new(PathBuf::from("/a"));
        stack.active_mut().request_reload(Reload::InPlace { focus: None });
        let _ = stack.active_mut().synchronize();
        stack.push(PathBuf::from("/b"));

        assert!(stack.switch(0));
        assert_eq!(stack.active().pending_reload(), Some(&Reload::Reset));
    }
}
