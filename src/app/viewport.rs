//! Scroll arithmetic for the listing pane.
//!
//! Two rows of the screen are taken by the header and the status line; the rest shows
//! a window of the listing starting at `offset`.

pub const DEFAULT_SCREEN_HEIGHT: u16 = 24;
const RESERVED_ROWS: u16 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    screen_height: u16,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: 0,
            screen_height: DEFAULT_SCREEN_HEIGHT,
        }
    }
}

impl Viewport {
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn screen_height(&self) -> u16 {
        self.screen_height
    }

    /// Listing rows that fit on screen. Never less than one.
    pub fn visible_rows(&self) -> usize {
        usize::from(self.screen_height.saturating_sub(RESERVED_ROWS)).max(1)
    }

    pub fn set_screen_height(&mut self, height: u16) {
        self.screen_height = height;
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Scrolls just enough to keep `cursor` on screen, then pulls the window back so it
    /// never runs past the end of a listing of `len` entries.
    pub fn follow(&mut self, cursor: usize, len: usize) {
        let rows = self.visible_rows();
        if cursor >= self.offset + rows {
            self.offset = cursor + 1 - rows;
        }
        if cursor < self.offset {
            self.offset = cursor;
        }
        if self.offset + rows > len {
            self.offset = len.saturating_sub(rows);
        }
        if self.offset >= len {
            self.offset = 0;
        }
    }

    /// Index range of the listing currently on screen.
    pub fn window(&self, len: usize) -> std::ops::Range<usize> {
        let start = self.offset.min(len);
        start..(start + self.visible_rows()).min(len)
    }
}
