//! Listing pane drawing module for ie.
//!
//! Builds the long-listing rows (marker, mode, links, owner, group, size, time, name,
//! link target and the ghosted absolute path of the selected row) and draws the window
//! of them the viewport exposes.

use crate::app::Session;
use crate::config::{Config, Display, Theme};
use crate::core::fm::Entry;
use crate::core::formatter::{
    display_width, format_file_size, format_file_time, format_mode, sanitize_name,
};

use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use unicode_width::UnicodeWidthStr;

use std::fs;
use std::path::Path;

const MARKER: &str = "<M> ";
const NO_MARKER: &str = "    ";

/// Column widths shared by every row on screen.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Columns {
    links: usize,
    owner: usize,
    group: usize,
    size: usize,
}

impl Columns {
    pub fn measure(entries: &[Entry]) -> Self {
        entries.iter().fold(Columns::default(), |c, e| Columns {
            links: c.links.max(e.links().to_string().len()),
            owner: c.owner.max(e.owner().width()),
            group: c.group.max(e.group().width()),
            size: c.size.max(format_file_size(e).len()),
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RowState {
    pub selected: bool,
    pub marked: bool,
}

/// Everything a row needs besides the entry itself.
pub struct RowContext<'a> {
    pub dir: &'a Path,
    pub display: &'a Display,
    pub theme: &'a Theme,
    pub columns: Columns,
}

impl<'a> RowContext<'a> {
    pub fn new(dir: &'a Path, config: &'a Config, visible: &[Entry]) -> Self {
        Self {
            dir,
            display: config.display(),
            theme: config.theme(),
            columns: Columns::measure(visible),
        }
    }

    fn name_style(&self, entry: &Entry) -> Style {
        if entry.is_dot_ref() {
            self.theme.dot_entry_style()
        } else if entry.is_dir() {
            self.theme.directory_style()
        } else if entry.is_symlink() {
            self.theme.symlink_style()
        } else if entry.is_executable() {
            self.theme.executable_style()
        } else {
            self.theme.entry_style()
        }
    }
}

/// The attribute columns in front of the name, e.g. `-rw-r--r--  1 ana staff 1.2 kB Mar 04 13:37 `.
pub fn attribute_prefix(entry: &Entry, ctx: &RowContext) -> String {
    let cols = ctx.columns;
    let mut out = format_mode(entry);
    if ctx.display.links() {
        out.push_str(&format!(" {:>w$}", entry.links(), w = cols.links));
    }
    if ctx.display.owner() {
        out.push_str(&format!(" {:<w$}", entry.owner(), w = cols.owner));
    }
    if ctx.display.group() {
        out.push_str(&format!(" {:<w$}", entry.group(), w = cols.group));
    }
    out.push_str(&format!(
        " {:>w$} {} ",
        format_file_size(entry),
        format_file_time(entry.modified()),
        w = cols.size
    ));
    out
}

/// Screen column just past the entry's name, relative to the pane's left edge.
pub fn name_end_column(entry: &Entry, ctx: &RowContext) -> usize {
    MARKER.len()
        + attribute_prefix(entry, ctx).width()
        + display_width(&sanitize_name(&entry.name_str()))
}

pub fn entry_line<'a>(entry: &Entry, ctx: &RowContext, state: RowState) -> Line<'a> {
    let theme = ctx.theme;
    let patch = |style: Style| {
        if state.selected {
            style.patch(theme.selection_style())
        } else {
            style
        }
    };

    let mut spans = Vec::with_capacity(6);
    if state.marked {
        spans.push(Span::styled(MARKER, patch(theme.marker_style())));
    } else {
        spans.push(Span::styled(NO_MARKER, patch(Style::default())));
    }

    let base = if state.marked {
        theme.marker_style()
    } else {
        theme.entry_style()
    };
    spans.push(Span::styled(attribute_prefix(entry, ctx), patch(base)));

    let name_style = if state.marked {
        theme.marker_style()
    } else {
        ctx.name_style(entry)
    };
    spans.push(Span::styled(
        sanitize_name(&entry.name_str()),
        patch(name_style),
    ));

    if ctx.display.symlink_target()
        && let Some(target) = entry.link_target(ctx.dir)
    {
        spans.push(Span::styled(" -> ", patch(base)));
        spans.push(Span::styled(
            sanitize_name(&target.to_string_lossy()),
            patch(theme.symlink_style()),
        ));
    }

    if state.selected && ctx.display.ghost_path() {
        let joined = ctx.dir.join(entry.name());
        let abs = fs::canonicalize(&joined).unwrap_or(joined);
        spans.push(Span::styled(
            format!("  {}", sanitize_name(&abs.to_string_lossy())),
            theme.ghost_style(),
        ));
    }

    Line::from(spans)
}

/// Draws the visible window of the active buffer into `area`.
pub fn draw_listing(frame: &mut Frame, area: Rect, session: &Session) {
    let buffer = session.buffer();
    let theme = session.config().theme();

    if buffer.is_empty() {
        let line = Line::from(Span::styled("    [Empty]", theme.dot_entry_style()));
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let window = buffer.viewport().window(buffer.len());
    let visible = &buffer.entries()[window.clone()];
    let ctx = RowContext::new(buffer.path(), session.config(), visible);
    let cursor = buffer.cursor();
    let selection = buffer.selection();

    let lines: Vec<Line> = window
        .zip(visible)
        .map(|(idx, entry)| {
            let state = RowState {
                selected: idx == cursor,
                marked: selection.is_marked(idx),
            };
            entry_line(entry, &ctx, state)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fm::{EntryKind, EntryMeta};

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn row_shows_attributes_then_name() {
        let config = Config::default();
        let entries = vec![Entry::new(
            "notes.txt",
            Some(EntryMeta::new(EntryKind::File, 0o644, 0)),
        )];
        let ctx = RowContext::new(Path::new("/tmp"), &config, &entries);
        let line = entry_line(&entries[0], &ctx, RowState::default());
        let row = text(&line);

        assert!(row.starts_with("    -rw-r--r-- 1 ? ? 0 B "), "{row}");
        assert!(row.ends_with("notes.txt"), "{row}");
    }

    #[test]
    fn marked_row_carries_marker_and_selected_row_ghost_path() {
        let config = Config::default();
        let entries = vec![Entry::new("a", None)];
        let ctx = RowContext::new(Path::new("/srv"), &config, &entries);
        let line = entry_line(
            &entries[0],
            &ctx,
            RowState {
                selected: true,
                marked: true,
            },
        );
        let row = text(&line);
        assert!(row.starts_with("<M> ??????????"), "{row}");
        assert!(row.ends_with("a  /srv/a"), "{row}");
    }

    #[test]
    fn name_end_matches_rendered_width() {
        let config = Config::default();
        let entries = vec![Entry::new("crab🦀", None)];
        let ctx = RowContext::new(Path::new("/"), &config, &entries);
        let line = entry_line(&entries[0], &ctx, RowState::default());
        assert_eq!(name_end_column(&entries[0], &ctx), line.width());
    }

    #[test]
    fn columns_align_to_widest() {
        let entries = vec![
            Entry::new("a", Some(EntryMeta::new(EntryKind::File, 0o644, 1))),
            Entry::new("b", Some(EntryMeta::new(EntryKind::File, 0o644, 5_123_456))),
            Entry::new("c", None),
        ];
        let cols = Columns::measure(&entries);
        assert_eq!(cols.links, 1);
        assert_eq!(cols.size, format_file_size(&entries[1]).len());
        assert!(cols.size > format_file_size(&entries[0]).len());
    }
}
