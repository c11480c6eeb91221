//! UI renderer implementation.
//!
//! Contains the top-level [render] entry point used by the terminal loop. The screen is
//! split into the header row, the listing and the status line; popups and the inline
//! rename prompt are drawn over the listing according to the current mode.
//!
//! This module should stay "pure rendering": it reads the session and config and
//! produces widgets. The only write is the screen height, which the viewport needs.

use crate::app::{ActionMode, InputMode, MessageKind, Session};
use crate::ui::{
    panes::{self, RowContext},
    widgets,
};

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

const TITLE: &str = concat!("(I)nteractive.(E)xplorer-v", env!("CARGO_PKG_VERSION"), " list. ");

/// Renders the whole ie screen for one frame.
pub fn render(frame: &mut Frame, session: &mut Session) {
    session.set_screen_height(frame.area().height);
    let session = &*session;

    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header, session);
    panes::draw_listing(frame, body, session);
    render_status(frame, status, session);
    render_overlays(frame, body, session);
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session) {
    let theme = session.config().theme();
    let mut spans = vec![
        Span::styled(TITLE, theme.header_style()),
        Span::styled(
            session.buffer().path().display().to_string(),
            theme.path_style(),
        ),
    ];

    let stack = session.stack();
    if stack.len() > 1 {
        spans.push(Span::styled(
            format!("  [buf {}/{}]", stack.active_index() + 1, stack.len()),
            theme.header_style(),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The default status text: counts, cursor position and marks.
pub fn status_summary(session: &Session) -> String {
    let buffer = session.buffer();
    let len = buffer.len();
    let mut out = format!(
        "{} items  ({} dirs)  [{}/{}]",
        len.saturating_sub(2),
        buffer.dir_count(),
        if len == 0 { 0 } else { buffer.cursor() + 1 },
        len
    );

    let marked = buffer.selection().marked().len();
    if marked > 0 {
        out.push_str(&format!("  {marked} MARKED (u to unmark)"));
    }
    out
}

fn render_status(frame: &mut Frame, area: Rect, session: &Session) {
    let theme = session.config().theme();
    let actions = session.actions();

    // The rename prompt is drawn inline over the listing instead.
    if let ActionMode::Input { mode, prompt } = session.mode()
        && *mode != InputMode::Rename
    {
        let line = Line::from(vec![
            Span::styled(prompt.as_str(), theme.header_style()),
            Span::styled(actions.input_buffer().to_string(), theme.status_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        frame.set_cursor_position(prompt_cursor(
            area,
            prompt,
            actions.input_buffer(),
            actions.input_cursor_pos(),
        ));
        return;
    }

    let line = if let Some(msg) = session.status() {
        let style = match msg.kind() {
            MessageKind::Error => theme.error_style(),
            MessageKind::Info => theme.status_style(),
        };
        Line::from(Span::styled(msg.text().to_string(), style))
    } else if session.prefix_pending() {
        Line::from(Span::styled("C-x-", theme.status_style()))
    } else {
        Line::from(Span::styled(status_summary(session), theme.status_style()))
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_overlays(frame: &mut Frame, area: Rect, session: &Session) {
    let config = session.config();
    match session.mode() {
        ActionMode::Normal => {}
        ActionMode::Input {
            mode: InputMode::Rename,
            prompt,
        } => render_inline_rename(frame, area, session, prompt),
        ActionMode::Input { .. } => {}
        ActionMode::ConfirmDelete { targets } => {
            widgets::draw_confirm_popup(frame, area, config, targets);
        }
        ActionMode::ChooseBuffer { selected } => {
            let stack = session.stack();
            widgets::draw_buffer_chooser(
                frame,
                area,
                config,
                stack.labels(),
                stack.active_index(),
                *selected,
            );
        }
        ActionMode::Viewer {
            title,
            lines,
            scroll,
        } => widgets::draw_viewer(frame, area, config, title, lines, *scroll),
    }
}

/// Draws the rename prompt on the cursor row, just right of the entry's name.
fn render_inline_rename(frame: &mut Frame, area: Rect, session: &Session, prompt: &str) {
    let buffer = session.buffer();
    let Some(entry) = buffer.selected_entry() else {
        return;
    };
    let row = buffer.cursor().saturating_sub(buffer.viewport().offset());
    if row >= usize::from(area.height) {
        return;
    }

    let window = buffer.viewport().window(buffer.len());
    let ctx = RowContext::new(buffer.path(), session.config(), &buffer.entries()[window]);
    let x = (panes::name_end_column(entry, &ctx) + 1).min(usize::from(area.width));
    let x = area.x + x as u16;

    let prompt_area = Rect {
        x,
        y: area.y + row as u16,
        width: area.right().saturating_sub(x),
        height: 1,
    };
    if prompt_area.width == 0 {
        return;
    }

    let actions = session.actions();
    let theme = session.config().theme();
    let line = Line::from(vec![
        Span::styled(prompt.to_string(), theme.header_style()),
        Span::styled(actions.input_buffer().to_string(), theme.entry_style()),
    ]);
    frame.render_widget(Clear, prompt_area);
    frame.render_widget(Paragraph::new(line), prompt_area);
    frame.set_cursor_position(prompt_cursor(
        prompt_area,
        prompt,
        actions.input_buffer(),
        actions.input_cursor_pos(),
    ));
}

/// Terminal cell of the edit cursor, `pos` bytes into `input`.
fn prompt_cursor(area: Rect, prompt: &str, input: &str, pos: usize) -> Position {
    let before = input.get(..pos).unwrap_or(input);
    let offset = (prompt.width() + before.width()) as u16;
    Position::new(
        (area.x + offset).min(area.right().saturating_sub(1)),
        area.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_cursor_counts_display_width() {
        let area = Rect::new(4, 9, 40, 1);
        let pos = prompt_cursor(area, "Query: ", "ab", 1);
        assert_eq!(pos, Position::new(4 + 7 + 1, 9));

        let wide = prompt_cursor(area, "", "🦀x", "🦀".len());
        assert_eq!(wide, Position::new(4 + 2, 9));
    }

    #[test]
    fn prompt_cursor_stays_inside_area() {
        let area = Rect::new(0, 0, 5, 1);
        let pos = prompt_cursor(area, "Arguments: ", "", 0);
        assert_eq!(pos.x, 4);
    }
}
