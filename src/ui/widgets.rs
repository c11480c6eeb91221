//! Popup widgets for ie: delete confirmation, buffer chooser and the file viewer.
//!
//! All popups are drawn centred over the listing, cleared first, framed with the
//! configured border shape and coloured from the `[theme.widget]` table.

use crate::config::Config;
use crate::core::formatter::sanitize_name;
use crate::utils::shorten_home_path;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use std::path::Path;

/// Rectangle of `width` x `height` cells centred in `area`, clamped to fit.
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [vertical] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(vertical);
    rect
}

fn popup_block<'a>(title: &'a str, config: &Config) -> Block<'a> {
    let widget = config.theme().widget();
    Block::default()
        .borders(Borders::ALL)
        .border_type(config.display().border_shape().as_border_type())
        .border_style(widget.border_style())
        .title(Span::styled(title, widget.title_style()))
        .style(widget.style())
}

/// Lists every delete target and asks for confirmation.
pub fn draw_confirm_popup(frame: &mut Frame, area: Rect, config: &Config, targets: &[String]) {
    let hint = if config.general().confirm_default() {
        "Delete? [Y/n]"
    } else {
        "Delete? [y/N]"
    };

    let widest = targets
        .iter()
        .map(|t| t.chars().count())
        .chain([hint.len()])
        .max()
        .unwrap_or(0);
    // Two rows of border plus the blank line and the question.
    let width = (widest as u16).saturating_add(4).max(24);
    let height = (targets.len() as u16).saturating_add(4);
    let popup = centered_rect(area, width, height);

    let mut lines: Vec<Line> = targets
        .iter()
        .map(|t| Line::from(sanitize_name(t)))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(hint, config.theme().error_style())).alignment(Alignment::Center));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(" Confirm Delete ", config)),
        popup,
    );
}

/// Shows every buffer's directory with the highlighted choice.
pub fn draw_buffer_chooser<'p>(
    frame: &mut Frame,
    area: Rect,
    config: &Config,
    labels: impl Iterator<Item = &'p Path>,
    active: usize,
    selected: usize,
) {
    let items: Vec<ListItem> = labels
        .enumerate()
        .map(|(i, path)| {
            let marker = if i == active { '*' } else { ' ' };
            ListItem::new(format!("{marker}{:>2} {}", i + 1, shorten_home_path(path)))
        })
        .collect();

    let widest = items.iter().map(ListItem::width).max().unwrap_or(0) as u16;
    let popup = centered_rect(
        area,
        widest.saturating_add(4).max(30),
        (items.len() as u16).saturating_add(2),
    );

    let list = List::new(items)
        .block(popup_block(" Buffers ", config))
        .highlight_style(config.theme().selection_style());
    let mut state = ListState::default().with_selected(Some(selected));

    frame.render_widget(Clear, popup);
    frame.render_stateful_widget(list, popup, &mut state);
}

/// Read-only pager over `lines`, starting at `scroll`.
pub fn draw_viewer(
    frame: &mut Frame,
    area: Rect,
    config: &Config,
    title: &str,
    lines: &[String],
    scroll: usize,
) {
    let popup = area;
    let inner_height = usize::from(popup.height.saturating_sub(2));
    let end = (scroll + inner_height).min(lines.len());
    let start = scroll.min(end);

    let body: Vec<Line> = lines[start..end]
        .iter()
        .map(|l| Line::from(sanitize_name(l)))
        .collect();

    let title = format!(" {title} ({}/{}) q to close ", end, lines.len());
    frame.render_widget(Clear, popup);
    frame.render_widget(Paragraph::new(body).block(popup_block(&title, config)), popup);
}
