//! Sidebar view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::SidebarRow;
use crate::state::{Focus, TuiState};

/// Columns the sidebar occupies when expanded.
pub const SIDEBAR_WIDTH: u16 = 30;

/// Renders the grouped session list.
pub fn render_sidebar(state: &TuiState, frame: &mut Frame, area: Rect) {
    let sidebar = &state.sidebar;
    let focused = state.focus == Focus::Sidebar;

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = if sidebar.filter().is_empty() {
        " sessions ".to_string()
    } else {
        format!(" sessions /{}", sidebar.filter())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if sidebar.is_loading() {
        frame.render_widget(
            Paragraph::new(Span::styled("loading...", Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }
    if sidebar.is_empty() {
        frame.render_widget(
            Paragraph::new(vec![
                Line::default(),
                Line::from(Span::styled(
                    "your conversations will",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "appear here once you",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "start chatting",
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            inner,
        );
        return;
    }

    let height = inner.height as usize;
    let selected = sidebar.selected_index().unwrap_or(0);
    // Keep the selected row in view.
    let offset = selected.saturating_sub(height.saturating_sub(1));

    let active_id = state.session.id();
    let width = inner.width as usize;
    let lines: Vec<Line<'static>> = sidebar
        .rows()
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, row)| row_line(row, idx, selected, focused, active_id, width))
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn row_line(
    row: &SidebarRow,
    idx: usize,
    selected: usize,
    focused: bool,
    active_id: Option<&str>,
    width: usize,
) -> Line<'static> {
    match row {
        SidebarRow::Header(label) => Line::from(Span::styled(
            (*label).to_string(),
            Style::default().fg(Color::DarkGray),
        )),
        SidebarRow::Session(session) => {
            let mut style = Style::default();
            if active_id == Some(session.id.as_str()) {
                style = style.add_modifier(Modifier::BOLD);
            }
            if focused && idx == selected {
                style = style.add_modifier(Modifier::REVERSED);
            }
            let mut label = format!("  {}", session.display_title());
            if label.chars().count() > width {
                label = label.chars().take(width.saturating_sub(1)).collect();
                label.push('…');
            }
            Line::from(Span::styled(label, style))
        }
    }
}
