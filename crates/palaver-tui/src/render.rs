//! Pure view/render functions for the TUI.
//!
//! Functions here take `&AppState` by immutable reference, draw to a ratatui
//! frame, and never mutate state or return effects. The only writes are the
//! render-time `Cell`s the transcript uses to remember its viewport.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::input::{INPUT_HEIGHT, render_input};
use crate::overlays::Overlay;
use crate::sidebar::{SIDEBAR_WIDTH, render_sidebar};
use crate::state::{AppState, TuiState};
use crate::transcript::transcript_lines;

/// Height of the status line below the input.
const STATUS_HEIGHT: u16 = 1;

/// Renders the entire TUI to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();
    let state = &app.tui;

    if let Some(error) = &state.load_error {
        render_load_error(error, frame, area);
        return;
    }

    let main_area = if state.sidebar.is_collapsed() {
        area
    } else {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(20)])
            .split(area);
        render_sidebar(state, frame, columns[0]);
        columns[1]
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(INPUT_HEIGHT),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(main_area);

    render_transcript(state, frame, rows[0]);
    render_input(state, frame, rows[1]);
    render_status_line(state, frame, rows[2]);

    if let Some(overlay) = &app.overlay {
        match overlay {
            Overlay::AgentPicker(picker) => picker.render(frame, area),
        }
    }
}

/// Full-view error state for load errors: the session could not be fetched,
/// nothing below it is meaningful.
fn render_load_error(error: &str, frame: &mut Frame, area: Rect) {
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Failed to open session",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::raw(error.to_string())),
        Line::default(),
        Line::from(Span::styled(
            "esc dismiss · ctrl+n new session · ctrl+q quit",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL)),
        area,
    );
}

fn render_transcript(state: &TuiState, frame: &mut Frame, area: Rect) {
    let width = area.width.saturating_sub(2);
    let height = area.height as usize;

    let all_lines = transcript_lines(state, width);
    let total = all_lines.len();
    state.transcript.record_viewport(total, height);

    let offset = state.transcript.offset(total, height);
    let visible: Vec<Line<'static>> = all_lines
        .into_iter()
        .skip(offset)
        .take(height)
        .collect();

    // Bottom-align when the conversation is shorter than the viewport.
    let padded: Vec<Line<'static>> = if visible.len() < height {
        let mut lines = vec![Line::default(); height - visible.len()];
        lines.extend(visible);
        lines
    } else {
        visible
    };

    let inner = Rect {
        x: area.x + 1,
        y: area.y,
        width,
        height: area.height,
    };
    frame.render_widget(Paragraph::new(padded), inner);
}

fn render_status_line(state: &TuiState, frame: &mut Frame, area: Rect) {
    let line = if let Some(notice) = &state.notice {
        Line::from(Span::styled(
            notice.text.clone(),
            Style::default().fg(Color::Yellow),
        ))
    } else if state.stream.is_active() {
        Line::from(Span::styled(
            "streaming... esc to stop",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            "enter send · ctrl+n new session · tab sidebar · ctrl+t collapse · ctrl+q quit",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(line), area);
}
