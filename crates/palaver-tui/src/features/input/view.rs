//! Input view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::state::{Focus, TuiState};

/// Rows the input area occupies (content plus borders).
pub const INPUT_HEIGHT: u16 = 3;

/// Renders the input box and positions the terminal cursor.
pub fn render_input(state: &TuiState, frame: &mut Frame, area: Rect) {
    let title = match state.session.title() {
        Some(title) => format!(" {title} "),
        None if state.session.is_open() => " new session ".to_string(),
        None => " palaver ".to_string(),
    };

    let border_style = if state.focus == Focus::Input {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let (visible, cursor_col) = visible_window(state.input.text(), state.input.cursor(), inner_width);

    let content = if visible.is_empty() {
        let hint = if !state.session.is_open() {
            "pick an agent with ctrl+n"
        } else if state.stream.is_active() {
            "waiting for the agent..."
        } else {
            "send a message..."
        };
        Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray)))
    } else {
        Line::from(Span::raw(visible.to_string()))
    };

    let input = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(title),
    );
    frame.render_widget(input, area);

    if state.focus == Focus::Input && state.session.is_open() {
        frame.set_cursor_position((area.x + 1 + cursor_col as u16, area.y + 1));
    }
}

/// Returns the slice of `text` that fits in `width` columns while keeping the
/// cursor visible, plus the cursor's display column within that slice.
fn visible_window(text: &str, cursor: usize, width: usize) -> (&str, usize) {
    if width == 0 {
        return ("", 0);
    }

    let head_width = text[..cursor].width();
    if text.width() < width {
        return (text, head_width);
    }

    // Walk backwards from the cursor until the window is full.
    let mut start = cursor;
    let mut used = 0usize;
    for (pos, c) in text[..cursor].char_indices().rev() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w >= width {
            break;
        }
        used += w;
        start = pos;
    }

    // Extend forward from the cursor with whatever space remains.
    let mut end = cursor;
    let mut forward = text[start..cursor].width();
    for (pos, c) in text[cursor..].char_indices() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if forward + w >= width {
            break;
        }
        forward += w;
        end = cursor + pos + c.len_utf8();
    }

    (&text[start..end], text[start..cursor].width())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_is_fully_visible() {
        let (visible, col) = visible_window("hello", 3, 20);
        assert_eq!(visible, "hello");
        assert_eq!(col, 3);
    }

    #[test]
    fn long_text_keeps_the_cursor_in_view() {
        let text = "abcdefghijklmnopqrstuvwxyz";
        let cursor = text.len();
        let (visible, col) = visible_window(text, cursor, 10);
        assert!(visible.len() <= 10);
        assert!(visible.ends_with('z'));
        assert!(col <= 10);
    }

    #[test]
    fn zero_width_is_handled() {
        assert_eq!(visible_window("abc", 1, 0), ("", 0));
    }
}
