//! Transcript view: messages to styled, wrapped lines.

use palaver_core::chat::{Message, MessageContent, MessageSource};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use super::state::CachedLines;
use super::wrap::wrap_text;
use crate::state::TuiState;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Builds the full transcript as pre-wrapped lines for the given width.
///
/// Per-message lines come from the wrap cache keyed by (revision, width), so
/// only messages touched since the last frame are re-wrapped. The thinking
/// indicator is appended outside the cache because it animates.
pub fn transcript_lines(state: &TuiState, width: u16) -> Vec<Line<'static>> {
    let transcript = &state.transcript;
    let mut lines: Vec<Line<'static>> = Vec::new();

    transcript.with_cache(|cache| {
        for message in transcript.store.messages() {
            let cached = cache.get(&message.id);
            let fresh = cached.is_none_or(|entry| {
                entry.revision != message.revision || entry.width != width
            });
            if fresh {
                cache.insert(
                    message.id.clone(),
                    CachedLines {
                        revision: message.revision,
                        width,
                        lines: message_lines(message, &transcript.tools, width),
                    },
                );
            }
            if let Some(entry) = cache.get(&message.id) {
                lines.extend(entry.lines.iter().cloned());
            }
        }
    });

    if state.is_thinking() {
        let spinner = SPINNER_FRAMES[state.spinner_frame % SPINNER_FRAMES.len()];
        lines.push(Line::from(Span::styled(
            format!("{spinner} thinking..."),
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
        )));
        lines.push(Line::default());
    }

    lines
}

/// Renders one message as styled lines, trailing blank line included.
fn message_lines(
    message: &Message,
    tools: &super::tools::ToolRenderers,
    width: u16,
) -> Vec<Line<'static>> {
    let width = width.max(4) as usize;
    let mut lines = Vec::new();

    if let Some(reasoning) = message.reasoning.as_deref()
        && !reasoning.is_empty()
    {
        let style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC);
        for wrapped in wrap_text(reasoning, width) {
            lines.push(Line::from(Span::styled(wrapped, style)));
        }
    }

    if !message.content.is_empty() {
        match message.source {
            MessageSource::User => {
                let text = message.content.rendered();
                for (i, wrapped) in wrap_text(&text, width.saturating_sub(2)).into_iter().enumerate()
                {
                    let marker = if i == 0 { "❯ " } else { "  " };
                    lines.push(Line::from(vec![
                        Span::styled(marker, Style::default().fg(Color::Cyan)),
                        Span::styled(
                            wrapped,
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]));
                }
            }
            MessageSource::AiAgent => {
                let structured = matches!(message.content, MessageContent::Data(_));
                let style = if structured {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default()
                };
                for wrapped in wrap_text(&message.content.rendered(), width) {
                    lines.push(Line::from(Span::styled(wrapped, style)));
                }
            }
            MessageSource::System => {
                for wrapped in wrap_text(&message.content.rendered(), width) {
                    lines.push(Line::from(Span::styled(
                        wrapped,
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }
    }

    for call in &message.tool_calls {
        lines.extend(tools.render(call));
    }

    lines.push(Line::default());
    lines
}

#[cfg(test)]
mod tests {
    use palaver_core::chat::{MessageSource, StreamEvent};
    use palaver_core::config::Config;

    use super::*;
    use crate::state::TuiState;

    fn flat(lines: &[Line<'_>]) -> String {
        lines
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn merged_fragments_render_as_one_message() {
        let mut state = TuiState::new(Config::default());
        state
            .transcript
            .store
            .apply(&StreamEvent::content("u1", MessageSource::User, "hello"));
        state
            .transcript
            .store
            .apply(&StreamEvent::content("m1", MessageSource::AiAgent, "Hi"));
        state
            .transcript
            .store
            .apply(&StreamEvent::content("m1", MessageSource::AiAgent, " there"));

        let rendered = flat(&transcript_lines(&state, 80));
        assert!(rendered.contains("❯ hello"));
        assert!(rendered.contains("Hi there"));
    }

    #[test]
    fn cache_refreshes_when_a_message_grows() {
        let mut state = TuiState::new(Config::default());
        state
            .transcript
            .store
            .apply(&StreamEvent::content("m1", MessageSource::AiAgent, "par"));
        let first = flat(&transcript_lines(&state, 80));
        assert!(first.contains("par"));

        state
            .transcript
            .store
            .apply(&StreamEvent::content("m1", MessageSource::AiAgent, "tial"));
        let second = flat(&transcript_lines(&state, 80));
        assert!(second.contains("partial"));
    }

    #[test]
    fn reasoning_renders_before_content() {
        let mut state = TuiState::new(Config::default());
        state.transcript.store.apply(&StreamEvent::reasoning(
            "m1",
            MessageSource::AiAgent,
            "weighing options",
        ));
        state
            .transcript
            .store
            .apply(&StreamEvent::content("m1", MessageSource::AiAgent, "done"));

        let rendered = flat(&transcript_lines(&state, 80));
        let reasoning_pos = rendered.find("weighing options").unwrap();
        let content_pos = rendered.find("done").unwrap();
        assert!(reasoning_pos < content_pos);
    }
}
