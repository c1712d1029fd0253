//! Agent picker overlay: choose an agent to start a new session with.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use palaver_core::api::Agent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What a key press in the picker resolved to.
#[derive(Debug)]
pub enum AgentPickerOutcome {
    Stay,
    Close,
    /// Start a new session with the chosen agent.
    Start(Agent),
}

pub struct AgentPickerState {
    agents: Vec<Agent>,
    selected: usize,
    loading: bool,
    error: Option<String>,
    revision: u64,
}

impl AgentPickerState {
    /// Opens the picker in its loading state; the agent catalog arrives via
    /// `set_agents`.
    pub fn open() -> Self {
        Self {
            agents: Vec::new(),
            selected: 0,
            loading: true,
            error: None,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_agents(&mut self, agents: Vec<Agent>) {
        self.agents = agents;
        self.selected = 0;
        self.loading = false;
        self.error = None;
        self.revision += 1;
    }

    pub fn set_error(&mut self, error: String) {
        self.loading = false;
        self.error = Some(error);
        self.revision += 1;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> AgentPickerOutcome {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => AgentPickerOutcome::Close,
            KeyCode::Char('c') if ctrl => AgentPickerOutcome::Close,
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected > 0 {
                    self.selected -= 1;
                    self.revision += 1;
                }
                AgentPickerOutcome::Stay
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected + 1 < self.agents.len() {
                    self.selected += 1;
                    self.revision += 1;
                }
                AgentPickerOutcome::Stay
            }
            KeyCode::Enter => match self.agents.get(self.selected) {
                Some(agent) => AgentPickerOutcome::Start(agent.clone()),
                None => AgentPickerOutcome::Stay,
            },
            _ => AgentPickerOutcome::Stay,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let width = 40.min(area.width.saturating_sub(4));
        let height = (self.agents.len() as u16 + 4).clamp(5, area.height.saturating_sub(2));
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + (area.height.saturating_sub(height)) / 3,
            width,
            height,
        };

        let mut lines: Vec<Line<'static>> = Vec::new();
        if self.loading {
            lines.push(Line::from(Span::styled(
                "loading agents...",
                Style::default().fg(Color::DarkGray),
            )));
        } else if let Some(error) = &self.error {
            lines.push(Line::from(Span::styled(
                format!("failed to load agents: {error}"),
                Style::default().fg(Color::Red),
            )));
        } else if self.agents.is_empty() {
            lines.push(Line::from(Span::styled(
                "no agents available",
                Style::default().fg(Color::DarkGray),
            )));
        } else {
            for (idx, agent) in self.agents.iter().enumerate() {
                let style = if idx == self.selected {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(
                    format!("  {}  ", agent.name),
                    style,
                )));
            }
        }
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            "enter start · esc close",
            Style::default().fg(Color::DarkGray),
        )));

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" new session "),
            ),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn agent(id: &str) -> Agent {
        Agent {
            id: id.to_string(),
            name: id.to_string(),
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn enter_starts_the_selected_agent() {
        let mut picker = AgentPickerState::open();
        picker.set_agents(vec![agent("triage"), agent("concierge")]);

        picker.handle_key(key(KeyCode::Down));
        match picker.handle_key(key(KeyCode::Enter)) {
            AgentPickerOutcome::Start(agent) => assert_eq!(agent.id, "concierge"),
            other => panic!("expected Start, got {other:?}"),
        }
    }

    #[test]
    fn enter_with_no_agents_stays_open() {
        let mut picker = AgentPickerState::open();
        picker.set_agents(Vec::new());
        assert!(matches!(
            picker.handle_key(key(KeyCode::Enter)),
            AgentPickerOutcome::Stay
        ));
    }

    #[test]
    fn selection_is_clamped() {
        let mut picker = AgentPickerState::open();
        picker.set_agents(vec![agent("only")]);
        picker.handle_key(key(KeyCode::Down));
        picker.handle_key(key(KeyCode::Up));
        picker.handle_key(key(KeyCode::Up));
        match picker.handle_key(key(KeyCode::Enter)) {
            AgentPickerOutcome::Start(agent) => assert_eq!(agent.id, "only"),
            other => panic!("expected Start, got {other:?}"),
        }
    }
}
