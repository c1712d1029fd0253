//! Tool-call rendering.
//!
//! Renderers are looked up by tool name in a registry, with a generic
//! fallback for unregistered names, so adding a tool-specific view is one
//! `register` call instead of a new branch at the call site.

use std::collections::HashMap;

use palaver_core::chat::ToolCall;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

/// Renders one tool call into transcript lines.
pub type ToolRenderer = fn(&ToolCall) -> Vec<Line<'static>>;

/// Registry mapping tool names to renderers.
#[derive(Debug)]
pub struct ToolRenderers {
    renderers: HashMap<&'static str, ToolRenderer>,
}

impl Default for ToolRenderers {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ToolRenderers {
    /// Registry with the built-in tool views.
    pub fn builtin() -> Self {
        let mut registry = Self {
            renderers: HashMap::new(),
        };
        registry.register("get_weather", render_weather);
        registry
    }

    pub fn register(&mut self, tool_name: &'static str, renderer: ToolRenderer) {
        self.renderers.insert(tool_name, renderer);
    }

    /// Renders a call with its registered renderer, or the generic fallback.
    pub fn render(&self, call: &ToolCall) -> Vec<Line<'static>> {
        match self.renderers.get(call.tool_name.as_str()) {
            Some(renderer) => renderer(call),
            None => render_generic(call),
        }
    }
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Generic view: the tool name, with its result serialized when present and
/// a pending marker otherwise.
fn render_generic(call: &ToolCall) -> Vec<Line<'static>> {
    let line = match &call.result {
        Some(result) => Line::from(vec![
            Span::styled(format!("⚙ {}", call.tool_name), dim()),
            Span::styled(format!(": {result}"), dim()),
        ]),
        None => Line::from(vec![
            Span::styled(format!("⚙ {}", call.tool_name), dim()),
            Span::styled(" …", dim().add_modifier(Modifier::ITALIC)),
        ]),
    };
    vec![line]
}

/// Weather results get a compact human-readable line.
fn render_weather(call: &ToolCall) -> Vec<Line<'static>> {
    let Some(result) = &call.result else {
        return vec![Line::from(Span::styled("☂ checking the weather …", dim()))];
    };

    let temp = result.get("temp").and_then(serde_json::Value::as_f64);
    let condition = result.get("condition").and_then(serde_json::Value::as_str);
    match (temp, condition) {
        (Some(temp), Some(condition)) => vec![Line::from(Span::styled(
            format!("☂ {temp}°C, {condition}"),
            Style::default().fg(Color::Blue),
        ))],
        (Some(temp), None) => vec![Line::from(Span::styled(
            format!("☂ {temp}°C"),
            Style::default().fg(Color::Blue),
        ))],
        _ => render_generic(call),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn call(name: &str, result: Option<serde_json::Value>) -> ToolCall {
        ToolCall {
            tool_call_id: "t1".to_string(),
            tool_name: name.to_string(),
            result,
        }
    }

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
    fn unregistered_tools_use_the_generic_fallback() {
        let registry = ToolRenderers::builtin();
        let rendered = flat(&registry.render(&call("search_docs", Some(json!({"hits": 3})))));
        assert!(rendered.contains("search_docs"));
        assert!(rendered.contains("hits"));
    }

    #[test]
    fn pending_calls_render_a_placeholder() {
        let registry = ToolRenderers::builtin();
        let rendered = flat(&registry.render(&call("search_docs", None)));
        assert!(rendered.contains('…'));
    }

    #[test]
    fn registered_renderer_wins_over_fallback() {
        let registry = ToolRenderers::builtin();
        let rendered = flat(&registry.render(&call(
            "get_weather",
            Some(json!({"temp": 21.0, "condition": "cloudy"})),
        )));
        assert!(rendered.contains("21"));
        assert!(rendered.contains("cloudy"));
    }

    #[test]
    fn custom_registrations_take_effect() {
        let mut registry = ToolRenderers::builtin();
        registry.register("noop", |_| vec![Line::raw("nothing to see")]);
        let rendered = flat(&registry.render(&call("noop", None)));
        assert_eq!(rendered, "nothing to see");
    }
}
