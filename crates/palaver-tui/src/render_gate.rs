//! Revision-driven refresh suppression.
//!
//! Instead of deep-comparing messages between frames, every piece of state
//! that can change a frame carries a monotonically increasing counter. The
//! gate snapshots them into a stamp and redraws only when the stamp changed.
//! A stale frame (false negative) is the failure mode that matters, so the
//! stamp errs on the side of including inputs; a spurious redraw only costs
//! one draw call.

use crate::state::AppState;

#[derive(Debug, Clone, PartialEq, Eq)]
struct FrameStamp {
    store_revision: u64,
    input_revision: u64,
    input_cursor: usize,
    sidebar_revision: u64,
    overlay: Option<u64>,
    status_seq: u64,
    stream_active: bool,
    thinking: bool,
    focus_sidebar: bool,
    sidebar_collapsed: bool,
    spinner_frame: usize,
    size: (u16, u16),
}

impl FrameStamp {
    fn capture(app: &AppState, size: (u16, u16)) -> Self {
        let tui = &app.tui;
        Self {
            store_revision: tui.transcript.store.revision(),
            input_revision: tui.input.revision(),
            input_cursor: tui.input.cursor(),
            sidebar_revision: tui.sidebar.revision(),
            overlay: app.overlay.as_ref().map(super::overlays::Overlay::revision),
            status_seq: tui.status_seq,
            stream_active: tui.stream.is_active(),
            thinking: tui.is_thinking(),
            focus_sidebar: tui.focus == crate::state::Focus::Sidebar,
            sidebar_collapsed: tui.sidebar.is_collapsed(),
            spinner_frame: tui.spinner_frame,
            size,
        }
    }
}

/// List-level render gate.
#[derive(Debug, Default)]
pub struct RenderGate {
    last: Option<FrameStamp>,
}

impl RenderGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when the frame must be redrawn. Records the stamp it returns
    /// true for, so the next unchanged frame is skipped.
    pub fn should_render(&mut self, app: &AppState, size: (u16, u16)) -> bool {
        let stamp = FrameStamp::capture(app, size);
        if self.last.as_ref() == Some(&stamp) {
            return false;
        }
        self.last = Some(stamp);
        true
    }
}

#[cfg(test)]
mod tests {
    use palaver_core::chat::{MessageSource, StreamEvent};
    use palaver_core::config::Config;

    use super::*;
    use crate::state::AppState;

    #[test]
    fn unchanged_state_skips_the_redraw() {
        let app = AppState::new(Config::default());
        let mut gate = RenderGate::new();

        assert!(gate.should_render(&app, (80, 24)));
        assert!(!gate.should_render(&app, (80, 24)));
        assert!(!gate.should_render(&app, (80, 24)));
    }

    #[test]
    fn a_merged_fragment_invalidates_the_gate() {
        let mut app = AppState::new(Config::default());
        let mut gate = RenderGate::new();
        assert!(gate.should_render(&app, (80, 24)));

        app.tui
            .transcript
            .store
            .apply(&StreamEvent::content("m1", MessageSource::AiAgent, "x"));
        assert!(gate.should_render(&app, (80, 24)));
        assert!(!gate.should_render(&app, (80, 24)));
    }

    #[test]
    fn input_edits_and_resize_invalidate_the_gate() {
        let mut app = AppState::new(Config::default());
        let mut gate = RenderGate::new();
        assert!(gate.should_render(&app, (80, 24)));

        app.tui.input.insert_char('a');
        assert!(gate.should_render(&app, (80, 24)));

        assert!(gate.should_render(&app, (100, 30)));
    }

    #[test]
    fn notices_invalidate_the_gate() {
        let mut app = AppState::new(Config::default());
        let mut gate = RenderGate::new();
        assert!(gate.should_render(&app, (80, 24)));

        app.tui.set_notice("stream error");
        assert!(gate.should_render(&app, (80, 24)));
    }
}
