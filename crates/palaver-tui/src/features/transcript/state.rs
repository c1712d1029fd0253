//! Transcript state: message store, scroll, wrap cache.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use palaver_core::chat::MessageStore;
use ratatui::text::Line;

use super::tools::ToolRenderers;

/// Scroll behavior for the transcript viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollMode {
    /// Stick to the newest content.
    #[default]
    FollowLatest,
    /// Pinned at a fixed line offset from the top.
    Anchored { offset: usize },
}

/// Transcript display state.
pub struct TranscriptState {
    /// The message store: single source of truth for rendered messages.
    pub store: MessageStore,
    /// Scroll mode.
    pub scroll: ScrollMode,
    /// Tool renderer registry.
    pub tools: ToolRenderers,
    /// (total lines, viewport height) captured at render time; scroll key
    /// handling needs both and must not recompute layout.
    viewport: Cell<(usize, usize)>,
    /// Wrapped lines per message id, keyed by (revision, width). A message
    /// is re-wrapped only when it changed or the width did.
    wrap_cache: RefCell<HashMap<String, CachedLines>>,
}

pub(super) struct CachedLines {
    pub revision: u64,
    pub width: u16,
    pub lines: Vec<Line<'static>>,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            store: MessageStore::new(),
            scroll: ScrollMode::default(),
            tools: ToolRenderers::builtin(),
            viewport: Cell::new((0, 0)),
            wrap_cache: RefCell::new(HashMap::new()),
        }
    }

    /// Clears everything for session teardown.
    pub fn reset(&mut self) {
        self.store.reset();
        self.scroll = ScrollMode::FollowLatest;
        self.viewport.set((0, 0));
        self.wrap_cache.borrow_mut().clear();
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = ScrollMode::FollowLatest;
    }

    pub fn scroll_up(&mut self, lines: usize) {
        let (total, height) = self.viewport.get();
        let current = self.offset(total, height);
        self.scroll = ScrollMode::Anchored {
            offset: current.saturating_sub(lines),
        };
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let (total, height) = self.viewport.get();
        let max = total.saturating_sub(height);
        let next = self.offset(total, height) + lines;
        if next >= max {
            self.scroll = ScrollMode::FollowLatest;
        } else {
            self.scroll = ScrollMode::Anchored { offset: next };
        }
    }

    /// First visible line for the given layout.
    pub fn offset(&self, total: usize, height: usize) -> usize {
        let max = total.saturating_sub(height);
        match self.scroll {
            ScrollMode::FollowLatest => max,
            ScrollMode::Anchored { offset } => offset.min(max),
        }
    }

    /// Viewport height captured at the last render.
    pub fn page_size(&self) -> usize {
        self.viewport.get().1.max(1)
    }

    pub(crate) fn record_viewport(&self, total: usize, height: usize) {
        self.viewport.set((total, height));
    }

    pub(super) fn with_cache<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, CachedLines>) -> R,
    ) -> R {
        f(&mut self.wrap_cache.borrow_mut())
    }
}
