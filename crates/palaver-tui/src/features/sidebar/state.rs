//! Sidebar state.

use chrono::Utc;
use nucleo_matcher::pattern::{CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config as MatcherConfig, Matcher, Utf32Str};
use palaver_core::sessions::{Session, group_by_recency};

/// One visual row of the sidebar.
#[derive(Debug, Clone, PartialEq)]
pub enum SidebarRow {
    /// Recency bucket header.
    Header(&'static str),
    Session(Session),
}

/// Sidebar state: the cached session list, its grouped rows, and selection.
pub struct SidebarState {
    sessions: Vec<Session>,
    rows: Vec<SidebarRow>,
    selected: Option<usize>,
    filter: String,
    collapsed: bool,
    loading: bool,
    revision: u64,
}

impl SidebarState {
    pub fn new(collapsed: bool) -> Self {
        Self {
            sessions: Vec::new(),
            rows: Vec::new(),
            selected: None,
            filter: String::new(),
            collapsed,
            loading: false,
            revision: 0,
        }
    }

    pub fn rows(&self) -> &[SidebarRow] {
        &self.rows
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_session(&self) -> Option<&Session> {
        match self.rows.get(self.selected?) {
            Some(SidebarRow::Session(session)) => Some(session),
            _ => None,
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapsed
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Bumped on any visible change; feeds the render gate.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn toggle_collapsed(&mut self) -> bool {
        self.collapsed = !self.collapsed;
        self.revision += 1;
        self.collapsed
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.revision += 1;
    }

    /// Replaces the cached session list and rebuilds the grouped rows.
    pub fn set_sessions(&mut self, sessions: Vec<Session>) {
        self.sessions = sessions;
        self.loading = false;
        self.rebuild();
    }

    pub fn push_filter(&mut self, c: char) {
        self.filter.push(c);
        self.rebuild();
    }

    pub fn pop_filter(&mut self) {
        self.filter.pop();
        self.rebuild();
    }

    pub fn clear_filter(&mut self) {
        if !self.filter.is_empty() {
            self.filter.clear();
            self.rebuild();
        }
    }

    pub fn select_next(&mut self) {
        self.move_selection(1);
    }

    pub fn select_prev(&mut self) {
        self.move_selection(-1);
    }

    fn move_selection(&mut self, step: isize) {
        let session_rows: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter_map(|(idx, row)| matches!(row, SidebarRow::Session(_)).then_some(idx))
            .collect();
        if session_rows.is_empty() {
            self.selected = None;
            return;
        }

        let current = self
            .selected
            .and_then(|sel| session_rows.iter().position(|&idx| idx == sel));
        let next = match current {
            None => 0,
            Some(pos) => {
                let pos = pos as isize + step;
                pos.clamp(0, session_rows.len() as isize - 1) as usize
            }
        };
        self.selected = Some(session_rows[next]);
        self.revision += 1;
    }

    /// Rebuilds rows from the cached sessions: filter, then stable recency
    /// partition, then headers for non-empty buckets.
    fn rebuild(&mut self) {
        let filtered = self.filtered_sessions();
        let grouped = group_by_recency(filtered, Utc::now());

        self.rows.clear();
        for (label, bucket) in grouped.labeled() {
            if bucket.is_empty() {
                continue;
            }
            self.rows.push(SidebarRow::Header(label));
            for session in bucket {
                self.rows.push(SidebarRow::Session(session.clone()));
            }
        }

        // Keep the selection on a session row.
        let still_valid = self
            .selected
            .is_some_and(|sel| matches!(self.rows.get(sel), Some(SidebarRow::Session(_))));
        if !still_valid {
            self.selected = self
                .rows
                .iter()
                .position(|row| matches!(row, SidebarRow::Session(_)));
        }
        self.revision += 1;
    }

    fn filtered_sessions(&self) -> Vec<Session> {
        if self.filter.is_empty() {
            return self.sessions.clone();
        }

        let mut matcher = Matcher::new(MatcherConfig::DEFAULT);
        let pattern = Pattern::parse(&self.filter, CaseMatching::Ignore, Normalization::Smart);
        let mut buf = Vec::new();
        self.sessions
            .iter()
            .filter(|session| {
                let haystack = format!("{} {}", session.display_title(), session.id);
                buf.clear();
                pattern
                    .score(Utf32Str::new(&haystack, &mut buf), &mut matcher)
                    .is_some()
            })
            .cloned()
            .collect()
    }
}
