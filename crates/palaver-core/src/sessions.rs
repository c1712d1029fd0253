//! Session metadata and sidebar grouping.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// A session as listed by the backend. The client holds a read-only cached
/// copy for sidebar listing and opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub agent_id: String,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Title for display, falling back to the id for untitled sessions.
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => &self.id,
        }
    }
}

/// Recency buckets for the sidebar. Disjoint and total over the input list.
#[derive(Debug, Default, PartialEq)]
pub struct GroupedSessions {
    pub today: Vec<Session>,
    pub yesterday: Vec<Session>,
    pub last_week: Vec<Session>,
    pub last_month: Vec<Session>,
    pub older: Vec<Session>,
}

impl GroupedSessions {
    pub fn len(&self) -> usize {
        self.today.len()
            + self.yesterday.len()
            + self.last_week.len()
            + self.last_month.len()
            + self.older.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Buckets paired with their sidebar headers, in display order.
    pub fn labeled(&self) -> [(&'static str, &[Session]); 5] {
        [
            ("Today", self.today.as_slice()),
            ("Yesterday", self.yesterday.as_slice()),
            ("Last 7 days", self.last_week.as_slice()),
            ("Last 30 days", self.last_month.as_slice()),
            ("Older", self.older.as_slice()),
        ]
    }
}

/// Partitions sessions into recency buckets relative to `now`.
///
/// Pure function of its inputs: calendar-day buckets compare UTC dates, the
/// 7/30-day windows compare instants. Within each bucket input order is
/// preserved. Evaluated per session in priority order, so a session exactly
/// 8 days old lands in `last_month` (the 7-day window is exclusive).
pub fn group_by_recency(sessions: Vec<Session>, now: DateTime<Utc>) -> GroupedSessions {
    let week_ago = now - TimeDelta::days(7);
    let month_ago = now - TimeDelta::days(30);
    let today = now.date_naive();
    let yesterday = today.pred_opt();

    let mut groups = GroupedSessions::default();
    for session in sessions {
        let day = session.created_at.date_naive();
        if day == today {
            groups.today.push(session);
        } else if Some(day) == yesterday {
            groups.yesterday.push(session);
        } else if session.created_at > week_ago {
            groups.last_week.push(session);
        } else if session.created_at > month_ago {
            groups.last_month.push(session);
        } else {
            groups.older.push(session);
        }
    }
    groups
}

/// Maximum length of a derived session title, in characters.
pub const MAX_TITLE_CHARS: usize = 15;

/// Derives a session title from the first user message.
///
/// Takes the longest word-boundary-safe prefix that fits in
/// `MAX_TITLE_CHARS`; words are never split or truncated.
pub fn derive_title(input: &str) -> String {
    let mut title = String::new();
    let mut title_chars = 0usize;
    for word in input.split_whitespace() {
        let word_chars = word.chars().count();
        let sep = usize::from(!title.is_empty());
        if title_chars + sep + word_chars > MAX_TITLE_CHARS {
            break;
        }
        if sep == 1 {
            title.push(' ');
        }
        title.push_str(word);
        title_chars += sep + word_chars;
    }
    title
}
