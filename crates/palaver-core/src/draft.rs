//! Draft persistence.
//!
//! One durable slot per session id, mirrored on every text change and
//! cleared on successful submission. Drafts survive process restarts so an
//! unintended exit never loses composed text.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::paths;

/// Durable storage for unsent input text, keyed by session id.
#[derive(Debug, Clone)]
pub struct DraftStore {
    dir: PathBuf,
}

impl DraftStore {
    /// Opens the default store under the palaver home.
    ///
    /// Discards the legacy unscoped slot from older layouts; a draft that
    /// cannot be attributed to a session is not worth restoring into the
    /// wrong one.
    pub fn open_default() -> Self {
        let home = paths::palaver_home();
        let legacy = home.join("draft.txt");
        if legacy.exists() {
            let _ = fs::remove_file(&legacy);
        }
        Self::new(paths::drafts_dir())
    }

    /// Opens a store rooted at a specific directory.
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the stored draft for a session, if any.
    pub fn load(&self, session_id: &str) -> Option<String> {
        let text = fs::read_to_string(self.path_for(session_id)).ok()?;
        (!text.is_empty()).then_some(text)
    }

    /// Mirrors the current input text to storage. An empty value clears the
    /// slot instead of persisting an empty file.
    pub fn save(&self, session_id: &str, text: &str) -> Result<()> {
        if text.is_empty() {
            return self.clear(session_id);
        }
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create drafts dir {}", self.dir.display()))?;
        let path = self.path_for(session_id);
        fs::write(&path, text).with_context(|| format!("Failed to write draft {}", path.display()))
    }

    /// Removes the stored draft for a session.
    pub fn clear(&self, session_id: &str) -> Result<()> {
        let path = self.path_for(session_id);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => {
                Err(err).with_context(|| format!("Failed to remove draft {}", path.display()))
            }
        }
    }

    /// Reconciles a live input value with the stored draft.
    ///
    /// The live value wins when both exist; the stored draft only fills an
    /// empty control.
    pub fn reconcile(&self, session_id: &str, live: &str) -> String {
        if !live.trim().is_empty() {
            return live.to_string();
        }
        self.load(session_id).unwrap_or_default()
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        // Session ids are server-issued or locally generated UUIDs, but keep
        // the filename safe regardless.
        let safe: String = session_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{safe}.draft"))
    }
}
