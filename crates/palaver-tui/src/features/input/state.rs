//! Input buffer state.
//!
//! A single editable line with a grapheme-addressed cursor. The revision
//! counter feeds the render gate; draft mirroring hangs off every edit in
//! the reducer.

use unicode_segmentation::UnicodeSegmentation;

pub struct InputState {
    text: String,
    /// Byte offset of the cursor; always on a grapheme boundary.
    cursor: usize,
    revision: u64,
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

impl InputState {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            cursor: 0,
            revision: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Byte offset of the cursor within the text.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Bumped on every edit; feeds the render gate.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
        self.revision += 1;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn insert_char(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
        self.revision += 1;
    }

    pub fn insert_str(&mut self, s: &str) {
        self.text.insert_str(self.cursor, s);
        self.cursor += s.len();
        self.revision += 1;
    }

    /// Deletes the grapheme before the cursor.
    pub fn backspace(&mut self) {
        let start = self.prev_boundary();
        if start < self.cursor {
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
            self.revision += 1;
        }
    }

    /// Deletes the grapheme after the cursor.
    pub fn delete(&mut self) {
        let end = self.next_boundary();
        if end > self.cursor {
            self.text.replace_range(self.cursor..end, "");
            self.revision += 1;
        }
    }

    /// Deletes the word before the cursor (plus trailing whitespace).
    pub fn delete_word_back(&mut self) {
        let head = &self.text[..self.cursor];
        let trimmed = head.trim_end();
        let start = trimmed
            .rfind(char::is_whitespace)
            .map_or(0, |pos| pos + 1);
        if start < self.cursor {
            self.text.replace_range(start..self.cursor, "");
            self.cursor = start;
            self.revision += 1;
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn move_right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.text[..self.cursor]
            .grapheme_indices(true)
            .last()
            .map_or(0, |(pos, _)| pos)
    }

    fn next_boundary(&self) -> usize {
        self.text[self.cursor..]
            .graphemes(true)
            .next()
            .map_or(self.text.len(), |g| self.cursor + g.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_backspace_are_grapheme_aware() {
        let mut input = InputState::new();
        input.insert_str("hi 👋🏽");
        assert_eq!(input.text(), "hi 👋🏽");

        input.backspace();
        assert_eq!(input.text(), "hi ");

        input.backspace();
        input.backspace();
        input.backspace();
        assert_eq!(input.text(), "");
        input.backspace();
        assert_eq!(input.text(), "");
    }

    #[test]
    fn cursor_moves_stay_on_boundaries() {
        let mut input = InputState::new();
        input.insert_str("aé");
        input.move_left();
        input.insert_char('x');
        assert_eq!(input.text(), "axé");

        input.move_home();
        input.delete();
        assert_eq!(input.text(), "xé");
    }

    #[test]
    fn delete_word_back_eats_trailing_spaces() {
        let mut input = InputState::new();
        input.insert_str("one two  ");
        input.delete_word_back();
        assert_eq!(input.text(), "one ");
        input.delete_word_back();
        assert_eq!(input.text(), "");
    }

    #[test]
    fn edits_bump_the_revision() {
        let mut input = InputState::new();
        let r0 = input.revision();
        input.insert_char('a');
        assert!(input.revision() > r0);

        let r1 = input.revision();
        input.move_left();
        // Cursor moves are tracked by the frame stamp, not the revision.
        assert_eq!(input.revision(), r1);
    }
}
