//! Display-width-aware line wrapping.

use unicode_width::UnicodeWidthStr;

/// Wraps text to `width` display columns, breaking on whitespace where
/// possible and splitting words only when a single word exceeds the width.
/// Embedded newlines are respected. Always returns at least one line.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }

    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        if raw_line.is_empty() {
            lines.push(String::new());
            continue;
        }

        let mut current = String::new();
        let mut current_width = 0usize;
        for word in raw_line.split(' ') {
            let word_width = word.width();
            let sep = usize::from(!current.is_empty());

            if current_width + sep + word_width <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_width += sep + word_width;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_width = 0;
            }

            if word_width <= width {
                current.push_str(word);
                current_width = word_width;
            } else {
                // A single word longer than the line: hard-split it.
                let mut chunk = String::new();
                let mut chunk_width = 0usize;
                for c in word.chars() {
                    let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
                    if chunk_width + w > width && !chunk.is_empty() {
                        lines.push(std::mem::take(&mut chunk));
                        chunk_width = 0;
                    }
                    chunk.push(c);
                    chunk_width += w;
                }
                current = chunk;
                current_width = chunk_width;
            }
        }
        lines.push(current);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn short_text_is_one_line() {
        assert_eq!(wrap_text("hi", 10), vec!["hi"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn long_words_are_hard_split() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn newlines_are_preserved() {
        let lines = wrap_text("one\n\ntwo", 10);
        assert_eq!(lines, vec!["one", "", "two"]);
    }

    #[test]
    fn wide_characters_count_double() {
        let lines = wrap_text("你好 世界", 4);
        assert_eq!(lines, vec!["你好", "世界"]);
    }
}
