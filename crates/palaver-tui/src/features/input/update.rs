//! Input key handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::InputState;

/// What a key press did to the input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKeyResult {
    /// Key not handled here.
    Ignored,
    /// Buffer content changed; the draft mirror must run.
    Edited,
    /// Cursor moved without changing content.
    Moved,
    /// The user asked to submit the current text.
    Submit,
}

/// Handles a key aimed at the input buffer.
pub fn handle_key(input: &mut InputState, key: KeyEvent) -> InputKeyResult {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Enter => InputKeyResult::Submit,
        KeyCode::Backspace if alt => {
            input.delete_word_back();
            InputKeyResult::Edited
        }
        KeyCode::Backspace => {
            input.backspace();
            InputKeyResult::Edited
        }
        KeyCode::Delete => {
            input.delete();
            InputKeyResult::Edited
        }
        KeyCode::Left => {
            input.move_left();
            InputKeyResult::Moved
        }
        KeyCode::Right => {
            input.move_right();
            InputKeyResult::Moved
        }
        KeyCode::Home => {
            input.move_home();
            InputKeyResult::Moved
        }
        KeyCode::End => {
            input.move_end();
            InputKeyResult::Moved
        }
        KeyCode::Char('a') if ctrl => {
            input.move_home();
            InputKeyResult::Moved
        }
        KeyCode::Char('e') if ctrl => {
            input.move_end();
            InputKeyResult::Moved
        }
        KeyCode::Char('u') if ctrl => {
            input.clear();
            InputKeyResult::Edited
        }
        KeyCode::Char('w') if ctrl => {
            input.delete_word_back();
            InputKeyResult::Edited
        }
        KeyCode::Char(c) if !ctrl && !alt => {
            input.insert_char(c);
            InputKeyResult::Edited
        }
        _ => InputKeyResult::Ignored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn typing_edits_and_enter_submits() {
        let mut input = InputState::new();
        assert_eq!(handle_key(&mut input, key(KeyCode::Char('h'))), InputKeyResult::Edited);
        assert_eq!(handle_key(&mut input, key(KeyCode::Char('i'))), InputKeyResult::Edited);
        assert_eq!(input.text(), "hi");
        assert_eq!(handle_key(&mut input, key(KeyCode::Enter)), InputKeyResult::Submit);
        assert_eq!(input.text(), "hi");
    }

    #[test]
    fn ctrl_u_clears_the_line() {
        let mut input = InputState::new();
        input.set_text("draft text");
        assert_eq!(handle_key(&mut input, ctrl('u')), InputKeyResult::Edited);
        assert!(input.is_empty());
    }

    #[test]
    fn ctrl_chars_do_not_self_insert() {
        let mut input = InputState::new();
        assert_eq!(handle_key(&mut input, ctrl('x')), InputKeyResult::Ignored);
        assert!(input.is_empty());
    }
}
