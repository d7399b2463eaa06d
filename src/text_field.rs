use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Single-line editable buffer. The cursor counts characters, not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    buffer: String,
    cursor: usize,
}

impl TextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    pub fn trimmed(&self) -> &str {
        self.buffer.trim()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn byte_offset(&self, cursor: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.buffer.len())
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.buffer.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let at = self.byte_offset(self.cursor - 1);
            self.buffer.remove(at);
            self.cursor -= 1;
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.buffer.remove(at);
        }
    }

    /// Applies an editing key. Returns false when the key is not an edit, so
    /// callers can route it elsewhere.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                self.insert(c);
                true
            }
            KeyCode::Backspace => {
                self.backspace();
                true
            }
            KeyCode::Delete => {
                self.delete();
                true
            }
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                true
            }
            KeyCode::Right => {
                if self.cursor < self.buffer.chars().count() {
                    self.cursor += 1;
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.buffer.chars().count();
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut field = TextField::new();
        for c in "Hello".chars() {
            field.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(field.text(), "Hello");
        assert_eq!(field.cursor(), 5);

        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.text(), "Hell");
        assert_eq!(field.cursor(), 4);
    }

    #[test]
    fn test_insert_in_middle() {
        let mut field = TextField::with_text("Hllo");
        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Right));
        field.handle_key(key(KeyCode::Char('e')));
        assert_eq!(field.text(), "Hello");
        assert_eq!(field.cursor(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut field = TextField::with_text("a");
        field.handle_key(key(KeyCode::Home));
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.text(), "a");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut field = TextField::with_text("café");
        field.handle_key(key(KeyCode::Backspace));
        assert_eq!(field.text(), "caf");
        field.handle_key(key(KeyCode::Char('é')));
        field.handle_key(key(KeyCode::Left));
        field.handle_key(key(KeyCode::Delete));
        assert_eq!(field.text(), "caf");
    }

    #[test]
    fn test_control_chars_are_not_edits() {
        let mut field = TextField::new();
        let handled = field.handle_key(KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL));
        assert!(!handled);
        assert!(field.is_empty());
        assert!(!field.handle_key(key(KeyCode::Enter)));
    }

    #[test]
    fn test_trimmed() {
        let field = TextField::with_text("  Paris ");
        assert_eq!(field.trimmed(), "Paris");
    }
}
