//! Single-line text input used by the composer and the search field.

/// Upper bound on composer text, in characters.
pub const MAX_INPUT_CHARS: usize = 2_000;

/// Editable line with a character-based cursor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TextInputState {
    text: String,
    cursor: usize,
}

impl TextInputState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Inserts at the cursor. Returns false once the input is full.
    pub fn insert(&mut self, ch: char) -> bool {
        if self.char_len() >= MAX_INPUT_CHARS {
            return false;
        }

        let at = self.byte_offset(self.cursor);
        self.text.insert(at, ch);
        self.cursor += 1;
        true
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }

        self.cursor -= 1;
        self.remove_at_cursor();
    }

    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            self.remove_at_cursor();
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.char_len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Empties the input and hands back what it held.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_at_cursor(&mut self) {
        let start = self.byte_offset(self.cursor);
        let end = self.byte_offset(self.cursor + 1);
        self.text.replace_range(start..end, "");
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.text.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> TextInputState {
        let mut state = TextInputState::default();
        for ch in text.chars() {
            state.insert(ch);
        }
        state
    }

    #[test]
    fn typing_appends_and_advances_cursor() {
        let state = typed("hẹn 3h");

        assert_eq!(state.text(), "hẹn 3h");
        assert_eq!(state.cursor(), 6);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut state = typed("ac");
        state.move_left();
        state.insert('b');

        assert_eq!(state.text(), "abc");
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn backspace_and_delete_handle_multibyte_text() {
        let mut state = typed("chào");
        state.backspace();
        assert_eq!(state.text(), "chà");

        state.move_home();
        state.delete();
        assert_eq!(state.text(), "hà");
        assert_eq!(state.cursor(), 0);

        state.backspace();
        assert_eq!(state.text(), "hà");
    }

    #[test]
    fn cursor_is_clamped() {
        let mut state = typed("ab");
        state.move_right();
        assert_eq!(state.cursor(), 2);

        state.move_home();
        state.move_left();
        assert_eq!(state.cursor(), 0);

        state.move_end();
        assert_eq!(state.cursor(), 2);
    }

    #[test]
    fn take_returns_text_and_empties_input() {
        let mut state = typed("hello");

        assert_eq!(state.take(), "hello");
        assert!(state.is_empty());
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn insert_stops_at_limit() {
        let mut state = TextInputState::default();
        for _ in 0..MAX_INPUT_CHARS {
            assert!(state.insert('x'));
        }

        assert!(!state.insert('y'));
        assert_eq!(state.text().chars().count(), MAX_INPUT_CHARS);
    }
}
