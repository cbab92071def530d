//! Chat input field state.
//!
//! [`InputState`] holds the text being composed, a character-indexed cursor,
//! submitted-message history, and whether the field has focus.

/// State of the chat input field.
#[derive(Debug, Clone)]
pub struct InputState {
    content: String,
    /// Cursor position (character index).
    cursor: usize,
    focused: bool,
    history: Vec<String>,
    /// Position while walking history (`None` = editing the live draft).
    history_index: Option<usize>,
    /// Live draft saved while walking history.
    saved_input: String,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            content: String::new(),
            cursor: 0,
            focused: true,
            history: Vec::new(),
            history_index: None,
            saved_input: String::new(),
        }
    }
}

impl InputState {
    /// Create an empty, focused input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in characters.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the content is empty.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Whether the field has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether Up/Down are currently walking history.
    pub fn is_browsing_history(&self) -> bool {
        self.history_index.is_some()
    }

    /// Give or remove focus.
    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    /// Clear the content.
    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    /// Replace the content, placing the cursor at the end.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.cursor = self.char_len();
    }

    fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.content
            .char_indices()
            .nth(char_index)
            .map_or(self.content.len(), |(i, _)| i)
    }

    /// Insert a character at the cursor.
    pub fn insert(&mut self, ch: char) {
        let at = self.byte_offset(self.cursor);
        self.content.insert(at, ch);
        self.cursor += 1;
    }

    /// Insert a string at the cursor.
    pub fn insert_str(&mut self, s: &str) {
        let at = self.byte_offset(self.cursor);
        self.content.insert_str(at, s);
        self.cursor += s.chars().count();
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Delete the character at the cursor.
    pub fn delete(&mut self) {
        if self.cursor < self.char_len() {
            let at = self.byte_offset(self.cursor);
            self.content.remove(at);
        }
    }

    /// Move cursor left.
    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Move cursor right.
    pub fn move_right(&mut self) {
        if self.cursor < self.char_len() {
            self.cursor += 1;
        }
    }

    /// Move cursor to start.
    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    /// Move cursor to end.
    pub fn move_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Take the content, recording it in history, and clear the field.
    pub fn submit(&mut self) -> String {
        let content = std::mem::take(&mut self.content);
        self.cursor = 0;
        if !content.trim().is_empty() {
            self.history.push(content.clone());
        }
        self.history_index = None;
        self.saved_input.clear();
        content
    }

    /// Show the previous history entry.
    pub fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }

        let next = match self.history_index {
            None => {
                self.saved_input = self.content.clone();
                0
            }
            Some(i) if i + 1 < self.history.len() => i + 1,
            Some(_) => return,
        };

        self.history_index = Some(next);
        let entry = self.history[self.history.len() - 1 - next].clone();
        self.set_content(entry);
    }

    /// Show the next history entry, or the saved draft past the newest.
    pub fn history_next(&mut self) {
        match self.history_index {
            None => {}
            Some(0) => {
                self.history_index = None;
                let saved = std::mem::take(&mut self.saved_input);
                self.set_content(saved);
            }
            Some(i) => {
                self.history_index = Some(i - 1);
                let entry = self.history[self.history.len() - i].clone();
                self.set_content(entry);
            }
        }
    }
}
