//! State for the message composition field inside the assistant modal.
//!
//! The composer owns the 1000-character input cap; the conversation store
//! deliberately does not re-validate length (see DESIGN.md).

/// Maximum message length accepted by the assistant backend.
pub const MAX_MESSAGE_LENGTH: usize = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposerState {
    /// The current draft text.
    text: String,
    /// Cursor position as a character index, not a byte index.
    cursor: usize,
    /// Set when the draft came from speech recognition; sending such a draft
    /// triggers auto-speak of the reply.
    voice_originated: bool,
}

impl ComposerState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn is_voice_originated(&self) -> bool {
        self.voice_originated
    }

    /// Inserts a character at the cursor. Returns false once the draft is at
    /// the length cap. Typing into a voice transcript makes it an ordinary
    /// typed draft again.
    pub fn insert_char(&mut self, ch: char) -> bool {
        if self.text.chars().count() >= MAX_MESSAGE_LENGTH {
            return false;
        }
        let byte_idx = self.char_to_byte_index(self.cursor);
        self.text.insert(byte_idx, ch);
        self.cursor += 1;
        self.voice_originated = false;
        true
    }

    /// Deletes the character before the cursor (backspace).
    pub fn delete_char_before(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let start = self.char_to_byte_index(self.cursor);
            let end = self.char_to_byte_index(self.cursor + 1);
            self.text.drain(start..end);
            self.voice_originated = false;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Replaces the draft with text produced by speech recognition, capped at
    /// the message length limit.
    pub fn set_transcript(&mut self, transcript: &str) {
        self.text = transcript.chars().take(MAX_MESSAGE_LENGTH).collect();
        self.cursor = self.text.chars().count();
        self.voice_originated = true;
    }

    /// Replaces the draft with a quick-action text, cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.chars().take(MAX_MESSAGE_LENGTH).collect();
        self.cursor = self.text.chars().count();
        self.voice_originated = false;
    }

    /// Takes the draft for sending, leaving the composer empty.
    pub fn take(&mut self) -> (String, bool) {
        let voice = self.voice_originated;
        self.voice_originated = false;
        self.cursor = 0;
        (std::mem::take(&mut self.text), voice)
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
        self.voice_originated = false;
    }

    fn char_to_byte_index(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.text.len())
    }
}
