//! The single long-lived conversation session.

use chrono::{DateTime, Utc};

use super::{
    context::Context,
    message::{Message, Sender},
};

/// Shown as the only message of a fresh or cleared session.
pub const WELCOME_TEXT: &str =
    "Hi, I'm Sidekick. Ask me anything about the screen you're on, or pick a suggestion below.";

/// Observable state of the conversation session. Exactly one instance per
/// run; mutated only through [`crate::usecases::conversation::ConversationStore`]
/// operations on the shell thread.
///
/// Invariant: `is_listening` and `is_speaking` are never both true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    is_open: bool,
    messages: Vec<Message>,
    is_loading: bool,
    context: Context,
    has_unread: bool,
    is_listening: bool,
    is_speaking: bool,
    next_id: u64,
}

impl SessionState {
    /// A fresh session holding only the synthetic welcome message.
    pub fn with_welcome(now: DateTime<Utc>) -> Self {
        let mut state = Self {
            is_open: false,
            messages: Vec::new(),
            is_loading: false,
            context: Context::General,
            has_unread: false,
            is_listening: false,
            is_speaking: false,
            next_id: 1,
        };
        state.append(Sender::Assistant, WELCOME_TEXT, now);
        state
    }

    /// Rehydrates a session from persisted messages. An empty list falls
    /// back to the welcome state.
    pub fn restored(messages: Vec<Message>, now: DateTime<Utc>) -> Self {
        if messages.is_empty() {
            return Self::with_welcome(now);
        }

        let next_id = messages.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        Self {
            is_open: false,
            messages,
            is_loading: false,
            context: Context::General,
            has_unread: false,
            is_listening: false,
            is_speaking: false,
            next_id,
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn context(&self) -> Context {
        self.context
    }

    pub fn has_unread(&self) -> bool {
        self.has_unread
    }

    pub fn is_listening(&self) -> bool {
        self.is_listening
    }

    pub fn is_speaking(&self) -> bool {
        self.is_speaking
    }

    /// True while the list holds nothing beyond the initial welcome message;
    /// such sessions are not worth persisting.
    pub fn only_welcome(&self) -> bool {
        self.messages.len() <= 1
    }

    pub fn last_assistant_message(&self) -> Option<&Message> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.sender == Sender::Assistant)
    }

    pub fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn set_context(&mut self, context: Context) {
        self.context = context;
    }

    pub fn set_unread(&mut self, unread: bool) {
        self.has_unread = unread;
    }

    pub fn set_listening(&mut self, listening: bool) {
        debug_assert!(
            !(listening && self.is_speaking),
            "listening and speaking must be mutually exclusive"
        );
        self.is_listening = listening;
    }

    pub fn set_speaking(&mut self, speaking: bool) {
        debug_assert!(
            !(speaking && self.is_listening),
            "listening and speaking must be mutually exclusive"
        );
        self.is_speaking = speaking;
    }

    /// Appends a new message, allocating the next id. Insertion order is
    /// display order.
    pub fn append(&mut self, sender: Sender, content: &str, now: DateTime<Utc>) -> &Message {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Message::new(id, sender, content, now));
        self.messages.last().expect("push succeeded")
    }

    /// Drops everything and reinstates the single welcome message.
    pub fn reset_to_welcome(&mut self, now: DateTime<Utc>) {
        self.messages.clear();
        self.has_unread = false;
        self.append(Sender::Assistant, WELCOME_TEXT, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, secs).unwrap()
    }

    #[test]
    fn fresh_session_holds_only_the_welcome_message() {
        let state = SessionState::with_welcome(at(0));

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].content, WELCOME_TEXT);
        assert_eq!(state.messages()[0].sender, Sender::Assistant);
        assert!(state.only_welcome());
        assert!(!state.is_open());
        assert!(!state.is_loading());
        assert!(!state.has_unread());
    }

    #[test]
    fn append_allocates_monotonically_increasing_ids() {
        let mut state = SessionState::with_welcome(at(0));
        let first = state.append(Sender::User, "a", at(1)).id;
        let second = state.append(Sender::Assistant, "b", at(2)).id;

        assert!(first < second);
    }

    #[test]
    fn restored_continues_ids_after_the_persisted_maximum() {
        let messages = vec![
            Message::new(4, Sender::User, "question", at(1)),
            Message::new(9, Sender::Assistant, "answer", at(2)),
        ];
        let mut state = SessionState::restored(messages, at(3));

        let appended = state.append(Sender::User, "next", at(4)).id;
        assert_eq!(appended, 10);
    }

    #[test]
    fn restored_with_empty_list_falls_back_to_welcome() {
        let state = SessionState::restored(Vec::new(), at(0));

        assert_eq!(state.messages().len(), 1);
        assert!(state.only_welcome());
    }

    #[test]
    fn reset_to_welcome_discards_history_and_unread() {
        let mut state = SessionState::with_welcome(at(0));
        state.append(Sender::User, "hello", at(1));
        state.set_unread(true);

        state.reset_to_welcome(at(2));

        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.messages()[0].content, WELCOME_TEXT);
        assert!(!state.has_unread());
    }

    #[test]
    fn last_assistant_message_skips_trailing_user_messages() {
        let mut state = SessionState::with_welcome(at(0));
        state.append(Sender::Assistant, "reply", at(1));
        state.append(Sender::User, "follow-up", at(2));

        assert_eq!(state.last_assistant_message().unwrap().content, "reply");
    }

    #[test]
    fn listening_and_speaking_flags_are_independent_when_exclusive() {
        let mut state = SessionState::with_welcome(at(0));

        state.set_listening(true);
        assert!(state.is_listening());
        state.set_listening(false);

        state.set_speaking(true);
        assert!(state.is_speaking());
        assert!(!(state.is_listening() && state.is_speaking()));
    }
}
