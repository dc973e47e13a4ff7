use chrono::{DateTime, Utc};

/// Who authored a message in the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    /// Returns the display label shown next to the message.
    pub fn display_label(&self) -> &'static str {
        match self {
            Sender::User => "You",
            Sender::Assistant => "Sidekick",
        }
    }

    /// Returns the tag used in the persisted form.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

/// A single conversation entry. Immutable once created; removed only by a
/// full-session clear.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Unique, monotonically increasing by creation time.
    pub id: u64,
    pub sender: Sender,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(
        id: u64,
        sender: Sender,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            sender,
            content: content.into(),
            created_at,
        }
    }
}
