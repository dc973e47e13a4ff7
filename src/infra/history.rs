//! Conversation persistence: the JSON wire form of the message list and the
//! file-backed key-value store it is written through.
//!
//! The persisted payload is a JSON array of `{id, type, content, timestamp}`
//! objects, capped at the trailing [`HISTORY_LIMIT`] messages. Ids travel as
//! strings and timestamps as RFC 3339, so the payload stays portable across
//! store implementations.

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    domain::message::{Message, Sender},
    usecases::contracts::KeyValueStore,
};

/// The fixed key the conversation lives under. Removed entirely on clear,
/// never set to an empty value.
pub const CONVERSATION_KEY: &str = "assistant.conversation";

/// Persisted form keeps at most this many messages, oldest dropped first.
/// The in-memory list may exceed it between saves.
pub const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Serialize, Deserialize)]
struct StoredMessage {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    content: String,
    timestamp: String,
}

/// Serializes the trailing window of the message list.
pub fn encode(messages: &[Message]) -> Result<String> {
    let start = messages.len().saturating_sub(HISTORY_LIMIT);
    let stored: Vec<StoredMessage> = messages[start..]
        .iter()
        .map(|message| StoredMessage {
            id: message.id.to_string(),
            kind: message.sender.wire_tag().to_owned(),
            content: message.content.clone(),
            timestamp: message.created_at.to_rfc3339(),
        })
        .collect();

    serde_json::to_string(&stored).context("failed to serialize conversation history")
}

/// Deserializes a persisted payload. Any malformed entry fails the whole
/// decode; callers fall back to the default session state.
pub fn decode(raw: &str) -> Result<Vec<Message>> {
    let stored: Vec<StoredMessage> =
        serde_json::from_str(raw).context("failed to parse conversation history")?;

    stored
        .into_iter()
        .map(|entry| {
            let id: u64 = entry
                .id
                .parse()
                .with_context(|| format!("invalid message id {:?}", entry.id))?;
            let sender = match entry.kind.as_str() {
                "user" => Sender::User,
                "assistant" => Sender::Assistant,
                other => return Err(anyhow!("unknown sender type {other:?}")),
            };
            let created_at: DateTime<Utc> = entry
                .timestamp
                .parse::<DateTime<chrono::FixedOffset>>()
                .with_context(|| format!("invalid timestamp {:?}", entry.timestamp))?
                .with_timezone(&Utc);

            Ok(Message::new(id, sender, entry.content, created_at))
        })
        .collect()
}

/// Loads the persisted conversation, if any.
pub fn load(store: &dyn KeyValueStore) -> Result<Option<Vec<Message>>> {
    match store.get(CONVERSATION_KEY)? {
        Some(raw) => Ok(Some(decode(&raw)?)),
        None => Ok(None),
    }
}

/// Key-value store backed by one JSON file per key inside the app's store
/// directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(raw))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("failed to write {}", path.display()))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn message(id: u64, sender: Sender, content: &str) -> Message {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        Message::new(id, sender, content, at)
    }

    #[test]
    fn round_trips_a_short_conversation() {
        let messages = vec![
            message(1, Sender::Assistant, "welcome"),
            message(2, Sender::User, "hello"),
            message(3, Sender::Assistant, "hi there"),
        ];

        let decoded = decode(&encode(&messages).expect("encode")).expect("decode");

        assert_eq!(decoded, messages);
    }

    #[test]
    fn encode_keeps_only_the_trailing_window() {
        let messages: Vec<Message> = (1..=(HISTORY_LIMIT as u64 + 20))
            .map(|i| message(i, Sender::User, &format!("m{i}")))
            .collect();

        let decoded = decode(&encode(&messages).expect("encode")).expect("decode");

        assert_eq!(decoded.len(), HISTORY_LIMIT);
        // Oldest entries were dropped first.
        assert_eq!(decoded[0].id, 21);
        assert_eq!(decoded.last().unwrap().id, HISTORY_LIMIT as u64 + 20);
    }

    #[test]
    fn wire_form_uses_the_documented_field_names() {
        let payload = encode(&[message(1, Sender::User, "hello")]).expect("encode");

        assert!(payload.contains("\"id\":\"1\""));
        assert!(payload.contains("\"type\":\"user\""));
        assert!(payload.contains("\"content\":\"hello\""));
        assert!(payload.contains("\"timestamp\""));
    }

    #[test]
    fn decode_rejects_malformed_json() {
        assert!(decode("{oops").is_err());
    }

    #[test]
    fn decode_rejects_unknown_sender_types() {
        let raw = r#"[{"id":"1","type":"robot","content":"x","timestamp":"2024-05-01T12:00:00+00:00"}]"#;
        assert!(decode(raw).is_err());
    }

    #[test]
    fn decode_rejects_non_numeric_ids() {
        let raw = r#"[{"id":"abc","type":"user","content":"x","timestamp":"2024-05-01T12:00:00+00:00"}]"#;
        assert!(decode(raw).is_err());
    }

    #[test]
    fn file_store_round_trips_and_removes_keys() {
        let temp = tempfile::tempdir().expect("temp dir should be creatable");
        let mut store = FileKeyValueStore::new(temp.path().to_path_buf());

        assert_eq!(store.get("missing").expect("get"), None);

        store.set("conversation", "[1,2,3]").expect("set");
        assert_eq!(
            store.get("conversation").expect("get"),
            Some("[1,2,3]".to_owned())
        );

        store.remove("conversation").expect("remove");
        assert_eq!(store.get("conversation").expect("get"), None);

        // Removing an absent key stays quiet.
        store.remove("conversation").expect("second remove");
    }

    #[test]
    fn load_returns_none_when_nothing_was_persisted() {
        let temp = tempfile::tempdir().expect("temp dir should be creatable");
        let store = FileKeyValueStore::new(temp.path().to_path_buf());

        assert_eq!(load(&store).expect("load"), None);
    }
}
