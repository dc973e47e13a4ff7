//! Seam traits for everything the engine consumes from the outside world.

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::domain::{
    context::Context,
    events::{AppEvent, BackendFailure, RecognitionSessionId, UtteranceId},
};

/// Source of shell events; the production implementation polls the terminal,
/// tests feed a queue.
pub trait AppEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>>;
}

/// Wall-clock seam so debounce and animation timing are testable.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// The host platform's persistent key-value store. Keys map to small JSON
/// documents; `remove` is distinct from writing an empty value.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// One request to the assistant backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantRequest {
    pub message: String,
    pub context: Context,
}

/// The assistant backend strategy. The shipped implementation is a stub;
/// a live variant slots in at composition time.
pub trait ResponderBackend: Send + Sync {
    fn respond(&self, request: &AssistantRequest) -> Result<String, BackendFailure>;
}

/// Hands a request to the background dispatcher; the completion comes back
/// as an engine event tagged with `request_id`.
pub trait ReplyDispatch {
    fn dispatch(&mut self, request_id: u64, request: AssistantRequest);
}

/// Platform speech recognition, consumed through a narrow start/stop
/// surface. Partial/final/error results arrive on the engine channel tagged
/// with the session id.
pub trait SpeechRecognizer {
    fn is_available(&self) -> bool;
    fn start(&mut self, session: RecognitionSessionId, locale: &str) -> Result<()>;
    fn stop(&mut self);
}

/// Synthesis voice parameters, sourced from config.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechParams {
    pub locale: String,
    pub pitch: f32,
    pub rate: f32,
}

/// Platform speech synthesis. A finished event arrives on the engine channel
/// when the utterance completes or is stopped.
pub trait SpeechSynthesizer {
    fn speak(&mut self, utterance: UtteranceId, text: &str, params: &SpeechParams) -> Result<()>;
    fn stop(&mut self);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticStrength {
    Light,
    Medium,
}

/// Haptic feedback; a no-op on platforms without it.
pub trait Haptics {
    fn pulse(&mut self, strength: HapticStrength);
}
