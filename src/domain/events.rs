//! Events consumed by the shell loop: terminal input plus completions from
//! the engine's background tasks.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Tick,
    QuitRequested,
    Key(KeyInput),
    Pointer(PointerEvent),
    Resized { width: u16, height: u16 },
    Engine(EngineEvent),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
}

impl KeyInput {
    pub fn new(key: impl Into<String>, ctrl: bool) -> Self {
        Self {
            key: key.into(),
            ctrl,
        }
    }
}

/// A pointer gesture sample in screen cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { x: u16, y: u16 },
    Move { x: u16, y: u16 },
    Up { x: u16, y: u16 },
}

/// Completions delivered from background tasks over the engine channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ReplyArrived {
        request_id: u64,
        result: Result<String, BackendFailure>,
    },
    Recognition {
        session: RecognitionSessionId,
        event: RecognitionEvent,
    },
    SynthesisFinished {
        utterance: UtteranceId,
    },
}

/// Why a backend request produced no reply text. The raw detail is for logs
/// only; users always see a scripted fallback string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendFailure {
    Unavailable,
    Rejected { detail: String },
}

/// Identifies one recognition session; events from superseded sessions are
/// discarded by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecognitionSessionId(pub u64);

/// Identifies one synthesis utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UtteranceId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognitionEvent {
    Partial(String),
    Final(String),
    Error(String),
}
