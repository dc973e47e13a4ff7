//! The conversation store: the single owner of session state.
//!
//! Every mutation of [`SessionState`] goes through here, on the shell
//! thread. Backend replies and speech events arrive as engine events; the
//! store matches them against request/session/utterance ids and tolerates
//! stale or re-entrant deliveries (a close issued while a send is in flight
//! does not cancel the reply).

use chrono::{DateTime, Duration, Utc};

use crate::{
    domain::{
        context::Context,
        events::{BackendFailure, RecognitionEvent, RecognitionSessionId, UtteranceId},
        message::Sender,
        session_state::SessionState,
    },
    infra::history,
    usecases::{
        contracts::{AssistantRequest, KeyValueStore, ReplyDispatch},
        send_message::{validate_send, SendValidation},
        voice::{VoiceCoordinator, VoiceError},
    },
};

/// Delay between a voice-originated reply landing and it being spoken.
pub const AUTO_SPEAK_DELAY_MS: i64 = 500;

/// What the user sees when the backend fails or rejects a request. The raw
/// error never reaches the conversation.
pub const REPLY_FALLBACK_TEXT: &str =
    "Sorry, I couldn't process that right now. Please try again in a moment.";

pub const VOICE_UNAVAILABLE_TEXT: &str =
    "Voice input isn't available on this device right now. You can still type your question.";

pub const VOICE_RECOGNITION_ERROR_TEXT: &str =
    "I couldn't make that out. Please try speaking again, or type your question.";

const RESTORE_FAILED: &str = "CONVERSATION_RESTORE_FAILED";
const PERSIST_FAILED: &str = "CONVERSATION_PERSIST_FAILED";
const CLEAR_FAILED: &str = "CONVERSATION_CLEAR_FAILED";
const REPLY_WITHOUT_REQUEST: &str = "CONVERSATION_REPLY_WITHOUT_REQUEST";
const BACKEND_REPLY_FAILED: &str = "CONVERSATION_BACKEND_REPLY_FAILED";

/// Result of a send attempt. Rejections are silent no-ops from the user's
/// point of view; tests observe them here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    Accepted,
    RejectedEmpty,
    RejectedDebounced,
}

/// Transcript updates the shell applies to the composer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptUpdate {
    Partial(String),
    Final(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    request_id: u64,
    voice_originated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingSpeak {
    due_at: DateTime<Utc>,
    text: String,
}

pub struct ConversationStore {
    session: SessionState,
    voice: VoiceCoordinator,
    store: Box<dyn KeyValueStore>,
    dispatch: Box<dyn ReplyDispatch>,
    last_accepted_send: Option<DateTime<Utc>>,
    next_request_id: u64,
    in_flight: Vec<InFlight>,
    pending_speak: Option<PendingSpeak>,
}

impl ConversationStore {
    /// Rehydrates the session from the key-value store. Any read or decode
    /// failure falls back to the welcome-only state and is logged, never
    /// raised.
    pub fn restore(
        voice: VoiceCoordinator,
        store: Box<dyn KeyValueStore>,
        dispatch: Box<dyn ReplyDispatch>,
        now: DateTime<Utc>,
    ) -> Self {
        let session = match history::load(store.as_ref()) {
            Ok(Some(messages)) => SessionState::restored(messages, now),
            Ok(None) => SessionState::with_welcome(now),
            Err(error) => {
                tracing::warn!(
                    code = RESTORE_FAILED,
                    error = %error,
                    "conversation restore failed; starting from the welcome state"
                );
                SessionState::with_welcome(now)
            }
        };

        Self {
            session,
            voice,
            store,
            dispatch,
            last_accepted_send: None,
            next_request_id: 1,
            in_flight: Vec::new(),
            pending_speak: None,
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Route-name changes land here; user actions never change the context
    /// directly.
    pub fn set_context(&mut self, context: Context) {
        self.session.set_context(context);
    }

    /// Opens the modal and marks everything read. No-op when already open.
    pub fn open(&mut self) {
        if self.session.is_open() {
            return;
        }
        self.session.set_open(true);
        self.session.set_unread(false);
    }

    /// Closes the modal, stopping whichever voice mode is active.
    /// Idempotent, and safe to call from a reply failure path.
    pub fn close(&mut self) {
        self.session.set_open(false);
        self.pending_speak = None;
        if self.session.is_listening() {
            self.voice.stop_listening();
            self.session.set_listening(false);
        }
        if self.session.is_speaking() {
            self.voice.stop_speaking();
            self.session.set_speaking(false);
        }
    }

    /// Sends a message. Length is capped by the composer before this call;
    /// the store validates emptiness and the debounce window only.
    pub fn send(&mut self, text: &str, voice_originated: bool, now: DateTime<Utc>) -> SendOutcome {
        let text = match validate_send(text, self.last_accepted_send, now) {
            SendValidation::RejectedEmpty => return SendOutcome::RejectedEmpty,
            SendValidation::RejectedDebounced => return SendOutcome::RejectedDebounced,
            SendValidation::Accepted { text } => text,
        };

        self.last_accepted_send = Some(now);
        self.session.append(Sender::User, &text, now);
        self.session.set_loading(true);
        self.session.set_unread(false);
        self.persist();

        let request_id = self.next_request_id;
        self.next_request_id += 1;
        self.in_flight.push(InFlight {
            request_id,
            voice_originated,
        });
        self.dispatch.dispatch(
            request_id,
            AssistantRequest {
                message: text,
                context: self.session.context(),
            },
        );

        SendOutcome::Accepted
    }

    /// Applies a backend completion. Success appends the reply text; any
    /// failure appends the scripted fallback. Either way the loading flag
    /// clears, and a reply landing while the modal is closed raises the
    /// unread flag.
    pub fn on_reply(
        &mut self,
        request_id: u64,
        result: Result<String, BackendFailure>,
        now: DateTime<Utc>,
    ) {
        let Some(position) = self
            .in_flight
            .iter()
            .position(|f| f.request_id == request_id)
        else {
            tracing::debug!(code = REPLY_WITHOUT_REQUEST, request_id, "stale reply dropped");
            return;
        };
        let in_flight = self.in_flight.remove(position);

        let text = match result {
            Ok(text) => text,
            Err(failure) => {
                tracing::warn!(
                    code = BACKEND_REPLY_FAILED,
                    request_id,
                    failure = ?failure,
                    "backend request failed; replying with the fallback text"
                );
                REPLY_FALLBACK_TEXT.to_owned()
            }
        };

        self.session.append(Sender::Assistant, &text, now);
        self.session.set_loading(!self.in_flight.is_empty());
        self.persist();

        if !self.session.is_open() {
            self.session.set_unread(true);
        }

        if in_flight.voice_originated {
            self.pending_speak = Some(PendingSpeak {
                due_at: now + Duration::milliseconds(AUTO_SPEAK_DELAY_MS),
                text,
            });
        }
    }

    /// Replaces the conversation with the welcome message and removes the
    /// persisted copy entirely.
    pub fn clear_chat(&mut self, now: DateTime<Utc>) {
        self.session.reset_to_welcome(now);
        if let Err(error) = self.store.remove(history::CONVERSATION_KEY) {
            tracing::warn!(
                code = CLEAR_FAILED,
                error = %error,
                "failed to remove the persisted conversation"
            );
        }
    }

    /// Starts voice input, stopping speech first if needed. Unavailability
    /// surfaces as an assistant message, never an error.
    pub fn start_voice_input(&mut self, now: DateTime<Utc>) {
        if self.session.is_listening() {
            return;
        }
        if self.session.is_speaking() {
            self.voice.stop_speaking();
            self.session.set_speaking(false);
        }

        match self.voice.start_listening() {
            Ok(_session) => self.session.set_listening(true),
            Err(VoiceError::Unavailable) => {
                self.session.set_listening(false);
                self.session.append(Sender::Assistant, VOICE_UNAVAILABLE_TEXT, now);
                self.persist();
            }
        }
    }

    pub fn stop_voice_input(&mut self) {
        self.voice.stop_listening();
        self.session.set_listening(false);
    }

    /// Applies a recognition event. Events from superseded sessions are
    /// dropped. Partial and final transcripts are returned for the shell to
    /// apply to the composer; sending remains the user's decision.
    pub fn on_recognition_event(
        &mut self,
        session: RecognitionSessionId,
        event: RecognitionEvent,
        now: DateTime<Utc>,
    ) -> Option<TranscriptUpdate> {
        if !self.voice.is_current_session(session) {
            return None;
        }

        match event {
            RecognitionEvent::Partial(text) => Some(TranscriptUpdate::Partial(text)),
            RecognitionEvent::Final(text) => {
                self.voice.end_session(session);
                self.session.set_listening(false);
                Some(TranscriptUpdate::Final(text))
            }
            RecognitionEvent::Error(detail) => {
                tracing::warn!(error = %detail, "speech recognition error");
                self.voice.end_session(session);
                self.session.set_listening(false);
                self.session
                    .append(Sender::Assistant, VOICE_RECOGNITION_ERROR_TEXT, now);
                self.persist();
                None
            }
        }
    }

    /// Clears the speaking flag when the current utterance finishes; stale
    /// utterance ids are ignored.
    pub fn on_synthesis_finished(&mut self, utterance: UtteranceId) {
        if self.voice.finish_utterance(utterance) {
            self.session.set_speaking(false);
        }
    }

    /// Toggles speech of the last assistant reply: speaking stops if already
    /// in progress instead of starting a new utterance.
    pub fn speak_last_reply(&mut self) {
        if self.session.is_speaking() {
            self.voice.stop_speaking();
            self.session.set_speaking(false);
            return;
        }
        if self.session.is_listening() {
            self.voice.stop_listening();
            self.session.set_listening(false);
        }

        let Some(text) = self
            .session
            .last_assistant_message()
            .map(|m| m.content.clone())
        else {
            return;
        };
        if self.voice.speak(&text).is_some() {
            self.session.set_speaking(true);
        }
    }

    /// Processes the auto-speak schedule. A listening session started during
    /// the delay wins over the scheduled speech.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let due = self
            .pending_speak
            .as_ref()
            .is_some_and(|pending| now >= pending.due_at);
        if !due {
            return;
        }

        let Some(pending) = self.pending_speak.take() else {
            return;
        };
        if self.session.is_listening() {
            return;
        }
        if self.voice.speak(&pending.text).is_some() {
            self.session.set_speaking(true);
        }
    }

    /// Saves the trailing window of the conversation. Welcome-only sessions
    /// are not worth a write; save errors are logged and swallowed.
    fn persist(&mut self) {
        if self.session.only_welcome() {
            return;
        }

        let payload = match history::encode(self.session.messages()) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(
                    code = PERSIST_FAILED,
                    error = %error,
                    "failed to encode the conversation"
                );
                return;
            }
        };
        if let Err(error) = self.store.set(history::CONVERSATION_KEY, &payload) {
            tracing::warn!(
                code = PERSIST_FAILED,
                error = %error,
                "failed to persist the conversation"
            );
        }
    }
}
