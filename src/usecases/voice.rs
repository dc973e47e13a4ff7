//! Coordinates platform speech recognition and synthesis.
//!
//! The coordinator is an explicitly constructed component owned by the
//! session root (never a process-wide singleton) so tests can substitute a
//! fake platform backend. It tags every recognition session and utterance
//! with a fresh id; events carrying a superseded id are discarded, which
//! keeps a late callback from an old session out of a new one.
//!
//! Mutual exclusion between listening and speaking is the caller's job (the
//! conversation store stops one mode before starting the other); the
//! coordinator itself never auto-stops the opposite mode.

use thiserror::Error;

use crate::domain::events::{RecognitionSessionId, UtteranceId};

use super::contracts::{SpeechParams, SpeechRecognizer, SpeechSynthesizer};

const SYNTHESIS_START_FAILED: &str = "VOICE_SYNTHESIS_START_FAILED";
const RECOGNITION_START_FAILED: &str = "VOICE_RECOGNITION_START_FAILED";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VoiceError {
    #[error("speech recognition is not available on this device")]
    Unavailable,
}

pub struct VoiceCoordinator {
    recognizer: Box<dyn SpeechRecognizer>,
    synthesizer: Box<dyn SpeechSynthesizer>,
    params: SpeechParams,
    /// Capability detected once at construction.
    recognition_available: bool,
    current_session: Option<RecognitionSessionId>,
    current_utterance: Option<UtteranceId>,
    next_id: u64,
}

impl VoiceCoordinator {
    pub fn new(
        recognizer: Box<dyn SpeechRecognizer>,
        synthesizer: Box<dyn SpeechSynthesizer>,
        params: SpeechParams,
    ) -> Self {
        let recognition_available = recognizer.is_available();
        Self {
            recognizer,
            synthesizer,
            params,
            recognition_available,
            current_session: None,
            current_utterance: None,
            next_id: 1,
        }
    }

    /// Starts synthesis of `text`, cancelling any in-progress utterance
    /// first. Failures degrade silently: the error is logged and `None` is
    /// returned so the caller never flips into a speaking state that will
    /// not finish.
    pub fn speak(&mut self, text: &str) -> Option<UtteranceId> {
        if self.current_utterance.take().is_some() {
            self.synthesizer.stop();
        }

        let utterance = UtteranceId(self.next_id);
        self.next_id += 1;

        match self.synthesizer.speak(utterance, text, &self.params) {
            Ok(()) => {
                self.current_utterance = Some(utterance);
                Some(utterance)
            }
            Err(error) => {
                tracing::warn!(
                    code = SYNTHESIS_START_FAILED,
                    error = %error,
                    "speech synthesis failed to start; continuing silently"
                );
                None
            }
        }
    }

    /// Idempotent; safe to call when nothing is being spoken.
    pub fn stop_speaking(&mut self) {
        if self.current_utterance.take().is_some() {
            self.synthesizer.stop();
        }
    }

    /// Starts a recognition session. Fails fast when the capability was
    /// absent at construction or the device reports it unavailable now.
    pub fn start_listening(&mut self) -> Result<RecognitionSessionId, VoiceError> {
        if !self.recognition_available || !self.recognizer.is_available() {
            return Err(VoiceError::Unavailable);
        }

        let session = RecognitionSessionId(self.next_id);
        self.next_id += 1;

        match self.recognizer.start(session, &self.params.locale) {
            Ok(()) => {
                self.current_session = Some(session);
                Ok(session)
            }
            Err(error) => {
                tracing::warn!(
                    code = RECOGNITION_START_FAILED,
                    error = %error,
                    "speech recognition failed to start"
                );
                Err(VoiceError::Unavailable)
            }
        }
    }

    /// Idempotent; does not clear any transcript already delivered.
    pub fn stop_listening(&mut self) {
        if self.current_session.take().is_some() {
            self.recognizer.stop();
        }
    }

    /// True when `session` is the active recognition session. Events from
    /// any other session must be dropped by the caller.
    pub fn is_current_session(&self, session: RecognitionSessionId) -> bool {
        self.current_session == Some(session)
    }

    /// Marks a session as naturally finished (final result or error).
    pub fn end_session(&mut self, session: RecognitionSessionId) {
        if self.current_session == Some(session) {
            self.current_session = None;
        }
    }

    /// Acknowledges a finished utterance. Returns true when it was the
    /// current one (the caller clears the speaking flag); stale ids are
    /// ignored.
    pub fn finish_utterance(&mut self, utterance: UtteranceId) -> bool {
        if self.current_utterance == Some(utterance) {
            self.current_utterance = None;
            true
        } else {
            false
        }
    }
}
