use std::sync::mpsc::Sender;

use anyhow::Result;
use tokio::{runtime::Handle, sync::watch, time::Duration};

use crate::{
    domain::events::{EngineEvent, RecognitionEvent, RecognitionSessionId},
    usecases::contracts::SpeechRecognizer,
};

const SESSION_STARTED: &str = "SPEECH_RECOGNITION_SESSION_STARTED";
const EVENT_CHANNEL_CLOSED: &str = "SPEECH_RECOGNITION_CHANNEL_CLOSED";

/// Interval between partial-result emissions.
const PARTIAL_INTERVAL_MS: u64 = 280;

/// Every n-th session mishears and ends in an error instead of a final
/// transcript, so the recovery path stays visible in the demo.
const MISHEAR_EVERY: usize = 4;

const SCRIPT: &[&str] = &[
    "show my pending approvals",
    "book a site visit for tomorrow",
    "what are today's collections",
];

/// Demo recognizer: each session "hears" the next scripted phrase, streaming
/// it word by word as partial results before the final transcript. Stopping
/// a session cancels the stream without emitting a final result; transcript
/// text already delivered stays wherever the caller put it.
pub struct ScriptedRecognizer {
    handle: Handle,
    events: Sender<EngineEvent>,
    next_phrase: usize,
    stop_tx: Option<watch::Sender<bool>>,
}

impl ScriptedRecognizer {
    pub fn new(handle: Handle, events: Sender<EngineEvent>) -> Self {
        Self {
            handle,
            events,
            next_phrase: 0,
            stop_tx: None,
        }
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn is_available(&self) -> bool {
        true
    }

    fn start(&mut self, session: RecognitionSessionId, locale: &str) -> Result<()> {
        let phrase = SCRIPT[self.next_phrase % SCRIPT.len()];
        let mishear = self.next_phrase % MISHEAR_EVERY == MISHEAR_EVERY - 1;
        self.next_phrase += 1;

        let (stop_tx, stop_rx) = watch::channel(false);
        self.stop_tx = Some(stop_tx);
        self.handle.spawn(run_session(
            session,
            phrase,
            mishear,
            self.events.clone(),
            stop_rx,
        ));

        tracing::debug!(
            code = SESSION_STARTED,
            session = session.0,
            locale,
            phrase,
            mishear,
            "scripted recognition session started"
        );
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

async fn run_session(
    session: RecognitionSessionId,
    phrase: &'static str,
    mishear: bool,
    events: Sender<EngineEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    let words: Vec<&str> = phrase.split_whitespace().collect();
    let mut heard = String::new();

    for (index, word) in words.iter().enumerate() {
        tokio::select! {
            changed = stop_rx.changed() => {
                if changed.is_err() || *stop_rx.borrow() {
                    return;
                }
            }
            _ = tokio::time::sleep(Duration::from_millis(PARTIAL_INTERVAL_MS)) => {
                if mishear && index == 1 {
                    let event = EngineEvent::Recognition {
                        session,
                        event: RecognitionEvent::Error("could not capture audio".to_owned()),
                    };
                    let _ = events.send(event);
                    return;
                }

                if !heard.is_empty() {
                    heard.push(' ');
                }
                heard.push_str(word);
                let event = EngineEvent::Recognition {
                    session,
                    event: RecognitionEvent::Partial(heard.clone()),
                };
                if events.send(event).is_err() {
                    tracing::debug!(code = EVENT_CHANNEL_CLOSED, "shell loop is gone");
                    return;
                }
            }
        }
    }

    if *stop_rx.borrow() {
        return;
    }
    let event = EngineEvent::Recognition {
        session,
        event: RecognitionEvent::Final(phrase.to_owned()),
    };
    if events.send(event).is_err() {
        tracing::debug!(code = EVENT_CHANNEL_CLOSED, "shell loop is gone");
    }
}
