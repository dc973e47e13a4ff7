use std::sync::mpsc::Sender;

use anyhow::Result;
use tokio::{runtime::Handle, sync::watch, time::Duration};

use crate::{
    domain::events::{EngineEvent, UtteranceId},
    usecases::contracts::{SpeechParams, SpeechSynthesizer},
};

const UTTERANCE_STARTED: &str = "SPEECH_SYNTHESIS_UTTERANCE_STARTED";
const EVENT_CHANNEL_CLOSED: &str = "SPEECH_SYNTHESIS_CHANNEL_CLOSED";

/// Base utterance duration plus a per-character allowance, scaled by the
/// configured speech rate.
const BASE_DURATION_MS: u64 = 400;
const PER_CHAR_MS: u64 = 45;
const MAX_DURATION_MS: u64 = 12_000;

/// Demo synthesizer: "speaks" for a duration proportional to the text
/// length, then reports the utterance as finished. A stop finishes the
/// utterance immediately; either way exactly one finished event is emitted.
pub struct PacedSynthesizer {
    handle: Handle,
    events: Sender<EngineEvent>,
    stop_tx: Option<watch::Sender<bool>>,
}

impl PacedSynthesizer {
    pub fn new(handle: Handle, events: Sender<EngineEvent>) -> Self {
        Self {
            handle,
            events,
            stop_tx: None,
        }
    }
}

impl SpeechSynthesizer for PacedSynthesizer {
    fn speak(&mut self, utterance: UtteranceId, text: &str, params: &SpeechParams) -> Result<()> {
        let duration = utterance_duration(text, params.rate);

        let (stop_tx, stop_rx) = watch::channel(false);
        self.stop_tx = Some(stop_tx);
        self.handle
            .spawn(run_utterance(utterance, duration, self.events.clone(), stop_rx));

        tracing::debug!(
            code = UTTERANCE_STARTED,
            utterance = utterance.0,
            duration_ms = duration.as_millis() as u64,
            locale = %params.locale,
            pitch = params.pitch,
            "paced synthesis started"
        );
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(stop_tx) = self.stop_tx.take() {
            let _ = stop_tx.send(true);
        }
    }
}

fn utterance_duration(text: &str, rate: f32) -> Duration {
    let chars = text.chars().count() as u64;
    let paced = BASE_DURATION_MS + chars * PER_CHAR_MS;
    let rate = rate.clamp(0.25, 4.0);
    let scaled = (paced as f32 / rate) as u64;
    Duration::from_millis(scaled.min(MAX_DURATION_MS))
}

async fn run_utterance(
    utterance: UtteranceId,
    duration: Duration,
    events: Sender<EngineEvent>,
    mut stop_rx: watch::Receiver<bool>,
) {
    tokio::select! {
        _ = stop_rx.changed() => {}
        _ = tokio::time::sleep(duration) => {}
    }

    if events
        .send(EngineEvent::SynthesisFinished { utterance })
        .is_err()
    {
        tracing::debug!(code = EVENT_CHANNEL_CLOSED, "shell loop is gone");
    }
}
