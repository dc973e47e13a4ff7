//! Builds the process context and composes the assistant shell with its
//! production collaborators.

use std::{
    path::Path,
    sync::{
        mpsc::{self, Receiver},
        Arc,
    },
};

use crate::{
    backend::{ReplyDispatcher, StubResponderBackend},
    domain::{events::EngineEvent, launcher::ScreenBounds},
    infra::{
        self,
        config::FileConfigAdapter,
        contracts::ConfigAdapter,
        error::AppError,
        history::FileKeyValueStore,
        storage_layout::StorageLayout,
        stubs::{InMemoryKeyValueStore, NoopHaptics},
    },
    usecases::{
        context::AppContext,
        contracts::{Clock, KeyValueStore, ResponderBackend, SpeechParams, SystemClock},
        conversation::ConversationStore,
        shell::AssistantShell,
        voice::VoiceCoordinator,
    },
};

const STORE_FALLBACK: &str = "BOOTSTRAP_STORE_FALLBACK";

/// Screen bounds used until the terminal reports its real size.
const DEFAULT_SCREEN: ScreenBounds = ScreenBounds {
    width: 100.0,
    height: 30.0,
};

pub struct ComposedShell {
    pub shell: AssistantShell,
    pub engine_events: Receiver<EngineEvent>,
}

pub fn bootstrap(config_path: Option<&Path>) -> Result<AppContext, AppError> {
    let config = load_config(config_path)?;

    let log_guard = match resolved_layout() {
        Ok(layout) => Some(infra::logging::init(&config.logging, &layout.log_dir)?),
        Err(error) => {
            infra::logging::init_stderr(&config.logging)?;
            tracing::warn!(error = %error, "log directory unavailable; logging to stderr");
            None
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_time()
        .build()
        .map_err(AppError::RuntimeBuild)?;

    Ok(AppContext::new(config, runtime, log_guard))
}

pub fn compose_shell(context: &AppContext) -> ComposedShell {
    let (engine_tx, engine_rx) = mpsc::channel();

    let backend: Arc<dyn ResponderBackend> = Arc::new(StubResponderBackend::new(
        context.config.backend.reply_delay_ms,
    ));
    let dispatch = ReplyDispatcher::new(
        context.runtime.handle().clone(),
        backend,
        engine_tx.clone(),
    );

    let recognizer =
        crate::speech::ScriptedRecognizer::new(context.runtime.handle().clone(), engine_tx.clone());
    let synthesizer =
        crate::speech::PacedSynthesizer::new(context.runtime.handle().clone(), engine_tx);
    let voice = VoiceCoordinator::new(
        Box::new(recognizer),
        Box::new(synthesizer),
        SpeechParams {
            locale: context.config.voice.locale.clone(),
            pitch: context.config.voice.pitch,
            rate: context.config.voice.rate,
        },
    );

    let clock = SystemClock;
    let now = clock.now();
    let conversation = ConversationStore::restore(voice, open_store(), Box::new(dispatch), now);

    let shell = AssistantShell::new(
        conversation,
        Box::new(NoopHaptics),
        Box::new(clock),
        DEFAULT_SCREEN,
    );

    ComposedShell {
        shell,
        engine_events: engine_rx,
    }
}

/// Opens the on-disk key-value store, falling back to an in-memory one when
/// the storage directory cannot be prepared. The assistant keeps working;
/// only persistence across runs is lost.
pub fn open_store() -> Box<dyn KeyValueStore> {
    match resolved_layout() {
        Ok(layout) => Box::new(FileKeyValueStore::new(layout.store_dir)),
        Err(error) => {
            tracing::warn!(
                code = STORE_FALLBACK,
                error = %error,
                "storage directory unavailable; conversation will not persist"
            );
            Box::new(InMemoryKeyValueStore::default())
        }
    }
}

pub fn load_config(config_path: Option<&Path>) -> Result<crate::infra::config::AppConfig, AppError> {
    let adapter = FileConfigAdapter::new(config_path);
    adapter.load().map_err(AppError::Other)
}

fn resolved_layout() -> Result<StorageLayout, AppError> {
    let layout = StorageLayout::resolve()?;
    layout.ensure_dirs()?;
    Ok(layout)
}
