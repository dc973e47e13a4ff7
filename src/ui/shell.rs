use std::sync::mpsc::Receiver;

use anyhow::Result;

use crate::{
    domain::events::{AppEvent, EngineEvent},
    usecases::{contracts::AppEventSource, shell::AssistantShell},
};

use super::{terminal::TerminalSession, view};

/// Runs the cooperative shell loop: draw, drain engine completions, then
/// handle at most one terminal event (a poll timeout becomes a tick). All
/// state mutation happens on this thread.
pub fn start(
    shell: &mut AssistantShell,
    event_source: &mut dyn AppEventSource,
    engine_events: &Receiver<EngineEvent>,
) -> Result<()> {
    tracing::info!("starting assistant shell");

    let mut terminal = TerminalSession::new()?;

    if let Ok((width, height)) = crossterm::terminal::size() {
        shell.handle_event(AppEvent::Resized { width, height })?;
    }

    while shell.is_running() {
        terminal.draw(|frame| view::render(frame, shell))?;

        while let Ok(engine_event) = engine_events.try_recv() {
            shell.handle_event(AppEvent::Engine(engine_event))?;
        }

        if let Some(event) = event_source.next_event()? {
            shell.handle_event(event)?;
        }
    }

    Ok(())
}
