use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::{
    domain::events::{AppEvent, KeyInput, PointerEvent},
    usecases::contracts::AppEventSource,
};

const EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

#[derive(Default)]
pub struct CrosstermEventSource;

impl AppEventSource for CrosstermEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        if !event::poll(EVENT_POLL_TIMEOUT)? {
            return Ok(Some(AppEvent::Tick));
        }

        match event::read()? {
            Event::Key(key) => {
                if key.kind != KeyEventKind::Press {
                    return Ok(None);
                }

                if key.code == KeyCode::Char('c')
                    && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(Some(AppEvent::QuitRequested));
                }

                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                let name = match key.code {
                    // Typed case is preserved for plain characters; shortcut
                    // characters normalize to lowercase.
                    KeyCode::Char(ch) if ctrl => ch.to_lowercase().to_string(),
                    KeyCode::Char(ch) => ch.to_string(),
                    KeyCode::Enter => "enter".to_owned(),
                    KeyCode::Esc => "esc".to_owned(),
                    KeyCode::Backspace => "backspace".to_owned(),
                    KeyCode::Tab => "tab".to_owned(),
                    KeyCode::Up => "up".to_owned(),
                    KeyCode::Down => "down".to_owned(),
                    KeyCode::Left => "left".to_owned(),
                    KeyCode::Right => "right".to_owned(),
                    KeyCode::Home => "home".to_owned(),
                    KeyCode::End => "end".to_owned(),
                    _ => return Ok(None),
                };

                Ok(Some(AppEvent::Key(KeyInput::new(name, ctrl))))
            }
            Event::Mouse(mouse) => {
                let (x, y) = (mouse.column, mouse.row);
                let pointer = match mouse.kind {
                    MouseEventKind::Down(MouseButton::Left) => PointerEvent::Down { x, y },
                    MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Move { x, y },
                    MouseEventKind::Up(MouseButton::Left) => PointerEvent::Up { x, y },
                    _ => return Ok(None),
                };
                Ok(Some(AppEvent::Pointer(pointer)))
            }
            Event::Resize(width, height) => Ok(Some(AppEvent::Resized { width, height })),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
pub struct MockEventSource {
    queue: std::collections::VecDeque<AppEvent>,
}

#[cfg(test)]
impl MockEventSource {
    pub fn from(events: Vec<AppEvent>) -> Self {
        Self {
            queue: events.into(),
        }
    }
}

#[cfg(test)]
impl AppEventSource for MockEventSource {
    fn next_event(&mut self) -> Result<Option<AppEvent>> {
        Ok(self.queue.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_source_drains_its_queue_in_order() {
        let mut source = MockEventSource::from(vec![AppEvent::Tick, AppEvent::QuitRequested]);

        assert_eq!(source.next_event().unwrap(), Some(AppEvent::Tick));
        assert_eq!(source.next_event().unwrap(), Some(AppEvent::QuitRequested));
        assert_eq!(source.next_event().unwrap(), None);
    }
}
