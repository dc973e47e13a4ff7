//! UI layer: terminal session, event translation, and rendering.

pub mod event_source;
mod message_rendering;
pub mod shell;
mod styles;
mod terminal;
mod view;

pub use event_source::CrosstermEventSource;
