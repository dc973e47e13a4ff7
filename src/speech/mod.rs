//! Speech service stand-ins for the terminal shell.
//!
//! Real deployments plug platform recognition/synthesis engines into the
//! [`crate::usecases::contracts::SpeechRecognizer`] and
//! [`crate::usecases::contracts::SpeechSynthesizer`] seams; the terminal has
//! neither, so these stubs emit realistically paced events instead.

mod paced_synthesizer;
mod scripted_recognizer;

pub use paced_synthesizer::PacedSynthesizer;
pub use scripted_recognizer::ScriptedRecognizer;
