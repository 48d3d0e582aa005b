//! Voice I/O collaborators
//!
//! - Capture: listen for one spoken command, bounded by a maximum duration
//! - Speech: speak responses without blocking the session driver

mod capture;
mod speech;

pub use capture::{CaptureOutcome, LineCapture, NatsCapture, VoiceCapture};
pub use speech::{CommandSpeaker, ConsoleSpeaker, NatsSpeaker, Speaker, SpeechMode, SpeechQueue};
