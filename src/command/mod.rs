//! Voice command interpretation
//!
//! Transcripts are classified by ordered keyword matching. The first rule
//! that matches wins, regardless of where its keyword appears in the
//! sentence: "repeat the next step" is a `Next`.

mod intent;
mod interpreter;

pub use intent::{Intent, NumberSlot};
pub use interpreter::{classify, first_integer};
