//! Cooking session management
//!
//! This module provides:
//! - `SessionState`: the step/timer state machine (pure, effect-returning)
//! - `TimerManager`: countdown bookkeeping recomputed on each render
//! - `Assistant`: the single driver wiring state to speech, capture and music
//! - `AssistantFactory`: builds an assistant from configuration

mod assistant;
mod config;
mod factory;
mod frame;
mod state;
mod timer;

pub use assistant::{Assistant, CommandOutcome, ListenOutcome, LISTENING, NOT_UNDERSTOOD};
pub use config::SessionConfig;
pub use factory::AssistantFactory;
pub use frame::{Effect, Frame, IngredientsView, StepView};
pub use state::{SessionState, GOODBYE, IMAGE_NOT_FOUND, INVALID_STEP, NO_MORE_STEPS, UNRECOGNIZED};
pub use timer::{Timer, TimerManager, TimerReport, TimerStatus};
