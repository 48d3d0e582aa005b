pub mod audio;
pub mod chat;
pub mod command;
pub mod config;
pub mod http;
pub mod nats;
pub mod recipe;
pub mod session;
pub mod voice;

pub use audio::{AudioProbe, MusicPlayer, MusicStatus, ProcessMusicPlayer, StreamMusicPlayer};
pub use command::{classify, Intent, NumberSlot};
pub use config::Config;
pub use http::{create_router, AppState};
pub use nats::{ListenRequestMessage, NatsClient, SpeechMessage, TranscriptMessage};
pub use recipe::{scale_ingredients, ImageLoadResult, Ingredient, Recipe, RecipeCatalog};
pub use session::{
    Assistant, AssistantFactory, CommandOutcome, Effect, Frame, ListenOutcome, SessionConfig,
    SessionState, TimerManager,
};
pub use voice::{CaptureOutcome, SpeechMode, SpeechQueue, VoiceCapture};
