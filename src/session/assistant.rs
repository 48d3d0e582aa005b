use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::config::SessionConfig;
use super::frame::{Effect, Frame};
use super::state::SessionState;
use crate::audio::{MusicPlayer, MusicStatus};
use crate::command::{classify, Intent};
use crate::recipe::RecipeCatalog;
use crate::voice::{CaptureOutcome, SpeechQueue, VoiceCapture};

pub const LISTENING: &str = "Listening for your command...";
pub const NOT_UNDERSTOOD: &str = "Sorry, I did not understand. Please repeat.";

/// Result of handling one transcript
#[derive(Debug, Clone, Serialize)]
pub struct CommandOutcome {
    pub transcript: String,
    pub intent: Intent,
    pub effects: Vec<Effect>,
    pub frame: Frame,
}

/// Result of one listen trigger
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ListenOutcome {
    Heard(CommandOutcome),
    NotUnderstood { frame: Frame },
}

/// The single driver of a cooking session
///
/// Owns the session state and its collaborators. Presentation layers call in
/// here and render the returned frames; nothing else touches the state.
pub struct Assistant {
    catalog: Arc<RecipeCatalog>,
    state: SessionState,
    config: SessionConfig,
    speech: SpeechQueue,
    capture: Box<dyn VoiceCapture>,
    music: Box<dyn MusicPlayer>,
    music_status: Option<MusicStatus>,
}

impl Assistant {
    /// Create a session on `initial_recipe`, or the first catalog entry
    pub fn new(
        catalog: Arc<RecipeCatalog>,
        initial_recipe: Option<&str>,
        config: SessionConfig,
        speech: SpeechQueue,
        capture: Box<dyn VoiceCapture>,
        music: Box<dyn MusicPlayer>,
    ) -> Result<Self> {
        let recipe = match initial_recipe {
            Some(name) => catalog
                .get(name)
                .with_context(|| format!("Unknown recipe: {}", name))?,
            None => catalog.first().context("Recipe catalog is empty")?,
        };

        info!(
            "Session {} ready: {} (capture: {})",
            config.session_id,
            recipe.name,
            capture.name()
        );

        Ok(Self {
            catalog,
            state: SessionState::new(recipe),
            config,
            speech,
            capture,
            music,
            music_status: None,
        })
    }

    pub fn catalog(&self) -> &RecipeCatalog {
        &self.catalog
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn session_id(&self) -> &str {
        &self.config.session_id
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    /// Start background music once per session
    ///
    /// Returns `None` when no music file is configured.
    pub async fn start_music(&mut self) -> Option<MusicStatus> {
        let path = self.config.music_path.clone()?;

        if !self.state.mark_music_started() {
            return Some(MusicStatus::AlreadyStarted);
        }

        let status = self.music.start_loop(&path).await;
        if let Some(warning) = status.warning() {
            warn!("{} ({})", warning, path.display());
        }

        self.music_status = Some(status.clone());
        Some(status)
    }

    /// Switch to another catalog recipe
    pub fn select_recipe(&mut self, name: &str) -> Result<Frame> {
        let recipe = self
            .catalog
            .get(name)
            .with_context(|| format!("Unknown recipe: {}", name))?;

        let effects = self.state.select_recipe(recipe);
        self.execute(&effects);

        Ok(self.render())
    }

    /// Classify and apply one transcript, then render
    pub fn handle_transcript(&mut self, transcript: &str) -> CommandOutcome {
        info!("Heard: {}", transcript);

        let intent = classify(transcript);
        let effects = self.state.apply(intent, Utc::now());
        self.execute(&effects);

        CommandOutcome {
            transcript: transcript.to_string(),
            intent,
            effects,
            frame: self.render(),
        }
    }

    /// Listen for one command and handle it
    ///
    /// Blocks the session for at most the configured listen window.
    pub async fn listen(&mut self) -> ListenOutcome {
        self.speech.say(LISTENING);

        let outcome = match self.capture.listen(self.config.max_listen).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!("Voice capture failed ({}): {:#}", self.capture.name(), e);
                CaptureOutcome::NotUnderstood
            }
        };

        match outcome {
            CaptureOutcome::Transcript(text) => ListenOutcome::Heard(self.handle_transcript(&text)),
            CaptureOutcome::NotUnderstood => {
                self.speech.say(NOT_UNDERSTOOD);
                ListenOutcome::NotUnderstood {
                    frame: self.render(),
                }
            }
        }
    }

    /// Render pass: advances timers and announces completions
    pub fn render(&mut self) -> Frame {
        let (mut frame, effects) = self.state.render(Utc::now());
        self.execute(&effects);

        if let Some(warning) = self.music_status.as_ref().and_then(MusicStatus::warning) {
            frame.warnings.push(warning);
        }

        frame
    }

    /// Flush pending speech
    pub async fn shutdown(self) {
        info!("Session {} shutting down", self.config.session_id);
        self.speech.shutdown().await;
    }

    fn execute(&self, effects: &[Effect]) {
        for effect in effects {
            match effect {
                Effect::Speak { text } => self.speech.say(text.as_str()),
                Effect::ShowStep(step) => debug!("Showing {}", step.heading()),
                Effect::ShowIngredients(view) => {
                    debug!("Showing ingredients for {} servings", view.servings)
                }
                Effect::Terminate => info!("Session {} terminated", self.config.session_id),
            }
        }
    }
}
