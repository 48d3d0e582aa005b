use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::assistant::Assistant;
use super::config::SessionConfig;
use crate::audio::{MusicPlayer, ProcessMusicPlayer, StreamMusicPlayer};
use crate::config::{CaptureBackend, Config, MusicBackend, SpeechBackend};
use crate::nats::NatsClient;
use crate::recipe::RecipeCatalog;
use crate::voice::{
    CommandSpeaker, ConsoleSpeaker, LineCapture, NatsCapture, NatsSpeaker, Speaker, SpeechQueue,
    VoiceCapture,
};

/// Builds an assistant and its collaborators from configuration
pub struct AssistantFactory;

impl AssistantFactory {
    /// Create the session described by `cfg`
    ///
    /// NATS is only connected when the capture or speech backend needs it.
    pub async fn create(
        cfg: &Config,
        catalog: Arc<RecipeCatalog>,
        initial_recipe: Option<&str>,
    ) -> Result<Assistant> {
        Self::create_with_capture(cfg, catalog, initial_recipe, None).await
    }

    /// Like `create`, but `capture` replaces the configured capture backend
    pub async fn create_with_capture(
        cfg: &Config,
        catalog: Arc<RecipeCatalog>,
        initial_recipe: Option<&str>,
        capture: Option<Box<dyn VoiceCapture>>,
    ) -> Result<Assistant> {
        let session_config = SessionConfig {
            max_listen: Duration::from_secs(cfg.voice.max_listen_secs),
            music_path: cfg.music.enabled.then(|| cfg.music.path()),
            ..SessionConfig::default()
        };

        let needs_nats = (capture.is_none() && cfg.voice.capture == CaptureBackend::Nats)
            || cfg.speech.backend == SpeechBackend::Nats;

        let nats = if needs_nats {
            Some(Arc::new(
                NatsClient::connect(&cfg.voice.nats_url, session_config.session_id.clone())
                    .await
                    .context("Failed to connect voice pipeline")?,
            ))
        } else {
            None
        };

        let speaker: Arc<dyn Speaker> = match cfg.speech.backend {
            SpeechBackend::Console => Arc::new(ConsoleSpeaker),
            SpeechBackend::Command => Arc::new(CommandSpeaker::new(&cfg.speech.command)?),
            SpeechBackend::Nats => Arc::new(NatsSpeaker::new(
                nats.clone().context("NATS speech requires a connection")?,
            )),
        };

        let capture: Box<dyn VoiceCapture> = match (capture, cfg.voice.capture) {
            (Some(capture), _) => capture,
            (None, CaptureBackend::Stdin) => Box::new(LineCapture::stdin()),
            (None, CaptureBackend::Nats) => Box::new(NatsCapture::new(
                nats.clone().context("NATS capture requires a connection")?,
            )),
        };

        let music: Box<dyn MusicPlayer> = match cfg.music.backend {
            MusicBackend::Output => Box::new(StreamMusicPlayer::new()),
            MusicBackend::Process => Box::new(ProcessMusicPlayer::new(cfg.music.player.clone())),
        };

        info!("Building assistant for {}", cfg.service.name);

        let speech = SpeechQueue::spawn(speaker, cfg.speech.mode);

        let initial_recipe = initial_recipe.or(cfg.recipes.default_recipe.as_deref());

        Assistant::new(catalog, initial_recipe, session_config, speech, capture, music)
    }
}
