use anyhow::{Context, Result};
use async_nats::Client;
use std::time::Duration;
use tracing::{debug, info};

use super::messages::{ListenRequestMessage, SpeechMessage};

/// Subject the STT service publishes final transcripts on
pub const FINAL_TRANSCRIPT_SUBJECT: &str = "stt.text.final";

pub struct NatsClient {
    client: Client,
    session_id: String,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str, session_id: String) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client, session_id })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Ask the voice edge to capture one command for this session
    pub async fn publish_listen_request(&self, max_duration: Duration) -> Result<()> {
        let subject = format!("voice.listen.{}", self.session_id);

        let message = ListenRequestMessage {
            session_id: self.session_id.clone(),
            max_duration_ms: max_duration.as_millis() as u64,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish listen request")?;

        debug!("Published listen request to {} ({:?})", subject, max_duration);

        Ok(())
    }

    /// Publish an utterance for the TTS service
    pub async fn publish_speech(&self, text: &str) -> Result<()> {
        let subject = format!("tts.say.{}", self.session_id);

        let message = SpeechMessage {
            session_id: self.session_id.clone(),
            text: text.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let payload = serde_json::to_vec(&message)?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish speech request")?;

        debug!("Published speech to {} ({} chars)", subject, text.len());

        Ok(())
    }

    /// Subscribe to final transcripts
    ///
    /// All sessions share the subject; callers filter by `session_id` in the
    /// payload.
    pub async fn subscribe_transcripts(&self) -> Result<async_nats::Subscriber> {
        debug!("Subscribing to transcripts on {}", FINAL_TRANSCRIPT_SUBJECT);

        let subscriber = self
            .client
            .subscribe(FINAL_TRANSCRIPT_SUBJECT.to_string())
            .await
            .context("Failed to subscribe to transcripts")?;

        Ok(subscriber)
    }
}
