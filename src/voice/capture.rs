use anyhow::{Context, Result};
use futures::stream::StreamExt;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::nats::{NatsClient, TranscriptMessage};

/// Result of one listening attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "text", rename_all = "snake_case")]
pub enum CaptureOutcome {
    Transcript(String),
    /// Nothing intelligible within the listen window
    NotUnderstood,
}

impl CaptureOutcome {
    fn from_text(text: String) -> Self {
        if text.trim().is_empty() {
            CaptureOutcome::NotUnderstood
        } else {
            CaptureOutcome::Transcript(text)
        }
    }
}

/// Voice capture backend
///
/// Implementations block the caller for at most `max_duration`.
#[async_trait::async_trait]
pub trait VoiceCapture: Send {
    async fn listen(&mut self, max_duration: Duration) -> Result<CaptureOutcome>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Capture via the loqa-core voice pipeline
///
/// Publishes a listen request and waits for the matching final transcript.
pub struct NatsCapture {
    client: Arc<NatsClient>,
}

impl NatsCapture {
    pub fn new(client: Arc<NatsClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl VoiceCapture for NatsCapture {
    async fn listen(&mut self, max_duration: Duration) -> Result<CaptureOutcome> {
        // Subscribe first so a fast transcript is not missed
        let mut transcripts = self.client.subscribe_transcripts().await?;
        self.client.publish_listen_request(max_duration).await?;

        let session_id = self.client.session_id().to_string();

        let wait_for_transcript = async {
            while let Some(msg) = transcripts.next().await {
                match serde_json::from_slice::<TranscriptMessage>(&msg.payload) {
                    Ok(transcript) => {
                        if transcript.session_id != session_id || transcript.partial {
                            continue;
                        }
                        return Some(transcript.text);
                    }
                    Err(e) => {
                        warn!("Failed to parse transcript message: {}", e);
                    }
                }
            }
            None
        };

        match timeout(max_duration, wait_for_transcript).await {
            Ok(Some(text)) => Ok(CaptureOutcome::from_text(text)),
            Ok(None) => {
                warn!("Transcript subscription closed while listening");
                Ok(CaptureOutcome::NotUnderstood)
            }
            Err(_) => {
                info!("No transcript within {:?}", max_duration);
                Ok(CaptureOutcome::NotUnderstood)
            }
        }
    }

    fn name(&self) -> &str {
        "nats"
    }
}

/// Capture typed transcripts, one per line
///
/// Clones share one reader, so a chat loop and the assistant take turns on
/// the same input and no buffered line is lost between them.
pub struct LineCapture<R> {
    lines: Arc<Mutex<Lines<R>>>,
}

impl<R> Clone for LineCapture<R> {
    fn clone(&self) -> Self {
        Self {
            lines: Arc::clone(&self.lines),
        }
    }
}

impl LineCapture<BufReader<Stdin>> {
    pub fn stdin() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()))
    }
}

impl<R: AsyncBufRead + Unpin + Send> LineCapture<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: Arc::new(Mutex::new(reader.lines())),
        }
    }

    /// Next input line, or `None` once the input is closed
    ///
    /// Cancel safe: a line that arrives after a timeout stays queued.
    pub async fn next_line(&self) -> Result<Option<String>> {
        self.lines
            .lock()
            .await
            .next_line()
            .await
            .context("Failed to read transcript line")
    }
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> VoiceCapture for LineCapture<R> {
    async fn listen(&mut self, max_duration: Duration) -> Result<CaptureOutcome> {
        match timeout(max_duration, self.next_line()).await {
            Ok(line) => match line? {
                Some(text) => Ok(CaptureOutcome::from_text(text)),
                None => {
                    debug!("Transcript input closed");
                    Ok(CaptureOutcome::NotUnderstood)
                }
            },
            Err(_) => Ok(CaptureOutcome::NotUnderstood),
        }
    }

    fn name(&self) -> &str {
        "lines"
    }
}
