use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::nats::NatsClient;

/// Text-to-speech backend
#[async_trait::async_trait]
pub trait Speaker: Send + Sync {
    /// Speak one utterance, returning once playback is done
    async fn speak(&self, text: &str) -> Result<()>;

    /// Backend name for logging
    fn name(&self) -> &str;
}

/// Prints utterances to stdout
pub struct ConsoleSpeaker;

#[async_trait::async_trait]
impl Speaker for ConsoleSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        println!("🔊 {}", text);
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

/// Runs a local TTS program with the utterance as its last argument
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    /// `command` is the program followed by its leading arguments
    pub fn new(command: &[String]) -> Result<Self> {
        let Some((program, args)) = command.split_first() else {
            bail!("Speech command is empty");
        };

        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
        })
    }
}

#[async_trait::async_trait]
impl Speaker for CommandSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }

        Ok(())
    }

    fn name(&self) -> &str {
        &self.program
    }
}

/// Publishes utterances for the loqa-core TTS service
pub struct NatsSpeaker {
    client: Arc<NatsClient>,
}

impl NatsSpeaker {
    pub fn new(client: Arc<NatsClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Speaker for NatsSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        self.client.publish_speech(text).await
    }

    fn name(&self) -> &str {
        "nats"
    }
}

/// How utterances are scheduled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechMode {
    /// One worker speaks utterances in the order they were requested
    #[default]
    Queued,
    /// One task per utterance; close requests may finish out of order
    Detached,
}

enum Dispatch {
    Queued {
        tx: mpsc::UnboundedSender<String>,
        worker: JoinHandle<()>,
    },
    Detached(Arc<dyn Speaker>),
}

/// Non-blocking speech output
///
/// `say` never waits for playback and never reports failures; failed
/// utterances are logged at debug level and dropped.
pub struct SpeechQueue {
    dispatch: Dispatch,
}

impl SpeechQueue {
    /// Start dispatching to `speaker` (must be called inside a Tokio runtime)
    pub fn spawn(speaker: Arc<dyn Speaker>, mode: SpeechMode) -> Self {
        info!("Speech output: {} ({:?})", speaker.name(), mode);

        let dispatch = match mode {
            SpeechMode::Queued => {
                let (tx, mut rx) = mpsc::unbounded_channel::<String>();

                let worker = tokio::spawn(async move {
                    while let Some(text) = rx.recv().await {
                        if let Err(e) = speaker.speak(&text).await {
                            debug!("Speech failed for {:?}: {:#}", text, e);
                        }
                    }
                    debug!("Speech worker stopped");
                });

                Dispatch::Queued { tx, worker }
            }
            SpeechMode::Detached => Dispatch::Detached(speaker),
        };

        Self { dispatch }
    }

    /// Request an utterance
    pub fn say(&self, text: impl Into<String>) {
        let text = text.into();

        match &self.dispatch {
            Dispatch::Queued { tx, .. } => {
                if tx.send(text).is_err() {
                    debug!("Speech worker is gone, dropping utterance");
                }
            }
            Dispatch::Detached(speaker) => {
                let speaker = Arc::clone(speaker);
                tokio::spawn(async move {
                    if let Err(e) = speaker.speak(&text).await {
                        debug!("Speech failed for {:?}: {:#}", text, e);
                    }
                });
            }
        }
    }

    /// Finish queued utterances and stop the worker
    ///
    /// Detached utterances already in flight are not awaited.
    pub async fn shutdown(self) {
        if let Dispatch::Queued { tx, worker } = self.dispatch {
            drop(tx);
            if let Err(e) = worker.await {
                error!("Speech worker panicked: {}", e);
            }
        }
    }
}
