// Test doubles shared by the integration tests
#![allow(dead_code)]

use anyhow::Result;
use loqa_kitchen::audio::{MusicPlayer, MusicStatus};
use loqa_kitchen::voice::{CaptureOutcome, Speaker, SpeechMode, SpeechQueue, VoiceCapture};
use loqa_kitchen::{Assistant, RecipeCatalog, SessionConfig};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

pub fn fixture_catalog() -> Arc<RecipeCatalog> {
    Arc::new(RecipeCatalog::load(fixture_path("recipes.json")).expect("fixture catalog"))
}

/// Records every utterance instead of speaking it
#[derive(Clone, Default)]
pub struct RecordingSpeaker {
    pub spoken: Arc<Mutex<Vec<String>>>,
}

impl RecordingSpeaker {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Speaker for RecordingSpeaker {
    async fn speak(&self, text: &str) -> Result<()> {
        self.spoken.lock().unwrap().push(text.to_string());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Always fails, like a TTS engine that is not installed
pub struct BrokenSpeaker;

#[async_trait::async_trait]
impl Speaker for BrokenSpeaker {
    async fn speak(&self, _text: &str) -> Result<()> {
        anyhow::bail!("speech engine unavailable")
    }

    fn name(&self) -> &str {
        "broken"
    }
}

/// Returns pre-scripted capture outcomes, then `NotUnderstood`
#[derive(Default)]
pub struct ScriptedCapture {
    outcomes: VecDeque<Result<CaptureOutcome>>,
    pub listens: Arc<Mutex<Vec<Duration>>>,
}

impl ScriptedCapture {
    pub fn new(outcomes: Vec<Result<CaptureOutcome>>) -> Self {
        Self {
            outcomes: outcomes.into(),
            listens: Arc::default(),
        }
    }

    pub fn saying(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| Ok(CaptureOutcome::Transcript(t.to_string())))
                .collect(),
        )
    }
}

#[async_trait::async_trait]
impl VoiceCapture for ScriptedCapture {
    async fn listen(&mut self, max_duration: Duration) -> Result<CaptureOutcome> {
        self.listens.lock().unwrap().push(max_duration);
        self.outcomes
            .pop_front()
            .unwrap_or(Ok(CaptureOutcome::NotUnderstood))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Counts start requests and answers with a fixed status
pub struct FakeMusicPlayer {
    pub starts: Arc<AtomicUsize>,
    status: MusicStatus,
}

impl FakeMusicPlayer {
    pub fn new(status: MusicStatus) -> Self {
        Self {
            starts: Arc::default(),
            status,
        }
    }
}

#[async_trait::async_trait]
impl MusicPlayer for FakeMusicPlayer {
    async fn start_loop(&mut self, _path: &Path) -> MusicStatus {
        self.starts.fetch_add(1, Ordering::SeqCst);
        self.status.clone()
    }

    fn name(&self) -> &str {
        "fake"
    }
}

/// An assistant wired to test doubles, speaking in queued mode
pub struct TestAssistant {
    pub assistant: Assistant,
    pub speaker: RecordingSpeaker,
    pub music_starts: Arc<AtomicUsize>,
}

impl TestAssistant {
    pub fn new(capture: ScriptedCapture) -> Self {
        Self::with_music(capture, MusicStatus::Started, Some(PathBuf::from("music.mp3")))
    }

    /// Wire any capture backend, e.g. a line reader shared with a chat loop
    pub fn with_capture(capture: impl VoiceCapture + 'static) -> Self {
        Self::build(Box::new(capture), MusicStatus::Started, Some(PathBuf::from("music.mp3")))
    }

    pub fn with_music(
        capture: ScriptedCapture,
        status: MusicStatus,
        music_path: Option<PathBuf>,
    ) -> Self {
        Self::build(Box::new(capture), status, music_path)
    }

    fn build(
        capture: Box<dyn VoiceCapture>,
        status: MusicStatus,
        music_path: Option<PathBuf>,
    ) -> Self {
        let speaker = RecordingSpeaker::default();
        let speech = SpeechQueue::spawn(Arc::new(speaker.clone()), SpeechMode::Queued);
        let music = FakeMusicPlayer::new(status);
        let music_starts = Arc::clone(&music.starts);

        let config = SessionConfig {
            session_id: "test-session".to_string(),
            max_listen: Duration::from_secs(8),
            music_path,
        };

        let assistant = Assistant::new(
            fixture_catalog(),
            None,
            config,
            speech,
            capture,
            Box::new(music),
        )
        .expect("assistant");

        Self {
            assistant,
            speaker,
            music_starts,
        }
    }

    /// Stop the assistant and return everything it said
    pub async fn finish(self) -> Vec<String> {
        self.assistant.shutdown().await;
        self.speaker.spoken()
    }
}
