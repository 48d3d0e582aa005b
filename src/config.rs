use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

use crate::voice::SpeechMode;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub recipes: RecipesConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub music: MusicConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_name")]
    pub name: String,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecipesConfig {
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
    /// Recipe selected at startup (first catalog entry if unset)
    #[serde(default)]
    pub default_recipe: Option<String>,
}

/// Where voice commands come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptureBackend {
    /// Listen requests and transcripts over NATS (loqa-core STT)
    Nats,
    /// Typed transcripts on the process's stdin
    Stdin,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_capture")]
    pub capture: CaptureBackend,
    #[serde(default = "default_nats_url")]
    pub nats_url: String,
    #[serde(default = "default_max_listen_secs")]
    pub max_listen_secs: u64,
}

/// Where spoken responses go
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeechBackend {
    /// Print utterances to stdout
    Console,
    /// Run a local TTS program (e.g. espeak-ng)
    Command,
    /// Publish utterances to NATS for loqa-core TTS
    Nats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_backend")]
    pub backend: SpeechBackend,
    #[serde(default)]
    pub mode: SpeechMode,
    /// TTS program and leading arguments; the utterance is appended
    #[serde(default = "default_speech_command")]
    pub command: Vec<String>,
}

/// How background music is played
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MusicBackend {
    /// Decode in-process and loop through the default output device
    #[default]
    Output,
    /// Loop through the external `player` program
    Process,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MusicConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_music_path")]
    pub path: String,
    #[serde(default)]
    pub backend: MusicBackend,
    /// Player program and leading arguments for the process backend; the
    /// file path is appended
    #[serde(default = "default_music_player")]
    pub player: Vec<String>,
}

impl Config {
    /// Load configuration from an optional file plus `LOQA_KITCHEN__*` env overrides
    ///
    /// `path` is given without extension, as accepted by `config::File::with_name`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("LOQA_KITCHEN")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        Ok(settings.try_deserialize()?)
    }
}

impl RecipesConfig {
    pub fn catalog_path(&self) -> PathBuf {
        expand(&self.catalog_path)
    }
}

impl MusicConfig {
    pub fn path(&self) -> PathBuf {
        expand(&self.path)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            name: default_service_name(),
            http: HttpConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Default for RecipesConfig {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            default_recipe: None,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            capture: default_capture(),
            nats_url: default_nats_url(),
            max_listen_secs: default_max_listen_secs(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            backend: default_speech_backend(),
            mode: SpeechMode::default(),
            command: default_speech_command(),
        }
    }
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_music_path(),
            backend: MusicBackend::default(),
            player: default_music_player(),
        }
    }
}

fn default_service_name() -> String {
    "loqa-kitchen".to_string()
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3031
}

fn default_catalog_path() -> String {
    "recipes/recipes.json".to_string()
}

fn default_capture() -> CaptureBackend {
    CaptureBackend::Nats
}

fn default_nats_url() -> String {
    "nats://localhost:4222".to_string()
}

fn default_max_listen_secs() -> u64 {
    8
}

fn default_speech_backend() -> SpeechBackend {
    SpeechBackend::Console
}

fn default_speech_command() -> Vec<String> {
    vec!["espeak-ng".to_string()]
}

fn default_true() -> bool {
    true
}

fn default_music_path() -> String {
    "background_music.mp3".to_string()
}

fn default_music_player() -> Vec<String> {
    ["ffplay", "-nodisp", "-autoexit", "-loglevel", "quiet"]
        .into_iter()
        .map(String::from)
        .collect()
}
