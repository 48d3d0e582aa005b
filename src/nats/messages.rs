use serde::{Deserialize, Serialize};

/// Request for the voice edge to capture one command
#[derive(Debug, Serialize, Deserialize)]
pub struct ListenRequestMessage {
    pub session_id: String,
    /// Maximum capture length in milliseconds
    pub max_duration_ms: u64,
    pub timestamp: String, // RFC3339 timestamp
}

/// Utterance for the TTS service to speak
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeechMessage {
    pub session_id: String,
    pub text: String,
    pub timestamp: String, // RFC3339 timestamp
}

/// Transcript message received from STT service
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptMessage {
    pub session_id: String,
    pub text: String,
    pub partial: bool,
    pub timestamp: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}
