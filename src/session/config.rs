use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a cooking session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Unique session identifier, used to match transcripts on NATS
    pub session_id: String,

    /// Longest a single listen may block the session
    /// Default: 8 seconds
    pub max_listen: Duration,

    /// Background music file, or `None` to play nothing
    pub music_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_id: format!("kitchen-{}", uuid::Uuid::new_v4()),
            max_listen: Duration::from_secs(8),
            music_path: None,
        }
    }
}
