use serde::Serialize;
use std::path::PathBuf;

/// Outcome of looking up a step image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "path", rename_all = "snake_case")]
pub enum ImageLoadResult {
    /// Image file exists at this path
    Found(PathBuf),
    /// No image for this step; show a placeholder warning
    Missing,
}

impl ImageLoadResult {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}
