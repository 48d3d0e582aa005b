use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::codecs::CODEC_TYPE_NULL;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::info;

/// Basic facts about an audio file, read without decoding it
#[derive(Debug, Clone)]
pub struct AudioProbe {
    pub path: String,
    pub sample_rate: Option<u32>,
    pub channels: Option<usize>,
    pub duration_seconds: Option<f64>,
}

impl AudioProbe {
    /// Probe the container and find a playable track
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .with_context(|| format!("Failed to open audio file {}", path.display()))?;
        let stream = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                stream,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .context("Unsupported audio format")?;

        let track = probed
            .format
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .context("No audio track found")?;

        let params = &track.codec_params;
        let sample_rate = params.sample_rate;
        let channels = params.channels.map(|c| c.count());
        let duration_seconds = match (params.n_frames, sample_rate) {
            (Some(frames), Some(rate)) if rate > 0 => Some(frames as f64 / rate as f64),
            _ => None,
        };

        info!(
            "Audio file probed: {} ({:?}Hz, {:?} channels, {:?}s)",
            path.display(),
            sample_rate,
            channels,
            duration_seconds
        );

        Ok(Self {
            path: path.display().to_string(),
            sample_rate,
            channels,
            duration_seconds,
        })
    }
}
