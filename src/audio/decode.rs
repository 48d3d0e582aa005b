use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{info, warn};

/// A fully decoded clip, downmixed to mono
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedAudio {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Linearly resample to `rate`
    pub fn resampled(self, rate: u32) -> Self {
        if rate == self.sample_rate {
            return self;
        }

        Self {
            samples: resample_linear(&self.samples, self.sample_rate, rate),
            sample_rate: rate,
        }
    }
}

/// Decode every packet of the first audio track in `path`
///
/// Corrupt packets are skipped; any other decoder error fails the whole file.
pub fn decode_file(path: impl AsRef<Path>) -> Result<DecodedAudio> {
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

    let mut format = probed.format;
    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .context("No audio track found")?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .context("Unsupported audio codec")?;

    let mut samples = Vec::new();

    while let Ok(packet) = format.next_packet() {
        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                sample_rate = sample_rate.or(Some(spec.rate));
                let channels = spec.channels.count().max(1);

                let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                buf.copy_interleaved_ref(decoded);

                for frame in buf.samples().chunks_exact(channels) {
                    let sum: f32 = frame.iter().sum();
                    samples.push(sum / channels as f32);
                }
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping corrupt packet in {}: {}", path.display(), e);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to decode {}", path.display()));
            }
        }
    }

    let sample_rate = sample_rate.context("Audio track has no sample rate")?;

    info!(
        "Decoded {}: {} samples at {}Hz",
        path.display(),
        samples.len(),
        sample_rate
    );

    Ok(DecodedAudio {
        samples,
        sample_rate,
    })
}

pub fn resample_linear(input: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == 0 || to_rate == 0 || input.is_empty() {
        return Vec::new();
    }

    let out_len = ((input.len() as f64) * (to_rate as f64) / (from_rate as f64))
        .ceil()
        .max(1.0) as usize;
    let step = from_rate as f64 / to_rate as f64;

    (0..out_len)
        .map(|i| {
            let pos = i as f64 * step;
            let idx = pos.floor() as usize;
            let frac = (pos - idx as f64) as f32;

            let current = input.get(idx).copied().unwrap_or_default();
            let next = input.get(idx + 1).copied().unwrap_or(current);
            current + (next - current) * frac
        })
        .collect()
}
