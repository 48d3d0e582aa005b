use anyhow::{bail, Context, Result};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::decode::{decode_file, DecodedAudio};
use super::music::{MusicPlayer, MusicStatus};

/// Endless reader over a decoded clip
#[derive(Debug, Clone)]
pub struct LoopingSource {
    samples: Vec<f32>,
    position: usize,
}

impl LoopingSource {
    pub fn new(samples: Vec<f32>) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Next sample, wrapping to the start at the end of the clip
    pub fn next_sample(&mut self) -> f32 {
        let Some(&sample) = self.samples.get(self.position) else {
            return 0.0;
        };
        self.position = (self.position + 1) % self.samples.len();
        sample
    }
}

/// Loops a file through the default output device
///
/// The file is decoded up front with symphonia. A dedicated thread owns the
/// cpal stream for the lifetime of the player.
#[derive(Default)]
pub struct StreamMusicPlayer {
    /// Dropping the sender ends the playback thread
    stop: Option<mpsc::Sender<()>>,
}

impl StreamMusicPlayer {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl MusicPlayer for StreamMusicPlayer {
    async fn start_loop(&mut self, path: &Path) -> MusicStatus {
        if self.stop.is_some() {
            return MusicStatus::AlreadyStarted;
        }

        if !path.is_file() {
            return MusicStatus::Missing(path.to_path_buf());
        }

        let owned = path.to_path_buf();
        let audio = match tokio::task::spawn_blocking(move || decode_file(&owned)).await {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => return MusicStatus::Unavailable(format!("{:#}", e)),
            Err(e) => return MusicStatus::Unavailable(format!("decoder task failed: {}", e)),
        };

        if audio.samples.is_empty() {
            return MusicStatus::Unavailable("file contains no audio".to_string());
        }

        let (stop_tx, stop_rx) = mpsc::channel();
        let (init_tx, init_rx) = oneshot::channel();

        let spawned = thread::Builder::new()
            .name("background-music".to_string())
            .spawn(move || run_output(audio, init_tx, stop_rx));

        if let Err(e) = spawned {
            return MusicStatus::Unavailable(format!("failed to start playback thread: {}", e));
        }

        match init_rx.await {
            Ok(Ok(())) => {
                info!("Background music started: {}", path.display());
                self.stop = Some(stop_tx);
                MusicStatus::Started
            }
            Ok(Err(e)) => MusicStatus::Unavailable(format!("{:#}", e)),
            Err(_) => MusicStatus::Unavailable("playback thread exited during setup".to_string()),
        }
    }

    fn name(&self) -> &str {
        "output"
    }
}

fn run_output(
    audio: DecodedAudio,
    init_tx: oneshot::Sender<Result<()>>,
    stop_rx: mpsc::Receiver<()>,
) {
    let stream = match open_looping_stream(audio) {
        Ok(stream) => stream,
        Err(e) => {
            let _ = init_tx.send(Err(e));
            return;
        }
    };

    let _ = init_tx.send(Ok(()));

    // Returns once the player is dropped
    let _ = stop_rx.recv();

    drop(stream);
    debug!("Background music stopped");
}

fn open_looping_stream(audio: DecodedAudio) -> Result<Stream> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .context("No audio output device available")?;

    let supported = device
        .default_output_config()
        .context("Failed to query output device config")?;
    let sample_format = supported.sample_format();
    let config: StreamConfig = supported.into();

    let audio = audio.resampled(config.sample_rate.0);
    let source = LoopingSource::new(audio.samples);

    debug!(
        "Output stream: {}Hz, {} channels, {:?}",
        config.sample_rate.0, config.channels, sample_format
    );

    let stream = match sample_format {
        SampleFormat::F32 => build_stream::<f32>(&device, &config, source),
        SampleFormat::I16 => build_stream::<i16>(&device, &config, source),
        SampleFormat::U16 => build_stream::<u16>(&device, &config, source),
        other => bail!("Unsupported output sample format {:?}", other),
    }?;

    stream.play().context("Failed to start output stream")?;

    Ok(stream)
}

fn build_stream<T>(device: &Device, config: &StreamConfig, mut source: LoopingSource) -> Result<Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let channels = usize::from(config.channels).max(1);

    device
        .build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let sample = T::from_sample(source.next_sample());
                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                }
            },
            |err| warn!("Background music stream error: {}", err),
            None,
        )
        .context("Failed to build output stream")
}
