// Integration tests for background music
//
// WAV fixtures are written with hound into a temp directory, then probed and
// decoded with symphonia. Nothing here needs an output device to pass.

use anyhow::Result;
use loqa_kitchen::audio::{
    decode_file, AudioProbe, LoopingSource, MusicPlayer, MusicStatus, ProcessMusicPlayer,
    StreamMusicPlayer,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_wav(path: &Path, sample_rate: u32, channels: u16, seconds: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for _ in 0..(sample_rate * seconds * channels as u32) {
        writer.write_sample(0i16)?;
    }
    writer.finalize()?;

    Ok(())
}

#[test]
fn test_probe_wav_metadata() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("loop.wav");
    write_wav(&path, 16000, 2, 2)?;

    let probe = AudioProbe::open(&path)?;

    assert_eq!(probe.sample_rate, Some(16000));
    assert_eq!(probe.channels, Some(2));
    let duration = probe.duration_seconds.expect("WAV should report a duration");
    assert!((duration - 2.0).abs() < 0.01, "Duration should be 2s, got {}", duration);
    assert!(probe.path.contains("loop.wav"));

    Ok(())
}

#[test]
fn test_probe_rejects_non_audio() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("background_music.mp3");
    fs::write(&path, b"definitely not an mp3")?;

    assert!(AudioProbe::open(&path).is_err());

    Ok(())
}

#[test]
fn test_probe_nonexistent_file() {
    assert!(AudioProbe::open("/nonexistent/path/to/music.mp3").is_err());
}

#[tokio::test]
async fn test_missing_music_file_is_reported() -> Result<()> {
    let mut player = ProcessMusicPlayer::new(vec!["ffplay".to_string()]);
    let path = PathBuf::from("/nonexistent/background_music.mp3");

    let status = player.start_loop(&path).await;

    assert_eq!(status, MusicStatus::Missing(path));
    assert_eq!(status.warning().as_deref(), Some("Background music file not found"));

    Ok(())
}

#[tokio::test]
async fn test_undecodable_music_is_unavailable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("background_music.mp3");
    fs::write(&path, b"definitely not an mp3")?;

    let mut player = ProcessMusicPlayer::new(vec!["ffplay".to_string()]);
    let status = player.start_loop(&path).await;

    assert!(matches!(status, MusicStatus::Unavailable(_)), "got {:?}", status);

    Ok(())
}

#[tokio::test]
async fn test_missing_player_program_is_unavailable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("loop.wav");
    write_wav(&path, 16000, 1, 1)?;

    let mut player = ProcessMusicPlayer::new(vec!["loqa-kitchen-no-such-player".to_string()]);
    let status = player.start_loop(&path).await;

    match status {
        MusicStatus::Unavailable(reason) => assert!(reason.contains("loqa-kitchen-no-such-player")),
        other => panic!("Expected Unavailable, got {:?}", other),
    }

    let mut unconfigured = ProcessMusicPlayer::new(Vec::new());
    assert!(matches!(
        unconfigured.start_loop(&path).await,
        MusicStatus::Unavailable(_)
    ));

    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn test_player_start_is_idempotent() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("loop.wav");
    write_wav(&path, 16000, 1, 1)?;

    // The appended file path becomes $0 and is ignored
    let mut player = ProcessMusicPlayer::new(vec![
        "sh".to_string(),
        "-c".to_string(),
        "sleep 5".to_string(),
    ]);

    assert_eq!(player.start_loop(&path).await, MusicStatus::Started);
    assert_eq!(player.start_loop(&path).await, MusicStatus::AlreadyStarted);

    Ok(())
}

#[test]
fn test_decode_wav_downmixes_to_mono() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("loop.wav");
    write_wav(&path, 8000, 2, 1)?;

    let audio = decode_file(&path)?;

    assert_eq!(audio.sample_rate, 8000);
    assert_eq!(audio.samples.len(), 8000);
    assert!((audio.duration_seconds() - 1.0).abs() < 0.01);
    assert!(audio.samples.iter().all(|s| *s == 0.0));

    let resampled = audio.resampled(16000);
    assert_eq!(resampled.sample_rate, 16000);
    assert_eq!(resampled.samples.len(), 16000);

    Ok(())
}

#[test]
fn test_decode_rejects_non_audio() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("background_music.mp3");
    fs::write(&path, b"definitely not an mp3")?;

    assert!(decode_file(&path).is_err());

    Ok(())
}

#[test]
fn test_looping_source_wraps_around() {
    let mut source = LoopingSource::new(vec![0.1, 0.2, 0.3]);

    let played: Vec<f32> = (0..7).map(|_| source.next_sample()).collect();

    assert_eq!(played, vec![0.1, 0.2, 0.3, 0.1, 0.2, 0.3, 0.1]);
}

#[test]
fn test_looping_source_empty_clip_is_silent() {
    let mut source = LoopingSource::new(Vec::new());

    assert_eq!(source.next_sample(), 0.0);
    assert_eq!(source.next_sample(), 0.0);
}

#[tokio::test]
async fn test_output_player_reports_missing_file() -> Result<()> {
    let mut player = StreamMusicPlayer::new();
    let path = PathBuf::from("/nonexistent/background_music.mp3");

    assert_eq!(player.start_loop(&path).await, MusicStatus::Missing(path));

    Ok(())
}

#[tokio::test]
async fn test_output_player_undecodable_file_is_unavailable() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("background_music.mp3");
    fs::write(&path, b"definitely not an mp3")?;

    let mut player = StreamMusicPlayer::new();
    let status = player.start_loop(&path).await;

    assert!(matches!(status, MusicStatus::Unavailable(_)), "got {:?}", status);

    Ok(())
}

#[tokio::test]
async fn test_output_player_never_fails_on_valid_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("loop.wav");
    write_wav(&path, 16000, 1, 1)?;

    let mut player = StreamMusicPlayer::new();

    // Headless hosts have no output device; that degrades to Unavailable
    match player.start_loop(&path).await {
        MusicStatus::Started => {
            assert_eq!(player.start_loop(&path).await, MusicStatus::AlreadyStarted);
        }
        MusicStatus::Unavailable(reason) => assert!(!reason.is_empty()),
        other => panic!("Unexpected status {:?}", other),
    }

    Ok(())
}
