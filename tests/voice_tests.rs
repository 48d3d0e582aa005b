// Integration tests for voice I/O collaborators
//
// Speech dispatch and line-based capture are exercised without audio
// hardware.

mod common;

use anyhow::Result;
use common::{BrokenSpeaker, RecordingSpeaker};
use loqa_kitchen::voice::{
    CaptureOutcome, CommandSpeaker, LineCapture, SpeechMode, SpeechQueue, VoiceCapture,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncWriteExt, BufReader};

#[tokio::test]
async fn test_queued_speech_keeps_order() -> Result<()> {
    let speaker = RecordingSpeaker::default();
    let queue = SpeechQueue::spawn(Arc::new(speaker.clone()), SpeechMode::Queued);

    for i in 1..=5 {
        queue.say(format!("utterance {}", i));
    }
    queue.shutdown().await;

    assert_eq!(
        speaker.spoken(),
        (1..=5).map(|i| format!("utterance {}", i)).collect::<Vec<_>>()
    );

    Ok(())
}

#[tokio::test]
async fn test_detached_speech_delivers_every_utterance() -> Result<()> {
    let speaker = RecordingSpeaker::default();
    let queue = SpeechQueue::spawn(Arc::new(speaker.clone()), SpeechMode::Detached);

    queue.say("one");
    queue.say("two");

    // Detached tasks are not awaited by shutdown
    for _ in 0..50 {
        if speaker.spoken().len() == 2 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let mut spoken = speaker.spoken();
    spoken.sort();
    assert_eq!(spoken, vec!["one", "two"]);

    Ok(())
}

#[tokio::test]
async fn test_speech_failures_are_swallowed() -> Result<()> {
    let queue = SpeechQueue::spawn(Arc::new(BrokenSpeaker), SpeechMode::Queued);

    queue.say("first");
    queue.say("second");

    // The worker survives failures and shuts down cleanly
    queue.shutdown().await;

    Ok(())
}

#[test]
fn test_command_speaker_requires_program() {
    assert!(CommandSpeaker::new(&[]).is_err());
    assert!(CommandSpeaker::new(&["espeak-ng".to_string(), "-s".to_string(), "150".to_string()]).is_ok());
}

#[tokio::test]
async fn test_line_capture_reads_one_transcript_per_listen() -> Result<()> {
    let input: &[u8] = b"next step\n\nmake 4 servings\n";
    let mut capture = LineCapture::new(BufReader::new(input));
    let window = Duration::from_secs(1);

    assert_eq!(
        capture.listen(window).await?,
        CaptureOutcome::Transcript("next step".to_string())
    );
    // Blank line is unintelligible
    assert_eq!(capture.listen(window).await?, CaptureOutcome::NotUnderstood);
    assert_eq!(
        capture.listen(window).await?,
        CaptureOutcome::Transcript("make 4 servings".to_string())
    );
    // End of input
    assert_eq!(capture.listen(window).await?, CaptureOutcome::NotUnderstood);

    Ok(())
}

#[tokio::test]
async fn test_line_capture_gives_up_after_max_duration() -> Result<()> {
    // A reader that never produces data
    let (_writer, reader) = tokio::io::duplex(64);
    let mut capture = LineCapture::new(BufReader::new(reader));

    let outcome = capture.listen(Duration::from_millis(20)).await?;

    assert_eq!(outcome, CaptureOutcome::NotUnderstood);

    Ok(())
}

#[tokio::test]
async fn test_line_after_timed_out_listen_reaches_shared_reader() -> Result<()> {
    let (mut writer, reader) = tokio::io::duplex(64);
    let input = LineCapture::new(BufReader::new(reader));
    let mut capture = input.clone();

    assert_eq!(
        capture.listen(Duration::from_millis(20)).await?,
        CaptureOutcome::NotUnderstood
    );

    writer.write_all(b"next\n").await?;

    assert_eq!(input.next_line().await?.as_deref(), Some("next"));

    Ok(())
}
