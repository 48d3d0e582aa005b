use loqa_kitchen::nats::messages::{ListenRequestMessage, SpeechMessage, TranscriptMessage};

#[test]
fn test_listen_request_serialization() {
    let msg = ListenRequestMessage {
        session_id: "kitchen-test".to_string(),
        max_duration_ms: 8000,
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("kitchen-test"));
    assert!(json.contains("\"max_duration_ms\":8000"));

    let deserialized: ListenRequestMessage = serde_json::from_str(&json).unwrap();
    assert_eq!(deserialized.session_id, "kitchen-test");
    assert_eq!(deserialized.max_duration_ms, 8000);
}

#[test]
fn test_speech_message_serialization() {
    let msg = SpeechMessage {
        session_id: "kitchen-test".to_string(),
        text: "Step 1: Boil water".to_string(),
        timestamp: "2025-10-27T14:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("\"text\":\"Step 1: Boil water\""));
}

#[test]
fn test_transcript_deserialization() {
    let json = r#"{
        "session_id": "kitchen-test",
        "text": "next step",
        "partial": false,
        "timestamp": "2025-10-27T14:30:05Z",
        "confidence": 0.95
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.session_id, "kitchen-test");
    assert_eq!(msg.text, "next step");
    assert!(!msg.partial);
    assert_eq!(msg.confidence, Some(0.95));
}

#[test]
fn test_transcript_without_confidence() {
    let json = r#"{
        "session_id": "kitchen-test",
        "text": "go to step",
        "partial": true,
        "timestamp": "2025-10-27T14:30:05Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert!(msg.partial);
    assert_eq!(msg.confidence, None);
}
