use super::intent::{Intent, NumberSlot};
use tracing::debug;

const NEXT_WORDS: &[&str] = &["next", "proceed", "continue"];
const REPEAT_WORDS: &[&str] = &["repeat", "again", "replay"];
const STOP_WORDS: &[&str] = &["stop", "exit", "quit"];

/// Classify a raw transcript into an intent
pub fn classify(transcript: &str) -> Intent {
    let cmd = transcript.to_lowercase();
    let contains_any = |words: &[&str]| words.iter().any(|w| cmd.contains(w));

    let intent = if contains_any(NEXT_WORDS) {
        Intent::Next
    } else if contains_any(REPEAT_WORDS) {
        Intent::Repeat
    } else if cmd.contains("go to step") {
        match first_integer::<u64>(&cmd) {
            Some(n) => Intent::GoTo(n),
            None => Intent::MissingNumber(NumberSlot::StepNumber),
        }
    } else if cmd.contains("timer") {
        match first_integer::<u64>(&cmd) {
            Some(minutes) if minutes > 0 => Intent::SetTimer(minutes),
            _ => Intent::MissingNumber(NumberSlot::TimerMinutes),
        }
    } else if cmd.contains("make") && cmd.contains("servings") {
        match first_integer::<u32>(&cmd) {
            Some(servings) if servings > 0 => Intent::ScaleIngredients(servings),
            _ => Intent::MissingNumber(NumberSlot::Servings),
        }
    } else if contains_any(STOP_WORDS) {
        Intent::Terminate
    } else {
        Intent::Unrecognized
    };

    debug!("Classified {:?} as {:?}", transcript, intent);

    intent
}

/// First whitespace-delimited token made only of ASCII digits
///
/// Tokens that overflow `T` are skipped. Number words ("three") are not
/// recognized.
pub fn first_integer<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.split_whitespace()
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .find_map(|token| token.parse().ok())
}
