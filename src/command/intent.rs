use serde::Serialize;

/// Which number a command expected but did not contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberSlot {
    StepNumber,
    TimerMinutes,
    Servings,
}

impl NumberSlot {
    /// Spoken prompt when the number is absent
    pub fn prompt(self) -> &'static str {
        match self {
            NumberSlot::StepNumber => "Invalid step number",
            NumberSlot::TimerMinutes => "Please specify a valid number for timer",
            NumberSlot::Servings => "Please specify the number of servings",
        }
    }
}

/// Normalized action derived from a transcript
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "intent", content = "value", rename_all = "snake_case")]
pub enum Intent {
    Next,
    Repeat,
    /// 1-based step number as spoken
    GoTo(u64),
    /// Duration in minutes
    SetTimer(u64),
    /// Desired number of servings
    ScaleIngredients(u32),
    Terminate,
    /// The command was recognized but its number was missing or zero
    MissingNumber(NumberSlot),
    Unrecognized,
}
