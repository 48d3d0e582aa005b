use serde::Serialize;

use super::timer::TimerReport;
use crate::recipe::ImageLoadResult;

/// What the step display shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    /// 1-based step number
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub image: ImageLoadResult,
}

impl StepView {
    pub fn heading(&self) -> String {
        format!("Step {} / {}", self.number, self.total)
    }

    /// Utterance read aloud whenever a step is shown
    pub fn announcement(&self) -> String {
        format!("Step {}: {}", self.number, self.text)
    }
}

/// An ingredient list rescaled for a serving count
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngredientsView {
    pub servings: u32,
    pub lines: Vec<String>,
}

/// Side effect requested by a session transition
///
/// Transitions only describe effects; the assistant carries them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    ShowStep(StepView),
    ShowIngredients(IngredientsView),
    Speak { text: String },
    Terminate,
}

impl Effect {
    pub fn speak(text: impl Into<String>) -> Self {
        Effect::Speak { text: text.into() }
    }
}

/// Snapshot handed to the presentation layer after every render pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub recipe: String,
    pub step: StepView,
    /// Scaled lines after a "make N servings" command, the raw list otherwise
    pub ingredients: Vec<String>,
    pub scaled_for: Option<u32>,
    pub timers: Vec<TimerReport>,
    pub music_active: bool,
    pub terminated: bool,
    /// Degraded resources (missing image, music unavailable)
    pub warnings: Vec<String>,
}
