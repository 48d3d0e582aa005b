use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::frame::{Effect, Frame, IngredientsView, StepView};
use super::timer::{TimerManager, TimerReport};
use crate::command::Intent;
use crate::recipe::{scale_ingredients, Recipe};

pub const NO_MORE_STEPS: &str = "No more steps available";
pub const INVALID_STEP: &str = "Invalid step number";
pub const GOODBYE: &str = "Stopping assistant. Goodbye!";
pub const UNRECOGNIZED: &str =
    "Command not recognized. Try Next Step, Repeat, Set Timer, or Make servings.";
pub const IMAGE_NOT_FOUND: &str = "Image not found";

/// State of one cooking session
///
/// Every transition returns the effects it wants performed instead of
/// performing them, which keeps the state machine free of I/O.
#[derive(Debug, Clone)]
pub struct SessionState {
    recipe: Arc<Recipe>,
    step_index: usize,
    timers: TimerManager,
    music_active: bool,
    scaled: Option<IngredientsView>,
    terminated: bool,
}

impl SessionState {
    pub fn new(recipe: Arc<Recipe>) -> Self {
        Self {
            recipe,
            step_index: 0,
            timers: TimerManager::new(),
            music_active: false,
            scaled: None,
            terminated: false,
        }
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    /// Zero-based index of the displayed step
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    pub fn timers(&self) -> &TimerManager {
        &self.timers
    }

    pub fn music_active(&self) -> bool {
        self.music_active
    }

    pub fn scaled(&self) -> Option<&IngredientsView> {
        self.scaled.as_ref()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    pub fn current_step(&self) -> StepView {
        StepView {
            number: self.step_index + 1,
            total: self.recipe.step_count(),
            text: self
                .recipe
                .step(self.step_index)
                .unwrap_or_default()
                .to_string(),
            image: self.recipe.image(self.step_index),
        }
    }

    /// Dispatch a classified command
    pub fn apply(&mut self, intent: Intent, now: DateTime<Utc>) -> Vec<Effect> {
        if self.terminated {
            warn!("Ignoring {:?}: session already terminated", intent);
            return Vec::new();
        }

        match intent {
            Intent::Next => self.next(),
            Intent::Repeat => self.repeat(),
            Intent::GoTo(n) => self.go_to(n),
            Intent::SetTimer(minutes) => self.set_timer(minutes, now),
            Intent::ScaleIngredients(servings) => self.scale(servings),
            Intent::Terminate => self.terminate(),
            Intent::MissingNumber(slot) => vec![Effect::speak(slot.prompt())],
            Intent::Unrecognized => vec![Effect::speak(UNRECOGNIZED)],
        }
    }

    pub fn next(&mut self) -> Vec<Effect> {
        if self.step_index + 1 < self.recipe.step_count() {
            self.step_index += 1;
            self.show_current()
        } else {
            debug!("Already at last step of {}", self.recipe.name);
            vec![Effect::speak(NO_MORE_STEPS)]
        }
    }

    pub fn repeat(&self) -> Vec<Effect> {
        self.show_current()
    }

    /// Jump to a 1-based step number
    pub fn go_to(&mut self, number: u64) -> Vec<Effect> {
        let in_range = usize::try_from(number)
            .ok()
            .filter(|n| (1..=self.recipe.step_count()).contains(n));

        match in_range {
            Some(n) => {
                self.step_index = n - 1;
                self.show_current()
            }
            None => {
                debug!("Step {} out of range for {}", number, self.recipe.name);
                vec![Effect::speak(INVALID_STEP)]
            }
        }
    }

    pub fn set_timer(&mut self, minutes: u64, now: DateTime<Utc>) -> Vec<Effect> {
        self.timers.start(minutes, now);
        vec![Effect::speak(format!("Timer set for {} minutes", minutes))]
    }

    pub fn scale(&mut self, servings: u32) -> Vec<Effect> {
        let lines = scale_ingredients(
            &self.recipe.ingredients,
            self.recipe.base_servings,
            servings,
        )
        .iter()
        .map(ToString::to_string)
        .collect();

        let view = IngredientsView { servings, lines };
        self.scaled = Some(view.clone());

        vec![
            Effect::ShowIngredients(view),
            Effect::speak(format!("Ingredients scaled for {} servings", servings)),
        ]
    }

    pub fn terminate(&mut self) -> Vec<Effect> {
        self.terminated = true;
        vec![Effect::speak(GOODBYE), Effect::Terminate]
    }

    /// Switch recipes: back to step 1, timers and scaling dropped, music untouched
    pub fn select_recipe(&mut self, recipe: Arc<Recipe>) -> Vec<Effect> {
        info!("Selected recipe: {}", recipe.name);

        self.recipe = recipe;
        self.step_index = 0;
        self.timers.clear();
        self.scaled = None;

        self.show_current()
    }

    /// Record the first background music attempt
    ///
    /// Returns `false` if music was already started.
    pub fn mark_music_started(&mut self) -> bool {
        !std::mem::replace(&mut self.music_active, true)
    }

    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<TimerReport> {
        self.timers.tick(now)
    }

    /// One render pass: advance timers and snapshot what is on screen
    ///
    /// Returns the frame plus the completion announcements to speak.
    pub fn render(&mut self, now: DateTime<Utc>) -> (Frame, Vec<Effect>) {
        let timers = self.tick(now);

        // Nothing is announced after the goodbye
        let effects = if self.terminated {
            Vec::new()
        } else {
            timers
                .iter()
                .filter(|t| t.is_completed())
                .map(|t| Effect::speak(format!("{} completed!", t.label)))
                .collect()
        };

        let step = self.current_step();

        let mut warnings = Vec::new();
        if !step.image.is_found() {
            warnings.push(IMAGE_NOT_FOUND.to_string());
        }

        let (ingredients, scaled_for) = match &self.scaled {
            Some(view) => (view.lines.clone(), Some(view.servings)),
            None => (self.recipe.ingredients.clone(), None),
        };

        let frame = Frame {
            recipe: self.recipe.name.clone(),
            step,
            ingredients,
            scaled_for,
            timers,
            music_active: self.music_active,
            terminated: self.terminated,
            warnings,
        };

        (frame, effects)
    }

    fn show_current(&self) -> Vec<Effect> {
        let step = self.current_step();
        let announcement = step.announcement();

        vec![Effect::ShowStep(step), Effect::speak(announcement)]
    }
}
