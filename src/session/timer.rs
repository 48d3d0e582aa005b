use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// A countdown started by a "set timer" command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timer {
    /// "Timer N", unique within the session
    pub label: String,
    pub duration_minutes: u64,
    pub started_at: DateTime<Utc>,
}

impl Timer {
    /// Whole minutes left at `now`, truncated and clamped at 0
    ///
    /// This reads 0 during the last minute; only `is_complete` ends a timer.
    pub fn remaining_minutes(&self, now: DateTime<Utc>) -> u64 {
        let elapsed_minutes = self.elapsed_secs(now) as f64 / 60.0;
        let remaining = (self.duration_minutes as f64 - elapsed_minutes).trunc();

        if remaining > 0.0 {
            remaining as u64
        } else {
            0
        }
    }

    /// The full duration has elapsed at `now`
    pub fn is_complete(&self, now: DateTime<Utc>) -> bool {
        self.elapsed_secs(now) >= self.duration_minutes.saturating_mul(60)
    }

    // Whole seconds, so a fresh timer still shows its full duration
    fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        let secs = now.signed_duration_since(self.started_at).num_seconds();
        u64::try_from(secs).unwrap_or(0)
    }
}

/// State of a timer as of one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TimerStatus {
    Running { remaining_minutes: u64 },
    Completed,
}

/// One line of timer output for a render pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimerReport {
    pub label: String,
    #[serde(flatten)]
    pub status: TimerStatus,
}

impl TimerReport {
    pub fn is_completed(&self) -> bool {
        self.status == TimerStatus::Completed
    }

    /// Status line for the timer display
    pub fn line(&self) -> String {
        match self.status {
            TimerStatus::Running { remaining_minutes } => {
                format!("⏳ {}: {} min left", self.label, remaining_minutes)
            }
            TimerStatus::Completed => format!("⏱ {} completed!", self.label),
        }
    }
}

/// Owns the active timers of a session
#[derive(Debug, Clone)]
pub struct TimerManager {
    timers: Vec<Timer>,
    /// Next label number; never reset so labels stay unique
    next_number: u64,
}

impl TimerManager {
    pub fn new() -> Self {
        Self {
            timers: Vec::new(),
            next_number: 1,
        }
    }

    /// Append a new timer started at `now`
    pub fn start(&mut self, minutes: u64, now: DateTime<Utc>) -> &Timer {
        let label = format!("Timer {}", self.next_number);
        self.next_number += 1;

        info!("{} started: {} minutes", label, minutes);

        self.timers.push(Timer {
            label,
            duration_minutes: minutes,
            started_at: now,
        });

        &self.timers[self.timers.len() - 1]
    }

    /// Report every timer and reap the ones whose duration has elapsed
    ///
    /// A completed timer is reported exactly once: it is removed before this
    /// call returns.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Vec<TimerReport> {
        let mut completed = Vec::new();

        let reports = self
            .timers
            .iter()
            .enumerate()
            .map(|(idx, timer)| {
                let status = if timer.is_complete(now) {
                    completed.push(idx);
                    TimerStatus::Completed
                } else {
                    TimerStatus::Running {
                        remaining_minutes: timer.remaining_minutes(now),
                    }
                };

                TimerReport {
                    label: timer.label.clone(),
                    status,
                }
            })
            .collect();

        for idx in completed.into_iter().rev() {
            let timer = self.timers.remove(idx);
            info!("{} completed", timer.label);
        }

        reports
    }

    /// Drop all timers (recipe switch)
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn active(&self) -> &[Timer] {
        &self.timers
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }
}

impl Default for TimerManager {
    fn default() -> Self {
        Self::new()
    }
}
