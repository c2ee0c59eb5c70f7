use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Stock countdown length: one 25 minute session.
pub const DEFAULT_DURATION_SECS: u32 = 25 * 60;

const MIN_CUSTOM_MINUTES: u32 = 1;
const MAX_CUSTOM_MINUTES: u32 = 60;
const DEFAULT_DAILY_GOAL: u32 = 4;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerStatus {
    Idle,
    Running,
}

impl Default for TimerStatus {
    fn default() -> Self {
        TimerStatus::Idle
    }
}

/// What one delivered tick did to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum TickOutcome {
    /// Tick arrived while idle; nothing changed.
    Ignored,
    /// Countdown decremented and keeps running.
    Counting,
    /// Countdown hit zero: timer stopped, session counted, clock
    /// reloaded to the configured duration.
    Completed,
}

/// Pure countdown state machine. Time enters only through `tick`, one
/// discrete second at a time; the async tick source lives in the
/// controller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub status: TimerStatus,
    pub remaining_seconds: u32,
    /// Reload target once a countdown finishes. Stays at
    /// `DEFAULT_DURATION_SECS` unless a custom duration is in effect.
    pub duration_seconds: u32,
    pub sessions_completed: u32,
    pub daily_goal: u32,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            status: TimerStatus::Idle,
            remaining_seconds: DEFAULT_DURATION_SECS,
            duration_seconds: DEFAULT_DURATION_SECS,
            sessions_completed: 0,
            daily_goal: DEFAULT_DAILY_GOAL,
        }
    }
}

impl TimerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Start or pause. The clock is left where it is.
    pub fn toggle(&mut self) -> TimerStatus {
        self.status = match self.status {
            TimerStatus::Idle => TimerStatus::Running,
            TimerStatus::Running => TimerStatus::Idle,
        };
        self.status
    }

    /// One second elapsed. Reaching exactly zero stops the timer,
    /// counts the session, and reloads the clock.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status != TimerStatus::Running {
            return TickOutcome::Ignored;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.status = TimerStatus::Idle;
            self.sessions_completed += 1;
            self.remaining_seconds = self.duration_seconds;
            TickOutcome::Completed
        } else {
            TickOutcome::Counting
        }
    }

    /// Stop and reload the stock 25 minute clock, discarding any custom
    /// duration. Completed sessions are kept.
    pub fn reset(&mut self) {
        self.status = TimerStatus::Idle;
        self.duration_seconds = DEFAULT_DURATION_SECS;
        self.remaining_seconds = DEFAULT_DURATION_SECS;
    }

    /// Replace the countdown length, 1 to 60 minutes. Forces idle
    /// rather than resuming mid-countdown against a different clock.
    pub fn set_custom_duration(&mut self, minutes: u32) -> Result<(), ValidationError> {
        if !(MIN_CUSTOM_MINUTES..=MAX_CUSTOM_MINUTES).contains(&minutes) {
            return Err(ValidationError::DurationOutOfRange(minutes));
        }
        self.status = TimerStatus::Idle;
        self.duration_seconds = minutes * 60;
        self.remaining_seconds = self.duration_seconds;
        Ok(())
    }

    /// Target number of completed sessions per day; countdown and
    /// status are untouched.
    pub fn set_daily_goal(&mut self, goal: u32) -> Result<(), ValidationError> {
        if goal == 0 {
            return Err(ValidationError::ZeroDailyGoal);
        }
        self.daily_goal = goal;
        Ok(())
    }

    /// Sessions completed against the daily goal, capped at 100.
    pub fn daily_progress_percent(&self) -> u8 {
        let percent =
            (f64::from(self.sessions_completed) / f64::from(self.daily_goal) * 100.0).round();
        percent.min(100.0) as u8
    }
}
