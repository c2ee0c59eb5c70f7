use thiserror::Error;

/// Rejection of malformed input to `add`, `set_custom_duration`, or
/// `set_daily_goal`. Every other operation is total: unknown ids are
/// treated as no-ops, never as errors.
///
/// Validation happens before any mutation, so a rejected call leaves
/// prior state untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("task description must not be empty")]
    EmptyDescription,

    #[error("task due date is required")]
    MissingDueDate,

    #[error("custom duration must be between 1 and 60 minutes, got {0}")]
    DurationOutOfRange(u32),

    #[error("daily goal must be at least 1")]
    ZeroDailyGoal,
}
