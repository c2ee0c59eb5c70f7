//! Core of a single-user productivity app: a prioritized task list, a
//! pomodoro-style countdown session timer, and derived task statistics.
//!
//! The presentation layer (forms, tab navigation, rendering) lives
//! outside this crate. It drives [`TaskStore`] and [`TimerController`]
//! in response to user actions, and reads their state plus the
//! [`stats`] projection to render. All state is in-memory and lives
//! exactly as long as the owning [`AppCore`].

pub mod error;
pub mod stats;
pub mod tasks;
pub mod timer;
pub mod utils;

pub use error::ValidationError;
pub use stats::{task_stats, PrioritySlice, TaskStats};
pub use tasks::{Priority, PriorityDirection, Task, TaskId, TaskStore};
pub use timer::{TimerController, TimerEvent, TimerState, TimerStatus, DEFAULT_DURATION_SECS};

/// All mutable state for one app session, owned explicitly rather than
/// held in ambient scope. The presentation layer creates one of these
/// and threads it through its views; the task list and the timer are
/// independent and share nothing else.
pub struct AppCore {
    pub tasks: TaskStore,
    pub timer: TimerController,
}

impl AppCore {
    pub fn new() -> Self {
        Self {
            tasks: TaskStore::new(),
            timer: TimerController::new(),
        }
    }
}

impl Default for AppCore {
    fn default() -> Self {
        Self::new()
    }
}
