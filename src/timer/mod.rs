pub mod controller;
pub mod state;

pub use controller::{TimerController, TimerEvent};
pub use state::{TickOutcome, TimerState, TimerStatus, DEFAULT_DURATION_SECS};
