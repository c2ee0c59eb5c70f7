use std::{sync::Arc, time::Duration};

use log::info;
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
    time::{self, Instant, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;

use crate::error::ValidationError;

use super::state::{TickOutcome, TimerState, TimerStatus};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Pushed to subscribers whenever the timer changes, so the
/// presentation layer renders without polling.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum TimerEvent {
    StateChanged(TimerState),
    SessionCompleted {
        sessions_completed: u32,
        daily_goal: u32,
    },
}

struct Ticker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

/// Drives one [`TimerState`] and owns its tick source. The ticker task
/// exists exactly while the timer is running: spawned on entering
/// `Running`, cancelled on any transition out, and self-terminating
/// when the countdown completes. Cloning hands out another handle to
/// the same timer.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    ticker: Arc<Mutex<Option<Ticker>>>,
    tick_interval: Duration,
    events: broadcast::Sender<TimerEvent>,
}

impl TimerController {
    pub fn new() -> Self {
        Self::with_tick_interval(Duration::from_secs(1))
    }

    /// Same controller with a non-standard tick, for tests.
    pub fn with_tick_interval(tick_interval: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(Mutex::new(TimerState::new())),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn state(&self) -> TimerState {
        self.state.lock().await.clone()
    }

    /// Start or pause the countdown.
    pub async fn toggle(&self) -> TimerState {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.toggle();
            state.clone()
        };
        match snapshot.status {
            TimerStatus::Running => self.spawn_ticker().await,
            TimerStatus::Idle => self.cancel_ticker().await,
        }
        self.emit_state_changed(snapshot.clone());
        snapshot
    }

    /// Stop and reload the stock clock; completed sessions are kept.
    pub async fn reset(&self) -> TimerState {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.reset();
            state.clone()
        };
        self.cancel_ticker().await;
        self.emit_state_changed(snapshot.clone());
        snapshot
    }

    pub async fn set_custom_duration(&self, minutes: u32) -> Result<TimerState, ValidationError> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.set_custom_duration(minutes)?;
            state.clone()
        };
        // The duration change forced idle; the ticker must not outlive it.
        self.cancel_ticker().await;
        self.emit_state_changed(snapshot.clone());
        Ok(snapshot)
    }

    pub async fn set_daily_goal(&self, goal: u32) -> Result<TimerState, ValidationError> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.set_daily_goal(goal)?;
            state.clone()
        };
        self.emit_state_changed(snapshot.clone());
        Ok(snapshot)
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        // Replace, never stack: rapid toggles within one interval must
        // not leave a second ticker behind.
        if let Some(ticker) = ticker_guard.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }

        let state = self.state.clone();
        let events = self.events.clone();
        let tick_interval = self.tick_interval;
        let cancel = CancellationToken::new();
        let loop_cancel = cancel.clone();

        let handle = tokio::spawn(async move {
            // First decrement lands one full interval after start, and a
            // late tick never triggers catch-up bursts: one delivered
            // tick is always exactly one second off the clock.
            let mut interval = time::interval_at(Instant::now() + tick_interval, tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let (snapshot, outcome) = {
                            let mut guard = state.lock().await;
                            let outcome = guard.tick();
                            (guard.clone(), outcome)
                        };
                        match outcome {
                            TickOutcome::Counting => {
                                let _ = events.send(TimerEvent::StateChanged(snapshot));
                            }
                            TickOutcome::Completed => {
                                info!(
                                    "session {} of {} completed",
                                    snapshot.sessions_completed, snapshot.daily_goal
                                );
                                let _ = events.send(TimerEvent::StateChanged(snapshot.clone()));
                                let _ = events.send(TimerEvent::SessionCompleted {
                                    sessions_completed: snapshot.sessions_completed,
                                    daily_goal: snapshot.daily_goal,
                                });
                                break;
                            }
                            // Timer went idle between ticks; stop delivering.
                            TickOutcome::Ignored => break,
                        }
                    }
                    _ = loop_cancel.cancelled() => break,
                }
            }
        });

        *ticker_guard = Some(Ticker { handle, cancel });
    }

    async fn cancel_ticker(&self) {
        if let Some(ticker) = self.ticker.lock().await.take() {
            ticker.cancel.cancel();
            ticker.handle.abort();
        }
    }

    fn emit_state_changed(&self, snapshot: TimerState) {
        let _ = self.events.send(TimerEvent::StateChanged(snapshot));
    }
}

impl Default for TimerController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::state::DEFAULT_DURATION_SECS;

    // start_paused: tokio's clock advances instantly whenever every
    // task is idle, so these run in real milliseconds.

    #[tokio::test(start_paused = true)]
    async fn countdown_completes_and_goes_idle() {
        let timer = TimerController::new();
        timer.set_custom_duration(1).await.unwrap();
        timer.toggle().await;

        time::sleep(Duration::from_secs(61)).await;

        let state = timer.state().await;
        assert_eq!(state.status, TimerStatus::Idle);
        assert_eq!(state.sessions_completed, 1);
        // Custom duration stays configured across the reload.
        assert_eq!(state.remaining_seconds, 60);
    }

    #[tokio::test(start_paused = true)]
    async fn toggle_pauses_the_countdown() {
        let timer = TimerController::new();
        timer.toggle().await;
        // Half-second offset keeps the pause clear of a tick boundary.
        time::sleep(Duration::from_millis(5500)).await;

        let paused = timer.toggle().await;
        assert_eq!(paused.status, TimerStatus::Idle);
        assert_eq!(paused.remaining_seconds, DEFAULT_DURATION_SECS - 5);

        // No ticks may arrive while idle.
        time::sleep(Duration::from_secs(30)).await;
        let state = timer.state().await;
        assert_eq!(state.remaining_seconds, DEFAULT_DURATION_SECS - 5);
        assert_eq!(state.sessions_completed, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_the_ticker() {
        let timer = TimerController::new();
        timer.toggle().await;
        time::sleep(Duration::from_secs(3)).await;

        let state = timer.reset().await;
        assert_eq!(state.status, TimerStatus::Idle);
        assert_eq!(state.remaining_seconds, DEFAULT_DURATION_SECS);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.state().await.remaining_seconds, DEFAULT_DURATION_SECS);
    }

    #[tokio::test(start_paused = true)]
    async fn custom_duration_stops_an_active_countdown() {
        let timer = TimerController::new();
        timer.toggle().await;
        time::sleep(Duration::from_secs(2)).await;

        let state = timer.set_custom_duration(10).await.unwrap();
        assert_eq!(state.status, TimerStatus::Idle);
        assert_eq!(state.remaining_seconds, 600);

        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(timer.state().await.remaining_seconds, 600);
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_duration_leaves_countdown_running() {
        let timer = TimerController::new();
        timer.toggle().await;

        let err = timer.set_custom_duration(0).await.unwrap_err();
        assert_eq!(err, ValidationError::DurationOutOfRange(0));
        assert!(timer.state().await.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_toggles_leave_no_stray_ticker() {
        let timer = TimerController::new();
        for _ in 0..3 {
            timer.toggle().await;
            timer.toggle().await;
        }

        time::sleep(Duration::from_secs(10)).await;
        let state = timer.state().await;
        assert_eq!(state.status, TimerStatus::Idle);
        assert_eq!(state.remaining_seconds, DEFAULT_DURATION_SECS);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_emits_session_completed() {
        let timer = TimerController::new();
        timer.set_custom_duration(1).await.unwrap();
        let mut events = timer.subscribe();
        timer.toggle().await;

        time::sleep(Duration::from_secs(61)).await;

        let mut completed = None;
        loop {
            match events.try_recv() {
                Ok(TimerEvent::SessionCompleted {
                    sessions_completed, ..
                }) => completed = Some(sessions_completed),
                Ok(_) => {}
                // Per-tick events may overflow the channel; skip ahead.
                Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
                Err(_) => break,
            }
        }
        assert_eq!(completed, Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn daily_goal_updates_without_touching_countdown() {
        let timer = TimerController::new();
        timer.toggle().await;
        time::sleep(Duration::from_millis(2500)).await;

        let state = timer.set_daily_goal(8).await.unwrap();
        assert_eq!(state.daily_goal, 8);
        assert!(state.is_running());
        assert_eq!(state.remaining_seconds, DEFAULT_DURATION_SECS - 2);
    }
}
