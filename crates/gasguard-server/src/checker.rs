use std::sync::Mutex;
use std::time::Duration;

use chrono::Local;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use gasguard_core::types::{ControlMode, GroupId};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// One checker pass over both groups. Returns how many groups had their
/// applied effective command changed, so consecutive passes with an
/// unchanged schedule and time bucket return 0.
///
/// Groups in a forced mode are never second-guessed here; only the derived
/// effective value changes, the manual mode stays untouched. Store failures
/// fail open to "no schedule" inside `schedule_for` and never abort the
/// pass for the other group.
pub async fn run_cycle(state: &AppState) -> usize {
    let mut changed = 0;
    for &group in GroupId::all() {
        let mode = {
            let control = state.control.lock().unwrap();
            control.mode(group)
        };
        if mode != ControlMode::Auto {
            continue;
        }

        let schedule = state.schedule_for(group).await;
        let mut control = state.control.lock().unwrap();
        let command = control.resolve(group, schedule.as_ref(), Local::now());
        if control.apply(group, command) {
            changed += 1;
            tracing::info!("schedule checker: group {group} effective command -> {command}");
        }
    }
    changed
}

// ---------------------------------------------------------------------------
// ScheduleChecker
// ---------------------------------------------------------------------------

struct CheckerTask {
    handle: JoinHandle<()>,
    shutdown: watch::Sender<bool>,
}

/// Recurring background task that re-evaluates schedules for groups in
/// automatic mode.
///
/// Explicit start/stop lifecycle: `start` first cancels any previous
/// instance, so calling it twice never leaves two checkers running.
#[derive(Default)]
pub struct ScheduleChecker {
    task: Mutex<Option<CheckerTask>>,
}

impl ScheduleChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, state: AppState, period: Duration) {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // tokio intervals fire immediately; consume the first tick so
            // cycles run once per period.
            interval.tick().await;
            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        run_cycle(&state).await;
                    }
                    _ = shutdown_rx.changed() => break,
                }
            }
        });

        let mut slot = self.task.lock().unwrap();
        if let Some(previous) = slot.replace(CheckerTask {
            handle,
            shutdown: shutdown_tx,
        }) {
            let _ = previous.shutdown.send(true);
            previous.handle.abort();
        }
    }

    pub fn stop(&self) {
        if let Some(task) = self.task.lock().unwrap().take() {
            let _ = task.shutdown.send(true);
            task.handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().unwrap().is_some()
    }
}

impl Drop for ScheduleChecker {
    fn drop(&mut self) {
        self.stop();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use gasguard_core::config::Config;
    use gasguard_core::schedule::{Schedule, SlotAction, TimeSlot};
    use gasguard_core::store::GuardDb;
    use gasguard_core::types::EffectiveCommand;
    use tempfile::TempDir;

    fn test_state(dir: &TempDir) -> AppState {
        let db = GuardDb::open(&dir.path().join("test.db")).unwrap();
        AppState::new(db, Config::default(), None)
    }

    fn always_on(group: GroupId) -> Schedule {
        Schedule::new(
            group,
            true,
            vec![TimeSlot {
                start: "00:00".into(),
                end: "23:59".into(),
                action: SlotAction::On,
            }],
            (0..=6).collect(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn cycle_applies_schedule_once_then_no_ops() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        state.db.upsert_schedule(&always_on(GroupId::One)).unwrap();

        assert_eq!(run_cycle(&state).await, 1);
        {
            let control = state.control.lock().unwrap();
            assert_eq!(control.applied(GroupId::One), EffectiveCommand::On);
            assert_eq!(control.applied(GroupId::Two), EffectiveCommand::Auto);
        }

        // Same schedule, same time bucket: deterministic no-op.
        assert_eq!(run_cycle(&state).await, 0);
    }

    #[tokio::test]
    async fn cycle_skips_groups_in_forced_mode() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        state.db.upsert_schedule(&always_on(GroupId::One)).unwrap();
        state
            .control
            .lock()
            .unwrap()
            .set_mode(GroupId::One, ControlMode::ForceOff);

        assert_eq!(run_cycle(&state).await, 0);
        let control = state.control.lock().unwrap();
        assert_eq!(control.applied(GroupId::One), EffectiveCommand::Auto);
    }

    #[tokio::test]
    async fn cycle_with_no_schedule_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        assert_eq!(run_cycle(&state).await, 0);
    }

    #[tokio::test]
    async fn start_is_idempotent_and_stop_cancels() {
        let dir = TempDir::new().unwrap();
        let state = test_state(&dir);
        let checker = ScheduleChecker::new();

        checker.start(state.clone(), Duration::from_secs(60));
        assert!(checker.is_running());

        // Restart replaces the previous task rather than stacking a second.
        checker.start(state, Duration::from_secs(60));
        assert!(checker.is_running());

        checker.stop();
        assert!(!checker.is_running());
        // Stopping again is harmless.
        checker.stop();
    }
}
