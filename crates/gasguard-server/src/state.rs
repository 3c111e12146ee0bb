use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local};
use tokio::sync::broadcast;

use gasguard_core::alert_gate::AlertGate;
use gasguard_core::config::Config;
use gasguard_core::control::{ControlState, Coordinator};
use gasguard_core::history::HistoryBuffer;
use gasguard_core::reading::Reading;
use gasguard_core::schedule::Schedule;
use gasguard_core::store::GuardDb;
use gasguard_core::types::{ControlMode, EffectiveCommand, GroupId};

use crate::notify::Notifier;

// ---------------------------------------------------------------------------
// ControlCenter
// ---------------------------------------------------------------------------

/// Manual modes, the coordinator, and the last-applied effective commands,
/// guarded together so resolve-and-update is a single critical section per
/// group mutation.
pub struct ControlCenter {
    pub state: ControlState,
    coordinator: Coordinator,
    applied: [EffectiveCommand; 2],
}

impl Default for ControlCenter {
    fn default() -> Self {
        Self {
            state: ControlState::default(),
            coordinator: Coordinator::default(),
            applied: [EffectiveCommand::Auto; 2],
        }
    }
}

impl ControlCenter {
    pub fn mode(&self, group: GroupId) -> ControlMode {
        self.state.mode(group)
    }

    pub fn set_mode(&mut self, group: GroupId, mode: ControlMode) {
        self.state.set_mode(group, mode);
    }

    /// Resolve the effective command for a group from its current manual
    /// mode and the given schedule.
    pub fn resolve(
        &mut self,
        group: GroupId,
        schedule: Option<&Schedule>,
        now: DateTime<Local>,
    ) -> EffectiveCommand {
        let mode = self.state.mode(group);
        self.coordinator.resolve(group, mode, schedule, now)
    }

    /// Record the command as applied for change detection. Returns true
    /// when it differs from the previously applied value.
    pub fn apply(&mut self, group: GroupId, command: EffectiveCommand) -> bool {
        let slot = &mut self.applied[group.index()];
        let changed = *slot != command;
        *slot = command;
        changed
    }

    pub fn applied(&self, group: GroupId) -> EffectiveCommand {
        self.applied[group.index()]
    }
}

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

/// Shared application state passed to all route handlers and the checker.
///
/// Each mutable resource sits behind its own lock: ingestion and control
/// mutations touch disjoint state and never contend.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<GuardDb>,
    pub control: Arc<Mutex<ControlCenter>>,
    pub alert_gate: Arc<Mutex<AlertGate>>,
    pub history: Arc<Mutex<HistoryBuffer>>,
    pub readings_tx: broadcast::Sender<Reading>,
    pub notifier: Option<Arc<Notifier>>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: GuardDb, config: Config, notifier: Option<Notifier>) -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            db: Arc::new(db),
            control: Arc::new(Mutex::new(ControlCenter::default())),
            alert_gate: Arc::new(Mutex::new(AlertGate::new())),
            history: Arc::new(Mutex::new(HistoryBuffer::new(config.max_history))),
            readings_tx: tx,
            notifier: notifier.map(Arc::new),
            config: Arc::new(config),
        }
    }

    /// Fetch a group's schedule from the store, failing open to `None` on
    /// any store error so control resolution never stalls on storage.
    pub async fn schedule_for(&self, group: GroupId) -> Option<Schedule> {
        let db = self.db.clone();
        let result = tokio::task::spawn_blocking(move || db.schedule(group)).await;
        match result {
            Ok(Ok(schedule)) => schedule,
            Ok(Err(e)) => {
                tracing::warn!("schedule lookup failed for group {group}: {e}; treating as none");
                None
            }
            Err(e) => {
                tracing::warn!("schedule lookup task failed for group {group}: {e}");
                None
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_detects_changes() {
        let mut center = ControlCenter::default();
        assert_eq!(center.applied(GroupId::One), EffectiveCommand::Auto);

        assert!(center.apply(GroupId::One, EffectiveCommand::On));
        assert!(!center.apply(GroupId::One, EffectiveCommand::On));
        assert!(center.apply(GroupId::One, EffectiveCommand::Auto));
        assert_eq!(center.applied(GroupId::Two), EffectiveCommand::Auto);
    }

    #[test]
    fn resolve_uses_current_manual_mode() {
        let mut center = ControlCenter::default();
        center.set_mode(GroupId::One, ControlMode::ForceOn);
        let cmd = center.resolve(GroupId::One, None, Local::now());
        assert_eq!(cmd, EffectiveCommand::On);

        center.set_mode(GroupId::One, ControlMode::Auto);
        let cmd = center.resolve(GroupId::One, None, Local::now());
        assert_eq!(cmd, EffectiveCommand::Auto);
    }
}
