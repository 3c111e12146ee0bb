use chrono::{DateTime, Local};
use serde::Serialize;

use crate::schedule::Schedule;
use crate::types::{ControlMode, EffectiveCommand, GroupId};

// ---------------------------------------------------------------------------
// OverrideTracker
// ---------------------------------------------------------------------------

/// Tracks whether each group currently has an active manual override.
///
/// The flag is set whenever a group's manual mode leaves `auto` and cleared
/// when it returns, and only `Coordinator::resolve` transitions it. While
/// set, schedule evaluation for that group is suppressed.
#[derive(Debug, Default, Clone)]
pub struct OverrideTracker {
    flags: [bool; 2],
}

impl OverrideTracker {
    pub fn is_active(&self, group: GroupId) -> bool {
        self.flags[group.index()]
    }

    fn set(&mut self, group: GroupId) {
        self.flags[group.index()] = true;
    }

    fn clear(&mut self, group: GroupId) {
        self.flags[group.index()] = false;
    }
}

// ---------------------------------------------------------------------------
// ControlState
// ---------------------------------------------------------------------------

/// Process-wide manual intent per group, plus the last effective command the
/// checker applied. Initialized to AUTO/AUTO at startup; intentionally not
/// persisted (a restart returns both groups to automatic control).
#[derive(Debug, Clone, Serialize)]
pub struct ControlState {
    pub group1: ControlMode,
    pub group2: ControlMode,
}

impl Default for ControlState {
    fn default() -> Self {
        Self {
            group1: ControlMode::Auto,
            group2: ControlMode::Auto,
        }
    }
}

impl ControlState {
    pub fn mode(&self, group: GroupId) -> ControlMode {
        match group {
            GroupId::One => self.group1,
            GroupId::Two => self.group2,
        }
    }

    pub fn set_mode(&mut self, group: GroupId, mode: ControlMode) {
        match group {
            GroupId::One => self.group1 = mode,
            GroupId::Two => self.group2 = mode,
        }
    }
}

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Owns the authority-precedence policy: manual override beats schedule
/// beats automatic. This is the single place the override flags transition.
#[derive(Debug, Default)]
pub struct Coordinator {
    overrides: OverrideTracker,
}

impl Coordinator {
    /// Resolve the effective command for a group given its manual mode and
    /// the group's schedule (already fetched by the caller; `None` when the
    /// store has nothing or was unreachable — fail open to automatic).
    ///
    /// Idempotent: repeated calls with the same mode leave the override
    /// flag in the same state.
    pub fn resolve(
        &mut self,
        group: GroupId,
        manual_mode: ControlMode,
        schedule: Option<&Schedule>,
        now: DateTime<Local>,
    ) -> EffectiveCommand {
        match manual_mode {
            ControlMode::ForceOn => {
                self.overrides.set(group);
                EffectiveCommand::On
            }
            ControlMode::ForceOff => {
                self.overrides.set(group);
                EffectiveCommand::Off
            }
            ControlMode::Auto => {
                self.overrides.clear(group);
                match crate::schedule::evaluate(schedule, now) {
                    Some(action) => action.command(),
                    None => EffectiveCommand::Auto,
                }
            }
        }
    }

    pub fn override_active(&self, group: GroupId) -> bool {
        self.overrides.is_active(group)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
