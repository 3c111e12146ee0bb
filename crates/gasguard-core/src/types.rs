use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// GroupId
// ---------------------------------------------------------------------------

/// One of the two independently controlled actuator channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum GroupId {
    One,
    Two,
}

impl GroupId {
    pub fn all() -> &'static [GroupId] {
        &[GroupId::One, GroupId::Two]
    }

    pub fn number(self) -> u8 {
        match self {
            GroupId::One => 1,
            GroupId::Two => 2,
        }
    }

    /// Zero-based index for per-group arrays.
    pub fn index(self) -> usize {
        (self.number() - 1) as usize
    }
}

impl TryFrom<u8> for GroupId {
    type Error = crate::error::GuardError;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(GroupId::One),
            2 => Ok(GroupId::Two),
            other => Err(crate::error::GuardError::InvalidGroup(other)),
        }
    }
}

impl From<GroupId> for u8 {
    fn from(g: GroupId) -> u8 {
        g.number()
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

// ---------------------------------------------------------------------------
// AlertLevel
// ---------------------------------------------------------------------------

/// Alert lamp level reported by the device per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertLevel {
    Safe,
    Warn,
    Danger,
}

impl AlertLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertLevel::Safe => "SAFE",
            AlertLevel::Warn => "WARN",
            AlertLevel::Danger => "DANGER",
        }
    }

    /// True for any level that warrants attention.
    pub fn is_alert(self) -> bool {
        !matches!(self, AlertLevel::Safe)
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SwitchState
// ---------------------------------------------------------------------------

/// Reported ON/OFF state of a relay-driven actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SwitchState {
    On,
    Off,
}

impl fmt::Display for SwitchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwitchState::On => "ON",
            SwitchState::Off => "OFF",
        })
    }
}

// ---------------------------------------------------------------------------
// ControlMode
// ---------------------------------------------------------------------------

/// Manual intent for a group, set by an operator. `Auto` hands control to
/// the schedule (if any) or the device itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    Auto,
    ForceOff,
    ForceOn,
}

impl ControlMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlMode::Auto => "auto",
            ControlMode::ForceOff => "force_off",
            ControlMode::ForceOn => "force_on",
        }
    }
}

impl fmt::Display for ControlMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ControlMode {
    type Err = crate::error::GuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ControlMode::Auto),
            "force_off" => Ok(ControlMode::ForceOff),
            "force_on" => Ok(ControlMode::ForceOn),
            _ => Err(crate::error::GuardError::InvalidMode(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// EffectiveCommand
// ---------------------------------------------------------------------------

/// The actuator instruction actually handed to the device after resolving
/// manual/schedule/auto precedence. Derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectiveCommand {
    Auto,
    Off,
    On,
}

impl EffectiveCommand {
    pub fn as_str(self) -> &'static str {
        match self {
            EffectiveCommand::Auto => "auto",
            EffectiveCommand::Off => "off",
            EffectiveCommand::On => "on",
        }
    }
}

impl fmt::Display for EffectiveCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
