use chrono::{DateTime, Datelike, Local, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GuardError, Result};
use crate::types::{EffectiveCommand, GroupId};

// ---------------------------------------------------------------------------
// SlotAction
// ---------------------------------------------------------------------------

/// What a time slot does while it is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotAction {
    On,
    Off,
}

impl SlotAction {
    pub fn command(self) -> EffectiveCommand {
        match self {
            SlotAction::On => EffectiveCommand::On,
            SlotAction::Off => EffectiveCommand::Off,
        }
    }
}

// ---------------------------------------------------------------------------
// TimeSlot
// ---------------------------------------------------------------------------

/// A daily time range with an ON/OFF action. Times are "HH:mm" (24h).
/// An `end` before `start` wraps past midnight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
    pub action: SlotAction,
}

/// Parse "HH:mm" into minutes since midnight.
pub fn parse_hhmm(s: &str) -> Result<u16> {
    let invalid = || GuardError::InvalidTimeFormat(s.to_string());

    let (h, m) = s.split_once(':').ok_or_else(invalid)?;
    if h.len() != 2 || m.len() != 2 {
        return Err(invalid());
    }
    let hour: u16 = h.parse().map_err(|_| invalid())?;
    let minute: u16 = m.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    Ok(hour * 60 + minute)
}

/// Range containment in minutes-since-midnight, inclusive on both ends.
/// When `end < start` the range wraps past midnight: [start, 1440) ∪ [0, end].
pub fn time_in_range(t: u16, start: u16, end: u16) -> bool {
    if end < start {
        t >= start || t <= end
    } else {
        t >= start && t <= end
    }
}

// ---------------------------------------------------------------------------
// Schedule
// ---------------------------------------------------------------------------

/// Per-group schedule. At most one exists per group; the store enforces
/// this structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub group: GroupId,
    pub enabled: bool,
    pub time_slots: Vec<TimeSlot>,
    /// Days the schedule applies, 0-6 with 0 = Sunday.
    pub days_of_week: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Schedule {
    pub fn new(
        group: GroupId,
        enabled: bool,
        time_slots: Vec<TimeSlot>,
        days_of_week: Vec<u8>,
    ) -> Result<Self> {
        let schedule = Self {
            group,
            enabled,
            time_slots,
            days_of_week,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> Result<()> {
        if self.time_slots.is_empty() {
            return Err(GuardError::InvalidSchedule(
                "at least one time slot is required".into(),
            ));
        }
        if self.days_of_week.is_empty() {
            return Err(GuardError::InvalidSchedule(
                "at least one day of week is required".into(),
            ));
        }
        if let Some(d) = self.days_of_week.iter().find(|d| **d > 6) {
            return Err(GuardError::InvalidSchedule(format!(
                "day of week out of range: {d} (expected 0-6)"
            )));
        }
        for slot in &self.time_slots {
            parse_hhmm(&slot.start)?;
            parse_hhmm(&slot.end)?;
        }
        Ok(())
    }

    /// Evaluate the schedule at the given day-of-week (0 = Sunday) and
    /// minutes since midnight.
    ///
    /// Returns the action of the first matching slot in storage order.
    /// Overlapping slots have no precedence beyond that; they are accepted,
    /// not validated.
    pub fn evaluate_at(&self, weekday_sun0: u8, minutes: u16) -> Option<SlotAction> {
        if !self.enabled {
            return None;
        }
        if !self.days_of_week.contains(&weekday_sun0) {
            return None;
        }
        for slot in &self.time_slots {
            // Slots were validated on write; a malformed stored slot just
            // never matches.
            let (Ok(start), Ok(end)) = (parse_hhmm(&slot.start), parse_hhmm(&slot.end)) else {
                continue;
            };
            if time_in_range(minutes, start, end) {
                return Some(slot.action);
            }
        }
        None
    }

    /// Evaluate against a local wall-clock timestamp.
    pub fn evaluate(&self, now: DateTime<Local>) -> Option<SlotAction> {
        let weekday = now.weekday().num_days_from_sunday() as u8;
        let minutes = (now.hour() * 60 + now.minute()) as u16;
        self.evaluate_at(weekday, minutes)
    }
}

/// Evaluate an optional schedule: absent means no scheduled action.
pub fn evaluate(schedule: Option<&Schedule>, now: DateTime<Local>) -> Option<SlotAction> {
    schedule.and_then(|s| s.evaluate(now))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(start: &str, end: &str, action: SlotAction) -> TimeSlot {
        TimeSlot {
            start: start.into(),
            end: end.into(),
            action,
        }
    }

    fn schedule_with(slots: Vec<TimeSlot>, days: Vec<u8>) -> Schedule {
        Schedule::new(GroupId::One, true, slots, days).unwrap()
    }

    fn all_days() -> Vec<u8> {
        (0..=6).collect()
    }

    #[test]
    fn parse_hhmm_valid() {
        assert_eq!(parse_hhmm("00:00").unwrap(), 0);
        assert_eq!(parse_hhmm("08:30").unwrap(), 510);
        assert_eq!(parse_hhmm("23:59").unwrap(), 1439);
    }

    #[test]
    fn parse_hhmm_invalid() {
        for s in ["24:00", "12:60", "8:30", "08:5", "0830", "ab:cd", ""] {
            assert!(parse_hhmm(s).is_err(), "expected error for {s:?}");
        }
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let start = parse_hhmm("08:00").unwrap();
        let end = parse_hhmm("18:00").unwrap();
        assert!(time_in_range(parse_hhmm("08:00").unwrap(), start, end));
        assert!(time_in_range(parse_hhmm("18:00").unwrap(), start, end));
        assert!(!time_in_range(parse_hhmm("07:59").unwrap(), start, end));
        assert!(!time_in_range(parse_hhmm("18:01").unwrap(), start, end));
    }

    #[test]
    fn overnight_range_wraps_past_midnight() {
        let start = parse_hhmm("22:00").unwrap();
        let end = parse_hhmm("06:00").unwrap();
        assert!(time_in_range(parse_hhmm("23:30").unwrap(), start, end));
        assert!(time_in_range(parse_hhmm("05:59").unwrap(), start, end));
        assert!(time_in_range(parse_hhmm("22:00").unwrap(), start, end));
        assert!(time_in_range(parse_hhmm("06:00").unwrap(), start, end));
        assert!(!time_in_range(parse_hhmm("12:00").unwrap(), start, end));
    }

    #[test]
    fn evaluate_overnight_slot() {
        let s = schedule_with(vec![slot("22:00", "06:00", SlotAction::On)], all_days());
        assert_eq!(s.evaluate_at(3, parse_hhmm("23:30").unwrap()), Some(SlotAction::On));
        assert_eq!(s.evaluate_at(3, parse_hhmm("05:59").unwrap()), Some(SlotAction::On));
        assert_eq!(s.evaluate_at(3, parse_hhmm("12:00").unwrap()), None);
    }

    #[test]
    fn evaluate_skips_days_not_in_schedule() {
        // Monday (1) only
        let s = schedule_with(vec![slot("08:00", "18:00", SlotAction::On)], vec![1]);
        assert_eq!(s.evaluate_at(1, 600), Some(SlotAction::On));
        assert_eq!(s.evaluate_at(2, 600), None);
        assert_eq!(s.evaluate_at(0, 600), None);
    }

    #[test]
    fn disabled_schedule_never_matches() {
        let mut s = schedule_with(vec![slot("00:00", "23:59", SlotAction::On)], all_days());
        s.enabled = false;
        assert_eq!(s.evaluate_at(0, 600), None);
    }

    #[test]
    fn first_matching_slot_wins() {
        let s = schedule_with(
            vec![
                slot("08:00", "12:00", SlotAction::On),
                slot("10:00", "14:00", SlotAction::Off),
            ],
            all_days(),
        );
        // 11:00 is inside both; storage order decides.
        assert_eq!(s.evaluate_at(1, parse_hhmm("11:00").unwrap()), Some(SlotAction::On));
        // 13:00 only matches the second.
        assert_eq!(s.evaluate_at(1, parse_hhmm("13:00").unwrap()), Some(SlotAction::Off));
    }

    #[test]
    fn absent_schedule_evaluates_to_none() {
        assert_eq!(evaluate(None, Local::now()), None);
    }

    #[test]
    fn new_rejects_empty_slots_and_days() {
        assert!(Schedule::new(GroupId::One, true, vec![], all_days()).is_err());
        assert!(Schedule::new(
            GroupId::One,
            true,
            vec![slot("08:00", "18:00", SlotAction::On)],
            vec![]
        )
        .is_err());
    }

    #[test]
    fn new_rejects_bad_times_and_days() {
        assert!(Schedule::new(
            GroupId::One,
            true,
            vec![slot("25:00", "18:00", SlotAction::On)],
            all_days()
        )
        .is_err());
        assert!(Schedule::new(
            GroupId::One,
            true,
            vec![slot("08:00", "18:00", SlotAction::On)],
            vec![7]
        )
        .is_err());
    }
}
