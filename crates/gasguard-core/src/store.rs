//! Durable storage for schedules and the alert log, backed by redb.
//!
//! # Table design
//!
//! `schedules` is keyed by the group number, so there is structurally at
//! most one schedule per group and create is an upsert — no
//! delete-then-insert window between concurrent writers.
//!
//! `alerts` uses a 24-byte composite key:
//! ```text
//! [ captured_at_ms: u64 big-endian (8 bytes) | uuid: 16 bytes ]
//! ```
//! With the timestamp in the high bytes, byte order equals capture order,
//! so a reverse iteration yields newest-first without sorting.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableTable, TableDefinition};
use uuid::Uuid;

use crate::error::{GuardError, Result};
use crate::reading::Reading;
use crate::schedule::Schedule;
use crate::types::GroupId;

// ---------------------------------------------------------------------------
// Table definitions
// ---------------------------------------------------------------------------

/// Key: group number (1 or 2). Value: JSON-encoded Schedule.
const SCHEDULES: TableDefinition<u8, &[u8]> = TableDefinition::new("schedules");

/// Key: 24-byte composite (captured_at_ms big-endian ++ uuid bytes).
/// Value: JSON-encoded Reading.
const ALERTS: TableDefinition<&[u8], &[u8]> = TableDefinition::new("alerts");

fn alert_key(ts: DateTime<Utc>, id: Uuid) -> [u8; 24] {
    let mut key = [0u8; 24];
    let ms = ts.timestamp_millis().max(0) as u64;
    key[..8].copy_from_slice(&ms.to_be_bytes());
    key[8..].copy_from_slice(id.as_bytes());
    key
}

fn store_err(e: impl std::fmt::Display) -> GuardError {
    GuardError::Store(e.to_string())
}

// ---------------------------------------------------------------------------
// GuardDb
// ---------------------------------------------------------------------------

/// Durable store for schedules and alert-worthy readings.
pub struct GuardDb {
    db: Database,
}

impl GuardDb {
    /// Open or create the redb database at `path`.
    ///
    /// Creates both tables if they don't already exist.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Database::create(path).map_err(store_err)?;
        let wt = db.begin_write().map_err(store_err)?;
        wt.open_table(SCHEDULES).map_err(store_err)?;
        wt.open_table(ALERTS).map_err(store_err)?;
        wt.commit().map_err(store_err)?;
        Ok(Self { db })
    }

    // -----------------------------------------------------------------------
    // Schedules
    // -----------------------------------------------------------------------

    /// Insert or replace the schedule for its group in a single write
    /// transaction. A prior `created_at` is preserved on replace.
    pub fn upsert_schedule(&self, schedule: &Schedule) -> Result<Schedule> {
        let mut stored = schedule.clone();
        stored.updated_at = Utc::now();

        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(SCHEDULES).map_err(store_err)?;
            if let Some(existing) = table.get(stored.group.number()).map_err(store_err)? {
                let prior: Schedule = serde_json::from_slice(existing.value())?;
                stored.created_at = prior.created_at;
            }
            let value = serde_json::to_vec(&stored)?;
            table
                .insert(stored.group.number(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(stored)
    }

    /// The schedule for a group, if one exists.
    pub fn schedule(&self, group: GroupId) -> Result<Option<Schedule>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(SCHEDULES).map_err(store_err)?;
        match table.get(group.number()).map_err(store_err)? {
            Some(v) => Ok(Some(serde_json::from_slice(v.value())?)),
            None => Ok(None),
        }
    }

    /// All stored schedules, ordered by group.
    pub fn list_schedules(&self) -> Result<Vec<Schedule>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(SCHEDULES).map_err(store_err)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(store_err)? {
            let (_, v) = entry.map_err(store_err)?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    /// Remove a group's schedule. Returns true if one existed.
    pub fn delete_schedule(&self, group: GroupId) -> Result<bool> {
        let wt = self.db.begin_write().map_err(store_err)?;
        let existed;
        {
            let mut table = wt.open_table(SCHEDULES).map_err(store_err)?;
            existed = table.remove(group.number()).map_err(store_err)?.is_some();
        }
        wt.commit().map_err(store_err)?;
        Ok(existed)
    }

    // -----------------------------------------------------------------------
    // Alert log
    // -----------------------------------------------------------------------

    /// Append an alert-worthy reading to the durable log.
    pub fn append_alert(&self, reading: &Reading) -> Result<()> {
        let key = alert_key(reading.captured_at, Uuid::new_v4());
        let value = serde_json::to_vec(reading)?;
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(ALERTS).map_err(store_err)?;
            table
                .insert(key.as_slice(), value.as_slice())
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }

    /// Up to `limit` most recent alert readings, newest first.
    pub fn recent_alerts(&self, limit: usize) -> Result<Vec<Reading>> {
        let rt = self.db.begin_read().map_err(store_err)?;
        let table = rt.open_table(ALERTS).map_err(store_err)?;
        let mut result = Vec::new();
        for entry in table.iter().map_err(store_err)?.rev().take(limit) {
            let (_, v) = entry.map_err(store_err)?;
            result.push(serde_json::from_slice(v.value())?);
        }
        Ok(result)
    }

    /// Delete the entire alert log.
    pub fn clear_alerts(&self) -> Result<()> {
        let wt = self.db.begin_write().map_err(store_err)?;
        {
            let mut table = wt.open_table(ALERTS).map_err(store_err)?;
            table
                .retain(|_, _| false)
                .map_err(store_err)?;
        }
        wt.commit().map_err(store_err)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
