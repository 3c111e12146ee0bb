use axum::extract::{Query, State};
use axum::Json;

use gasguard_core::schedule::{Schedule, TimeSlot};
use gasguard_core::types::GroupId;
use gasguard_core::GuardError;

use crate::error::AppError;
use crate::state::AppState;

#[derive(serde::Deserialize)]
pub struct GroupQuery {
    pub group: Option<u8>,
}

/// GET /api/schedules[?group=] — list stored schedules.
pub async fn list_schedules(
    State(app): State<AppState>,
    Query(query): Query<GroupQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let group = query.group.map(GroupId::try_from).transpose()?;

    let db = app.db.clone();
    let schedules = tokio::task::spawn_blocking(move || match group {
        Some(g) => Ok::<_, GuardError>(db.schedule(g)?.into_iter().collect::<Vec<_>>()),
        None => db.list_schedules(),
    })
    .await
    .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": schedules,
    })))
}

#[derive(serde::Deserialize)]
pub struct CreateScheduleBody {
    pub group: u8,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub time_slots: Vec<TimeSlot>,
    pub days_of_week: Vec<u8>,
}

fn default_enabled() -> bool {
    true
}

/// POST /api/schedules — create or replace the schedule for a group.
///
/// The store is keyed by group, so this is an upsert: any prior schedule
/// for the group is replaced atomically.
pub async fn upsert_schedule(
    State(app): State<AppState>,
    Json(body): Json<CreateScheduleBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let group = GroupId::try_from(body.group)?;
    let schedule = Schedule::new(group, body.enabled, body.time_slots, body.days_of_week)?;

    let db = app.db.clone();
    let stored = tokio::task::spawn_blocking(move || db.upsert_schedule(&schedule))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    tracing::info!("schedule for group {group} replaced");

    Ok(Json(serde_json::json!({
        "success": true,
        "data": stored,
    })))
}

#[derive(serde::Deserialize)]
pub struct DeleteQuery {
    pub group: u8,
}

/// DELETE /api/schedules?group= — remove a group's schedule.
pub async fn delete_schedule(
    State(app): State<AppState>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let group = GroupId::try_from(query.group)?;

    let db = app.db.clone();
    let existed = tokio::task::spawn_blocking(move || db.delete_schedule(group))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;

    if !existed {
        return Err(GuardError::ScheduleNotFound(group.number()).into());
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("schedule for group {group} deleted"),
    })))
}
