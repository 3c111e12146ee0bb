use axum::extract::State;
use axum::Json;
use chrono::Local;

use gasguard_core::types::{ControlMode, GroupId};

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/control — current manual control state.
pub async fn get_control(State(app): State<AppState>) -> Json<serde_json::Value> {
    let state = app.control.lock().unwrap().state.clone();
    Json(serde_json::json!({
        "success": true,
        "state": state,
    }))
}

#[derive(serde::Deserialize)]
pub struct SetControlBody {
    pub group: u8,
    pub mode: String,
}

/// POST /api/control — operator sets a group's manual mode.
///
/// Updates the control state and resolves the effective command
/// immediately, so the next device poll already sees the new intent.
pub async fn set_control(
    State(app): State<AppState>,
    Json(body): Json<SetControlBody>,
) -> Result<Json<serde_json::Value>, AppError> {
    let group = GroupId::try_from(body.group)?;
    let mode = body.mode.parse::<ControlMode>()?;

    let schedule = app.schedule_for(group).await;
    let state = {
        let mut control = app.control.lock().unwrap();
        control.set_mode(group, mode);
        let command = control.resolve(group, schedule.as_ref(), Local::now());
        control.apply(group, command);
        control.state.clone()
    };

    tracing::info!("operator set group {group} to {mode}");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": format!("group {group} set to {mode}"),
        "state": state,
    })))
}
