use axum::extract::State;
use axum::Json;
use chrono::{Local, Utc};

use gasguard_core::reading::ReadingInput;
use gasguard_core::types::GroupId;

use crate::error::AppError;
use crate::notify::format_alert_message;
use crate::state::AppState;

/// POST /api/device/readings — ingest one sensor reading from the device.
///
/// The payload is validated by deserialization and the capture time is
/// stamped here. Notification delivery and the durable alert-log write are
/// best-effort: their failures are logged and never fail the ingestion.
pub async fn ingest_reading(
    State(app): State<AppState>,
    Json(input): Json<ReadingInput>,
) -> Result<Json<serde_json::Value>, AppError> {
    let reading = input.into_reading(Utc::now());

    let notify = {
        let mut gate = app.alert_gate.lock().unwrap();
        gate.should_notify(reading.alert1, reading.alert2)
    };
    if notify {
        if let Some(notifier) = app.notifier.clone() {
            let message = format_alert_message(&reading);
            tokio::spawn(async move {
                if let Err(e) = notifier.send(&message).await {
                    tracing::warn!("notification delivery failed: {e}");
                }
            });
        }
    }

    app.history.lock().unwrap().append(reading.clone());
    // Lagging or absent subscribers are not an ingestion failure.
    let _ = app.readings_tx.send(reading.clone());

    if reading.has_alert() {
        let db = app.db.clone();
        let record = reading.clone();
        match tokio::task::spawn_blocking(move || db.append_alert(&record)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => tracing::warn!("alert log write failed: {e}; continuing in-memory"),
            Err(e) => tracing::warn!("alert log task failed: {e}"),
        }
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "reading accepted",
        "captured_at": reading.captured_at,
    })))
}

/// GET /api/device/command — device polls for its next actuator commands.
///
/// Recomputed through the coordinator on every poll; nothing is cached
/// beyond the control state and override flags.
pub async fn get_command(State(app): State<AppState>) -> Json<serde_json::Value> {
    let schedule1 = app.schedule_for(GroupId::One).await;
    let schedule2 = app.schedule_for(GroupId::Two).await;

    let now = Local::now();
    let (group1, group2) = {
        let mut control = app.control.lock().unwrap();
        (
            control.resolve(GroupId::One, schedule1.as_ref(), now),
            control.resolve(GroupId::Two, schedule2.as_ref(), now),
        )
    };

    Json(serde_json::json!({
        "success": true,
        "group1": group1,
        "group2": group2,
    }))
}
