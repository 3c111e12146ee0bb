use axum::extract::{Query, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;

/// GET /api/readings/latest — most recent reading, if any.
pub async fn latest_reading(State(app): State<AppState>) -> Json<serde_json::Value> {
    let latest = app.history.lock().unwrap().latest().cloned();
    match latest {
        Some(reading) => Json(serde_json::json!({
            "success": true,
            "data": reading,
        })),
        None => Json(serde_json::json!({
            "success": false,
            "message": "no data available",
        })),
    }
}

#[derive(serde::Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// GET /api/readings/history?limit= — in-memory history, newest first.
pub async fn reading_history(
    State(app): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<serde_json::Value> {
    let history = app.history.lock().unwrap();
    let data = history.recent(query.limit.unwrap_or(history.len()));
    Json(serde_json::json!({
        "success": true,
        "count": data.len(),
        "data": data,
    }))
}

/// GET /api/alerts?limit= — durable alert log, newest first.
///
/// A store failure degrades to an empty list rather than failing the
/// request; the live in-memory path stays authoritative for display.
pub async fn alert_history(
    State(app): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Json<serde_json::Value> {
    let limit = query.limit.unwrap_or(100);
    let db = app.db.clone();
    let data = match tokio::task::spawn_blocking(move || db.recent_alerts(limit)).await {
        Ok(Ok(alerts)) => alerts,
        Ok(Err(e)) => {
            tracing::warn!("alert history read failed: {e}");
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("alert history task failed: {e}");
            Vec::new()
        }
    };

    Json(serde_json::json!({
        "success": true,
        "count": data.len(),
        "data": data,
    }))
}

/// POST /api/readings/clear — wipe the in-memory history and the durable
/// alert log.
pub async fn clear_history(
    State(app): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    app.history.lock().unwrap().clear();

    let db = app.db.clone();
    match tokio::task::spawn_blocking(move || db.clear_alerts()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::warn!("alert log clear failed: {e}"),
        Err(e) => tracing::warn!("alert log clear task failed: {e}"),
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "history cleared",
    })))
}
