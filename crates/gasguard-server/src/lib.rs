pub mod checker;
pub mod error;
pub mod notify;
pub mod routes;
pub mod state;

use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use crate::checker::ScheduleChecker;
use crate::state::AppState;

/// Build the axum Router with all API routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Device boundary
        .route("/api/device/readings", post(routes::device::ingest_reading))
        .route("/api/device/command", get(routes::device::get_command))
        // Operator control boundary
        .route(
            "/api/control",
            get(routes::control::get_control).post(routes::control::set_control),
        )
        // Schedule boundary
        .route(
            "/api/schedules",
            get(routes::schedules::list_schedules)
                .post(routes::schedules::upsert_schedule)
                .delete(routes::schedules::delete_schedule),
        )
        // Readings and alert log
        .route("/api/readings/latest", get(routes::readings::latest_reading))
        .route(
            "/api/readings/history",
            get(routes::readings::reading_history),
        )
        .route("/api/readings/clear", post(routes::readings::clear_history))
        .route("/api/alerts", get(routes::readings::alert_history))
        // Live boundary (SSE)
        .route("/api/stream", get(routes::stream::sse_stream))
        .layer(cors)
        .with_state(app_state)
}

/// Start the gasguard server: bind the listener, start the schedule
/// checker, and serve until ctrl-c. The checker is stopped before exit so
/// its timer never outlives the process loop.
pub async fn serve(app_state: AppState, port: u16) -> anyhow::Result<()> {
    let checker = ScheduleChecker::new();
    checker.start(
        app_state.clone(),
        Duration::from_secs(app_state.config.poll_interval_secs),
    );

    let app = build_router(app_state);
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("gasguard listening on http://localhost:{port}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    checker.stop();
    Ok(())
}
