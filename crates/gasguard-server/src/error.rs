use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use gasguard_core::GuardError;

// ---------------------------------------------------------------------------
// AppError — unified error type for HTTP responses
// ---------------------------------------------------------------------------

/// Unified error type for HTTP responses. Status codes are derived from the
/// `GuardError` variant in the chain; anything else is a 500.
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = if let Some(e) = self.0.downcast_ref::<GuardError>() {
            match e {
                GuardError::InvalidGroup(_)
                | GuardError::InvalidMode(_)
                | GuardError::InvalidTimeFormat(_)
                | GuardError::InvalidSchedule(_) => StatusCode::BAD_REQUEST,
                GuardError::ScheduleNotFound(_) => StatusCode::NOT_FOUND,
                GuardError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
                GuardError::Io(_) | GuardError::Yaml(_) | GuardError::Json(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            }
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        let body = serde_json::json!({ "error": self.0.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn invalid_group_maps_to_400() {
        let err = AppError(GuardError::InvalidGroup(7).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_mode_maps_to_400() {
        let err = AppError(GuardError::InvalidMode("blast".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_time_format_maps_to_400() {
        let err = AppError(GuardError::InvalidTimeFormat("25:99".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn schedule_not_found_maps_to_404() {
        let err = AppError(GuardError::ScheduleNotFound(1).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn store_error_maps_to_503() {
        let err = AppError(GuardError::Store("db locked".into()).into());
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn non_guard_error_maps_to_500() {
        let err = AppError(anyhow::anyhow!("something unexpected"));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn response_body_is_json_with_error_field() {
        let err = AppError(GuardError::InvalidGroup(9).into());
        let response = err.into_response();
        let ct = response
            .headers()
            .get(axum::http::header::CONTENT_TYPE)
            .expect("should have content-type");
        assert!(
            ct.to_str().unwrap().contains("application/json"),
            "expected JSON content type, got {:?}",
            ct
        );
    }
}
