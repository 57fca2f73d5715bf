//! HTTP surface for the tabular prediction contract.
//!
//! Only the tabular path has a network endpoint; image classification is
//! invoked in-process by callers that already hold decoded bytes. The state
//! holds the inference context as an `Option` so a failed startup load still
//! binds and answers 503 rather than crashing the process.

pub mod routes;

use crate::core::context::InferenceContext;
use crate::core::errors::DermError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    context: Option<Arc<InferenceContext>>,
}

impl AppState {
    /// Creates state around a context that may have failed to load.
    pub fn new(context: Option<Arc<InferenceContext>>) -> Self {
        Self { context }
    }

    /// The loaded context, if startup succeeded.
    pub fn context(&self) -> Option<&Arc<InferenceContext>> {
        self.context.as_ref()
    }
}

/// Builds the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::info))
        .route("/predict", post(routes::predict))
        .with_state(state)
}

/// Error body returned on every failed request.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}

/// Adapter mapping the crate error taxonomy onto HTTP statuses.
#[derive(Debug)]
pub struct ApiError(pub DermError);

impl From<DermError> for ApiError {
    fn from(err: DermError) -> Self {
        Self(err)
    }
}

impl ApiError {
    /// Status for this error: validation failures are the caller's to fix,
    /// missing artifacts are a deployment condition, everything else is an
    /// internal failure.
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DermError::Validation { .. } | DermError::UnsupportedImage(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            DermError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorBody {
            detail: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[test]
    fn error_statuses_follow_the_taxonomy() {
        assert_eq!(
            ApiError(DermError::validation("bad age")).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError(DermError::unavailable("no model")).status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ApiError(DermError::unexpected_output("2 classes", "9 classes")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn info_endpoint_answers_ok() {
        let app = router(AppState::new(None));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn predict_without_context_answers_service_unavailable() {
        let app = router(AppState::new(None));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"age": 55.0}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn predict_rejects_non_numeric_payloads() {
        let app = router(AppState::new(None));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/predict")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"age": "fifty-five"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
