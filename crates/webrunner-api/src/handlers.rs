//! Request handlers.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use tracing::{info, warn};

use webrunner_protocols::{BackendError, StatusUpdate, TestResult};

use crate::error::ApiError;
use crate::state::AppState;

/// `GET /health` - liveness probe, no side effects.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// `POST /execute/{test_id}` - fetch the test from the backend, run it
/// immediately, report the result back, and return it to the caller.
pub async fn execute_test(
    State(state): State<Arc<AppState>>,
    Path(test_id): Path<String>,
) -> Result<Json<TestResult>, ApiError> {
    info!(test = %test_id, "on-demand execution requested");

    let test = state.store.get_test(&test_id).await.map_err(|error| match error {
        BackendError::NotFound(id) => ApiError::NotFound(id),
        other => ApiError::Internal(other.to_string()),
    })?;

    // Best-effort claim; a failed status write must not block execution.
    if let Err(error) = state
        .store
        .update_status(&test.id, &StatusUpdate::running())
        .await
    {
        warn!(test = %test.id, %error, "failed to mark test running");
    }

    let result = state.runner.run(&test).await;

    if let Err(error) = state
        .store
        .update_status(&test.id, &StatusUpdate::from(&result))
        .await
    {
        warn!(test = %test.id, %error, "failed to report result");
    }

    Ok(Json(result))
}
