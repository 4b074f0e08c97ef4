//! Route definitions.

#[cfg(test)]
#[path = "routes_tests.rs"]
mod tests;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{execute_test, health};
use crate::state::AppState;

/// Build the router:
///
/// ```text
/// GET  /health              - liveness probe
/// POST /execute/{test_id}   - run one test now
/// ```
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/execute/{test_id}", post(execute_test))
        .with_state(state)
}
