//! HTTP surface for on-demand test execution.
//!
//! Two endpoints: `GET /health` for liveness and `POST /execute/{test_id}`
//! to run one test immediately, outside the poll loop.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use server::{ApiConfig, ApiServer};
pub use state::AppState;
