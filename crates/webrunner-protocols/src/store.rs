//! Backend job store seam.

use async_trait::async_trait;

use crate::error::BackendError;
use crate::model::Test;
use crate::result::StatusUpdate;

/// The backend that owns test definitions and status persistence.
///
/// This worker only reads tests and writes status updates; it never
/// creates or deletes tests.
#[async_trait]
pub trait TestStore: Send + Sync {
    /// Fetch all tests. The poller filters to `pending` locally; no
    /// server-side filter is assumed.
    async fn list_tests(&self) -> Result<Vec<Test>, BackendError>;

    /// Fetch one test by id.
    async fn get_test(&self, id: &str) -> Result<Test, BackendError>;

    /// Report a status change or final result.
    async fn update_status(&self, id: &str, update: &StatusUpdate) -> Result<(), BackendError>;
}
