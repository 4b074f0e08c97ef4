//! HTTP implementation of the backend store.

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;

use webrunner_protocols::{BackendError, StatusUpdate, Test, TestStore};

/// Client for the backend REST API.
///
/// Endpoints: `GET {base}/tests`, `GET {base}/tests/{id}`,
/// `PUT {base}/tests/{id}/status`.
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl TestStore for BackendClient {
    async fn list_tests(&self) -> Result<Vec<Test>, BackendError> {
        let response = self
            .http
            .get(self.url("/tests"))
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        if !response.status().is_success() {
            return Err(BackendError::Http(format!(
                "GET /tests returned {}",
                response.status()
            )));
        }

        let tests: Vec<Test> = response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))?;

        debug!("fetched {} tests from backend", tests.len());
        Ok(tests)
    }

    async fn get_test(&self, id: &str) -> Result<Test, BackendError> {
        let response = self
            .http
            .get(self.url(&format!("/tests/{}", id)))
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(BackendError::Http(format!(
                "GET /tests/{} returned {}",
                id,
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BackendError::InvalidResponse(e.to_string()))
    }

    async fn update_status(&self, id: &str, update: &StatusUpdate) -> Result<(), BackendError> {
        let response = self
            .http
            .put(self.url(&format!("/tests/{}/status", id)))
            .json(update)
            .send()
            .await
            .map_err(|e| BackendError::Http(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(BackendError::NotFound(id.to_string()));
        }
        if !response.status().is_success() {
            return Err(BackendError::Http(format!(
                "PUT /tests/{}/status returned {}",
                id,
                response.status()
            )));
        }

        debug!("reported status {:?} for test {}", update.status, id);
        Ok(())
    }
}
