//! Execution results reported back to the backend.

#[cfg(test)]
#[path = "result_tests.rs"]
mod tests;

use serde::{Deserialize, Serialize};

use crate::model::TestStatus;

/// Outcome of one step.
///
/// `none` means the step never started executing (placeholder, or the
/// session failed to start); `skipped` means an earlier step failed and
/// this one was deliberately not attempted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    #[default]
    None,
    Completed,
    Failed,
    Skipped,
}

/// Per-step result. One per step, created at test start and overwritten
/// in place as the step completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepResult {
    pub name: String,
    pub status: StepStatus,
    /// Wall-clock duration in seconds, 0 when the step never ran.
    pub duration_secs: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepResult {
    /// Placeholder created before the step runs.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::None,
            duration_secs: 0.0,
            error: None,
        }
    }

    pub fn completed(name: impl Into<String>, duration_secs: f64) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Completed,
            duration_secs,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, duration_secs: f64, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: StepStatus::Failed,
            duration_secs,
            error: Some(error.into()),
        }
    }

    /// Mark a placeholder as skipped after an earlier step failed.
    pub fn skip(&mut self) {
        self.status = StepStatus::Skipped;
    }
}

/// Final result of one test execution. Produced exactly once, immutable
/// after construction; this is what goes back to the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub test_id: String,
    pub status: TestStatus,
    /// Total wall-clock execution time in seconds.
    pub execution_time_secs: f64,
    pub steps: Vec<StepResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TestResult {
    pub fn completed(
        test_id: impl Into<String>,
        execution_time_secs: f64,
        steps: Vec<StepResult>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            status: TestStatus::Completed,
            execution_time_secs,
            steps,
            error: None,
        }
    }

    pub fn failed(
        test_id: impl Into<String>,
        execution_time_secs: f64,
        steps: Vec<StepResult>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            test_id: test_id.into(),
            status: TestStatus::Failed,
            execution_time_secs,
            steps,
            error: Some(error.into()),
        }
    }
}

/// Body of `PUT /tests/{id}/status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdate {
    pub status: TestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<StepResult>>,
}

impl StatusUpdate {
    /// Bare status change with no result payload (the `MARK_RUNNING` claim).
    pub fn running() -> Self {
        Self {
            status: TestStatus::Running,
            execution_time: None,
            error: None,
            steps: None,
        }
    }
}

impl From<&TestResult> for StatusUpdate {
    fn from(result: &TestResult) -> Self {
        Self {
            status: result.status,
            execution_time: Some(result.execution_time_secs),
            error: result.error.clone(),
            steps: Some(result.steps.clone()),
        }
    }
}
