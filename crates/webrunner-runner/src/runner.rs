//! Whole-test execution: session lifecycle plus step aggregation.

#[cfg(test)]
#[path = "runner_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use webrunner_protocols::{PageDriver, SessionFactory, StepResult, StepStatus, Test, TestResult};

use crate::step::StepRunner;

/// Default wall-clock limit for one whole test.
pub const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(300);

#[derive(Debug, Clone)]
pub struct TestRunnerConfig {
    /// Wall-clock limit for one test, `None` to run unbounded.
    pub test_timeout: Option<Duration>,
}

impl Default for TestRunnerConfig {
    fn default() -> Self {
        Self {
            test_timeout: Some(DEFAULT_TEST_TIMEOUT),
        }
    }
}

/// Runs one test end to end: acquires a browser session, runs every step
/// through [`StepRunner`], closes the session, and folds the step results
/// into a [`TestResult`].
///
/// The returned result always carries exactly one [`StepResult`] per step
/// of the test, in test order, whatever happened during execution.
pub struct TestRunner {
    sessions: Arc<dyn SessionFactory>,
    steps: StepRunner,
    config: TestRunnerConfig,
}

impl TestRunner {
    pub fn new(sessions: Arc<dyn SessionFactory>) -> Self {
        Self::with_config(sessions, TestRunnerConfig::default())
    }

    pub fn with_config(sessions: Arc<dyn SessionFactory>, config: TestRunnerConfig) -> Self {
        Self {
            sessions,
            steps: StepRunner::new(),
            config,
        }
    }

    pub async fn run(&self, test: &Test) -> TestResult {
        info!(test = %test.id, steps = test.steps.len(), "running test");
        let started = Instant::now();
        let mut results: Vec<StepResult> = test
            .steps
            .iter()
            .map(|step| StepResult::pending(&step.name))
            .collect();

        let driver = match self.sessions.acquire().await {
            Ok(driver) => driver,
            Err(error) => {
                warn!(test = %test.id, %error, "browser session failed");
                return TestResult::failed(
                    &test.id,
                    started.elapsed().as_secs_f64(),
                    results,
                    format!("browser session failed: {}", error),
                );
            }
        };

        let failure = match self.config.test_timeout {
            Some(limit) => {
                let steps = self.run_steps(driver.as_ref(), test, &mut results);
                match tokio::time::timeout(limit, steps).await {
                    Ok(failure) => failure,
                    Err(_) => {
                        // The in-flight step future was dropped; steps that
                        // never ran stay at `None`.
                        warn!(test = %test.id, "test timed out");
                        driver.close().await;
                        return TestResult::failed(
                            &test.id,
                            started.elapsed().as_secs_f64(),
                            results,
                            format!("test timed out after {}s", limit.as_secs()),
                        );
                    }
                }
            }
            None => self.run_steps(driver.as_ref(), test, &mut results).await,
        };

        driver.close().await;
        let execution_time = started.elapsed().as_secs_f64();

        match failure {
            Some(error) => {
                info!(test = %test.id, %error, "test failed");
                TestResult::failed(&test.id, execution_time, results, error)
            }
            None => {
                info!(test = %test.id, execution_time, "test completed");
                TestResult::completed(&test.id, execution_time, results)
            }
        }
    }

    /// Run the steps in order, recording each result in place. Returns
    /// the first failure's error; steps after it are marked skipped.
    async fn run_steps(
        &self,
        driver: &dyn PageDriver,
        test: &Test,
        results: &mut [StepResult],
    ) -> Option<String> {
        let mut failure: Option<String> = None;

        for (i, step) in test.steps.iter().enumerate() {
            if failure.is_some() {
                results[i].skip();
                continue;
            }

            let result = self
                .steps
                .run_step(driver, step, test.start_url.as_deref())
                .await;
            if result.status == StepStatus::Failed {
                failure = Some(
                    result
                        .error
                        .clone()
                        .unwrap_or_else(|| format!("step '{}' failed", step.name)),
                );
            }
            results[i] = result;
        }

        failure
    }
}
