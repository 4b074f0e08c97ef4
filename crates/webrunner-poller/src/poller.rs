//! The poll/dispatch loop.

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use webrunner_protocols::{BackendError, StatusUpdate, Test, TestStatus, TestStore};
use webrunner_runner::TestRunner;

#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Time between poll iterations.
    pub interval: Duration,
    /// Startup probe attempts before giving up on the backend.
    pub startup_retries: u32,
    /// Delay between startup probe attempts.
    pub startup_delay: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            startup_retries: 5,
            startup_delay: Duration::from_secs(5),
        }
    }
}

/// Fixed-interval poll loop.
///
/// Each iteration fetches all tests, filters the pending ones locally,
/// and dispatches them strictly in order. Failures never escape an
/// iteration: a backend fault is logged and the next tick retries.
pub struct Poller {
    store: Arc<dyn TestStore>,
    runner: Arc<TestRunner>,
    config: PollerConfig,
}

impl Poller {
    pub fn new(store: Arc<dyn TestStore>, runner: Arc<TestRunner>) -> Self {
        Self::with_config(store, runner, PollerConfig::default())
    }

    pub fn with_config(
        store: Arc<dyn TestStore>,
        runner: Arc<TestRunner>,
        config: PollerConfig,
    ) -> Self {
        Self {
            store,
            runner,
            config,
        }
    }

    /// Probe the backend until it answers, up to the configured number of
    /// attempts. Returns the last error when every attempt fails.
    pub async fn wait_for_backend(&self) -> Result<(), BackendError> {
        let mut last = BackendError::Http("no probe attempts configured".to_string());
        for attempt in 1..=self.config.startup_retries {
            match self.store.list_tests().await {
                Ok(_) => {
                    info!(attempt, "backend is reachable");
                    return Ok(());
                }
                Err(error) => {
                    warn!(
                        attempt,
                        retries = self.config.startup_retries,
                        %error,
                        "backend not ready"
                    );
                    last = error;
                }
            }
            if attempt < self.config.startup_retries {
                tokio::time::sleep(self.config.startup_delay).await;
            }
        }
        Err(last)
    }

    /// One poll iteration. Returns how many tests were dispatched.
    pub async fn run_once(&self) -> Result<usize, BackendError> {
        let tests = self.store.list_tests().await?;
        let pending: Vec<Test> = tests
            .into_iter()
            .filter(|test| test.status == TestStatus::Pending)
            .collect();

        if pending.is_empty() {
            debug!("no pending tests");
            return Ok(0);
        }

        info!(count = pending.len(), "dispatching pending tests");
        let count = pending.len();
        for test in pending {
            self.dispatch(&test).await;
        }
        Ok(count)
    }

    /// Run forever on the configured interval.
    pub async fn run(&self) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            if let Err(error) = self.run_once().await {
                warn!(%error, "poll iteration failed");
            }
        }
    }

    /// Claim, execute and report one test. The claim is best effort: a
    /// failed `running` update is logged and execution proceeds anyway.
    async fn dispatch(&self, test: &Test) {
        if let Err(error) = self
            .store
            .update_status(&test.id, &StatusUpdate::running())
            .await
        {
            warn!(test = %test.id, %error, "failed to mark test running");
        }

        let result = self.runner.run(test).await;

        if let Err(error) = self
            .store
            .update_status(&test.id, &StatusUpdate::from(&result))
            .await
        {
            warn!(test = %test.id, %error, "failed to report result");
        }
    }
}
