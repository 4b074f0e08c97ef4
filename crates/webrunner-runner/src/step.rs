//! Step execution: one named group of commands, run in order.

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;

use std::time::Instant;

use tracing::{debug, warn};

use webrunner_protocols::{PageDriver, Step, StepResult};

use crate::executor::CommandExecutor;

/// Runs one step's commands sequentially and produces its [`StepResult`].
///
/// The first failing command aborts the step; remaining commands in the
/// step are not attempted. Duration is wall-clock, including any time
/// spent waiting inside commands.
#[derive(Debug, Clone, Default)]
pub struct StepRunner {
    executor: CommandExecutor,
}

impl StepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn run_step(
        &self,
        driver: &dyn PageDriver,
        step: &Step,
        start_url: Option<&str>,
    ) -> StepResult {
        debug!(step = %step.name, commands = step.commands.len(), "running step");
        let started = Instant::now();

        for command in &step.commands {
            if let Err(error) = self.executor.execute(driver, command, start_url).await {
                warn!(step = %step.name, command = %command, %error, "step failed");
                return StepResult::failed(
                    &step.name,
                    started.elapsed().as_secs_f64(),
                    error.to_string(),
                );
            }
        }

        StepResult::completed(&step.name, started.elapsed().as_secs_f64())
    }
}
