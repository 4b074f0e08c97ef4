//! Test execution engine.
//!
//! Three layers, each isolating the failures of the one below:
//! [`CommandExecutor`] runs one browser instruction, [`StepRunner`] runs
//! one named step's commands in order, [`TestRunner`] owns the session
//! lifecycle and aggregates step results into the final
//! [`webrunner_protocols::TestResult`].

pub mod executor;
pub mod mock;
pub mod runner;
pub mod step;

pub use executor::CommandExecutor;
pub use runner::{TestRunner, TestRunnerConfig};
pub use step::StepRunner;
