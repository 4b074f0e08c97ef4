//! # webrunner Protocols
//!
//! Shared definitions for the webrunner test-execution worker.
//! Contains the data model, the error taxonomy, and the trait seams
//! between components - no implementations.
//!
//! ## Core Traits
//!
//! - [`PageDriver`] - One live browser page a test executes against
//! - [`SessionFactory`] - Acquires exclusively-owned browser sessions
//! - [`TestStore`] - The backend job store (fetch tests, report status)

pub mod driver;
pub mod error;
pub mod model;
pub mod result;
pub mod store;

pub use driver::{PageDriver, SessionFactory};
pub use error::{BackendError, CommandError, SessionError};
pub use model::{Action, Command, CommandSpec, Step, Test, TestStatus, DEFAULT_WAIT_TIMEOUT_SECS};
pub use result::{StatusUpdate, StepResult, StepStatus, TestResult};
pub use store::TestStore;
