//! Error taxonomy.
//!
//! Each failure class is fatal to exactly one unit of work: a session
//! error to one test, a command error to its step and test, a backend
//! error to one poll iteration. Nothing here kills the process.

use thiserror::Error;

/// Browser session acquisition failures.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    /// No browser binary found at any candidate path.
    #[error("no browser binary found; tried: {}", candidates.join(", "))]
    BrowserNotFound { candidates: Vec<String> },

    /// The browser process failed to start or become ready.
    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    /// The browser started but the debugging connection failed.
    #[error("browser connection failed: {0}")]
    Connect(String),
}

/// Failures executing a single browser command.
#[derive(Debug, Clone, Error)]
pub enum CommandError {
    /// A wait-type command exceeded its timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// The underlying driver reported a fault.
    #[error("driver error: {0}")]
    Driver(String),

    /// The command is not part of the recognized vocabulary.
    #[error("invalid command: {0}")]
    InvalidCommand(String),
}

/// Failures talking to the backend job store.
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The requested test does not exist.
    #[error("test not found: {0}")]
    NotFound(String),

    /// Request-level failure (network, non-success status).
    #[error("backend request failed: {0}")]
    Http(String),

    /// The backend answered with something we could not decode.
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),
}
