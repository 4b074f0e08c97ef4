//! Browser capability seams.
//!
//! The executor only ever sees a [`PageDriver`]; the concrete CDP
//! implementation lives in `webrunner-browser`. Sessions are exclusively
//! owned by one test execution and are never shared.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::{CommandError, SessionError};

/// One live browser page, the only capability a command may touch.
#[async_trait]
pub trait PageDriver: Send + Sync {
    /// Navigate to an absolute URL and wait for the page to load.
    async fn navigate(&self, url: &str) -> Result<(), CommandError>;

    /// Click the first element matching the CSS selector.
    async fn click(&self, selector: &str) -> Result<(), CommandError>;

    /// Focus the element matching the selector and type text into it.
    async fn type_text(&self, selector: &str, text: &str) -> Result<(), CommandError>;

    /// Wait until an element matching the selector is visible.
    ///
    /// Exceeding `timeout` must surface as [`CommandError::Timeout`],
    /// never as a generic driver fault.
    async fn wait_for_visible(&self, selector: &str, timeout: Duration)
        -> Result<(), CommandError>;

    /// Press a single key (e.g. `Enter`).
    async fn press_key(&self, key: &str) -> Result<(), CommandError>;

    /// Release the session. Idempotent; implementations must also
    /// reclaim resources on drop so release happens on unwind.
    async fn close(&self);
}

/// Acquires browser sessions with the worker's fixed headless
/// configuration. Each call yields an independent session.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn PageDriver>, SessionError>;
}
