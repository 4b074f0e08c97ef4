//! Single-command execution.

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

use std::time::Duration;

use tracing::debug;

use webrunner_protocols::{Action, Command, CommandError, PageDriver};

/// Target name that resolves to the test's start URL.
const HOME_TARGET: &str = "home";

/// Executes one command against a live session.
///
/// Commands are parsed into the closed [`Action`] vocabulary and
/// dispatched; the only capability a command can reach is the passed
/// [`PageDriver`]. Externally supplied text is never evaluated as code.
#[derive(Debug, Clone, Default)]
pub struct CommandExecutor;

impl CommandExecutor {
    pub fn new() -> Self {
        Self
    }

    /// Execute `command`. `start_url` is the test's start URL, used to
    /// resolve `navigate home`.
    pub async fn execute(
        &self,
        driver: &dyn PageDriver,
        command: &Command,
        start_url: Option<&str>,
    ) -> Result<(), CommandError> {
        let action = command.parse()?;
        debug!("executing {}", command);

        match action {
            Action::Navigate { url } => {
                let url = if url == HOME_TARGET {
                    start_url
                        .ok_or_else(|| {
                            CommandError::InvalidCommand(
                                "navigate home: test has no start URL".to_string(),
                            )
                        })?
                        .to_string()
                } else {
                    url
                };
                driver.navigate(&url).await
            }
            Action::Click { selector } => driver.click(&selector).await,
            Action::Type { selector, text } => driver.type_text(&selector, &text).await,
            Action::WaitForVisible {
                selector,
                timeout_secs,
            } => {
                driver
                    .wait_for_visible(&selector, Duration::from_secs(timeout_secs))
                    .await
            }
            Action::PressKey { key } => driver.press_key(&key).await,
        }
    }
}
