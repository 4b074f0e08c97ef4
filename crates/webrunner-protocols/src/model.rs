//! Test data model as fetched from the backend.
//!
//! The backend is a JSON/REST service with camelCase fields and
//! Mongo-style `_id` identifiers; the serde attributes below pin that
//! wire contract. Tests are immutable once fetched - this worker only
//! ever reports status back, it never rewrites a test.

#[cfg(test)]
#[path = "model_tests.rs"]
mod tests;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// Default timeout for wait-type commands, in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Lifecycle status of a test in the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    #[default]
    Pending,
    Running,
    Completed,
    Failed,
}

/// One browser-automation test: an ordered sequence of named steps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Test {
    /// Backend identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,

    /// Optional URL the test starts from; `navigate home` resolves here.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_url: Option<String>,

    /// Ordered steps.
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Current status as known to the backend.
    #[serde(default)]
    pub status: TestStatus,
}

/// A named, ordered group of commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    #[serde(default)]
    pub commands: Vec<Command>,
}

/// One browser instruction, either as a raw instruction string
/// (`"click #submit"`) or as a structured object.
///
/// Both forms parse into the closed [`Action`] vocabulary before
/// execution; nothing externally supplied is ever evaluated as code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Command {
    Raw(String),
    Structured(CommandSpec),
}

/// Structured command form: `(action, selector, value)` plus an
/// optional per-command wait timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandSpec {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// The closed command vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Navigate the page. The target `home` resolves to the test's
    /// start URL at execution time.
    Navigate { url: String },
    /// Click the first element matching the selector.
    Click { selector: String },
    /// Focus the element matching the selector and type text into it.
    Type { selector: String, text: String },
    /// Wait until an element matching the selector is visible.
    WaitForVisible { selector: String, timeout_secs: u64 },
    /// Press a single key (e.g. `Enter`).
    PressKey { key: String },
}

impl Command {
    /// Parse into the closed vocabulary.
    ///
    /// Unknown actions and missing arguments are [`CommandError::InvalidCommand`].
    pub fn parse(&self) -> Result<Action, CommandError> {
        match self {
            Command::Raw(line) => parse_raw(line),
            Command::Structured(spec) => parse_spec(spec),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Raw(line) => f.write_str(line),
            Command::Structured(spec) => {
                f.write_str(&spec.action)?;
                if let Some(selector) = &spec.selector {
                    write!(f, " {}", selector)?;
                }
                if let Some(value) = &spec.value {
                    write!(f, " {}", value)?;
                }
                Ok(())
            }
        }
    }
}

/// Normalize an action name: case and separator insensitive, so
/// `waitForVisible`, `wait_for_visible` and `WAIT-FOR-VISIBLE` all match.
fn normalize(action: &str) -> String {
    action
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_ascii_lowercase()
}

fn parse_raw(line: &str) -> Result<Action, CommandError> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    if verb.is_empty() {
        return Err(CommandError::InvalidCommand("empty command".to_string()));
    }

    match normalize(verb).as_str() {
        "navigate" | "goto" | "open" => {
            require(rest, line, "url")?;
            Ok(Action::Navigate {
                url: rest.to_string(),
            })
        }
        "click" => {
            require(rest, line, "selector")?;
            Ok(Action::Click {
                selector: rest.to_string(),
            })
        }
        "type" | "sendkeys" => {
            let (selector, text) = rest.split_once(char::is_whitespace).ok_or_else(|| {
                CommandError::InvalidCommand(format!("'{}': expected selector and text", line))
            })?;
            Ok(Action::Type {
                selector: selector.to_string(),
                text: text.trim().to_string(),
            })
        }
        "waitforvisible" | "wait" => {
            require(rest, line, "selector")?;
            // Trailing integer, if present, is the timeout in seconds.
            let (selector, timeout_secs) = match rest.rsplit_once(char::is_whitespace) {
                Some((head, tail)) => match tail.parse::<u64>() {
                    Ok(secs) => (head.trim(), secs),
                    Err(_) => (rest, DEFAULT_WAIT_TIMEOUT_SECS),
                },
                None => (rest, DEFAULT_WAIT_TIMEOUT_SECS),
            };
            Ok(Action::WaitForVisible {
                selector: selector.to_string(),
                timeout_secs,
            })
        }
        "press" | "presskey" => {
            require(rest, line, "key")?;
            Ok(Action::PressKey {
                key: rest.to_string(),
            })
        }
        other => Err(CommandError::InvalidCommand(format!(
            "unknown action '{}'",
            other
        ))),
    }
}

fn parse_spec(spec: &CommandSpec) -> Result<Action, CommandError> {
    let selector = || {
        spec.selector.clone().ok_or_else(|| {
            CommandError::InvalidCommand(format!("'{}': missing selector", spec.action))
        })
    };

    match normalize(&spec.action).as_str() {
        "navigate" | "goto" | "open" => {
            let url = spec.value.clone().or_else(|| spec.selector.clone());
            let url = url.ok_or_else(|| {
                CommandError::InvalidCommand(format!("'{}': missing url", spec.action))
            })?;
            Ok(Action::Navigate { url })
        }
        "click" => Ok(Action::Click {
            selector: selector()?,
        }),
        "type" | "sendkeys" => {
            let text = spec.value.clone().ok_or_else(|| {
                CommandError::InvalidCommand(format!("'{}': missing text", spec.action))
            })?;
            Ok(Action::Type {
                selector: selector()?,
                text,
            })
        }
        "waitforvisible" | "wait" => Ok(Action::WaitForVisible {
            selector: selector()?,
            timeout_secs: spec.timeout_secs.unwrap_or(DEFAULT_WAIT_TIMEOUT_SECS),
        }),
        "press" | "presskey" => {
            let key = spec.value.clone().or_else(|| spec.selector.clone());
            let key = key.ok_or_else(|| {
                CommandError::InvalidCommand(format!("'{}': missing key", spec.action))
            })?;
            Ok(Action::PressKey { key })
        }
        other => Err(CommandError::InvalidCommand(format!(
            "unknown action '{}'",
            other
        ))),
    }
}

fn require(arg: &str, line: &str, what: &str) -> Result<(), CommandError> {
    if arg.is_empty() {
        Err(CommandError::InvalidCommand(format!(
            "'{}': missing {}",
            line, what
        )))
    } else {
        Ok(())
    }
}
