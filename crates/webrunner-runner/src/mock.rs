//! Scripted browser doubles for tests.
//!
//! Used by this crate's tests and by the poller/API tests downstream.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use webrunner_protocols::{CommandError, PageDriver, SessionError, SessionFactory};

#[derive(Default)]
struct MockState {
    calls: Mutex<Vec<String>>,
    failures: Mutex<HashMap<String, CommandError>>,
    closes: AtomicUsize,
    acquires: AtomicUsize,
    fail_acquire: AtomicBool,
}

/// Session factory whose drivers record every call and fail on demand.
///
/// All sessions acquired from one `MockBrowser` share its call log, so a
/// test can assert on what happened after the runner is done.
#[derive(Clone, Default)]
pub struct MockBrowser {
    state: Arc<MockState>,
}

impl MockBrowser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the driver fail when it sees `call` (e.g. `"click #submit"`).
    pub fn fail_command(&self, call: impl Into<String>, error: CommandError) {
        self.state.failures.lock().insert(call.into(), error);
    }

    /// Make every subsequent `acquire` fail.
    pub fn fail_acquire(&self) {
        self.state.fail_acquire.store(true, Ordering::SeqCst);
    }

    /// Every driver call recorded so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.calls.lock().clone()
    }

    pub fn acquires(&self) -> usize {
        self.state.acquires.load(Ordering::SeqCst)
    }

    pub fn closes(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionFactory for MockBrowser {
    async fn acquire(&self) -> Result<Box<dyn PageDriver>, SessionError> {
        if self.state.fail_acquire.load(Ordering::SeqCst) {
            return Err(SessionError::LaunchFailed(
                "browser refused to start".to_string(),
            ));
        }
        self.state.acquires.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockDriver {
            state: self.state.clone(),
        }))
    }
}

struct MockDriver {
    state: Arc<MockState>,
}

impl MockDriver {
    fn record(&self, call: String) -> Result<(), CommandError> {
        self.state.calls.lock().push(call.clone());
        match self.state.failures.lock().get(&call) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl PageDriver for MockDriver {
    async fn navigate(&self, url: &str) -> Result<(), CommandError> {
        self.record(format!("navigate {}", url))
    }

    async fn click(&self, selector: &str) -> Result<(), CommandError> {
        self.record(format!("click {}", selector))
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), CommandError> {
        self.record(format!("type {} {}", selector, text))
    }

    async fn wait_for_visible(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<(), CommandError> {
        self.record(format!("wait {}", selector))
    }

    async fn press_key(&self, key: &str) -> Result<(), CommandError> {
        self.record(format!("press {}", key))
    }

    async fn close(&self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
    }
}
