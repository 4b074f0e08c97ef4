//! Shared handler state.

use std::sync::Arc;

use webrunner_protocols::TestStore;
use webrunner_runner::TestRunner;

/// State shared by all handlers: the backend store and the test runner.
pub struct AppState {
    pub store: Arc<dyn TestStore>,
    pub runner: Arc<TestRunner>,
}

impl AppState {
    pub fn new(store: Arc<dyn TestStore>, runner: Arc<TestRunner>) -> Self {
        Self { store, runner }
    }
}
