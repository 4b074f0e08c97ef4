use super::*;
use crate::mock::MockBrowser;
use webrunner_protocols::{Command, CommandError, Step, TestStatus};

fn test_with_steps(id: &str, start_url: Option<&str>, steps: &[(&str, &[&str])]) -> Test {
    Test {
        id: id.to_string(),
        start_url: start_url.map(str::to_string),
        steps: steps
            .iter()
            .map(|(name, commands)| Step {
                name: name.to_string(),
                commands: commands
                    .iter()
                    .map(|c| Command::Raw(c.to_string()))
                    .collect(),
            })
            .collect(),
        status: TestStatus::Pending,
    }
}

fn runner(browser: &MockBrowser) -> TestRunner {
    TestRunner::new(Arc::new(browser.clone()))
}

#[tokio::test]
async fn test_successful_run() {
    let browser = MockBrowser::new();
    let test = test_with_steps(
        "t1",
        Some("https://example.com"),
        &[
            ("open", &["navigate home"]),
            ("submit", &["click #submit"]),
        ],
    );

    let result = runner(&browser).run(&test).await;

    assert_eq!(result.test_id, "t1");
    assert_eq!(result.status, TestStatus::Completed);
    assert!(result.error.is_none());
    assert_eq!(result.steps.len(), 2);
    assert!(result
        .steps
        .iter()
        .all(|s| s.status == StepStatus::Completed));
    assert_eq!(
        browser.calls(),
        vec!["navigate https://example.com", "click #submit"]
    );
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_failed_step_marks_rest_skipped() {
    let browser = MockBrowser::new();
    browser.fail_command(
        "click #submit",
        CommandError::Timeout("waiting for '#submit' timed out after 10s".to_string()),
    );
    let test = test_with_steps(
        "t2",
        Some("https://example.com"),
        &[
            ("open", &["navigate home"]),
            ("submit", &["click #submit"]),
            ("verify", &["waitForVisible .done"]),
            ("logout", &["click #logout"]),
        ],
    );

    let result = runner(&browser).run(&test).await;

    assert_eq!(result.status, TestStatus::Failed);
    assert_eq!(result.steps.len(), 4);
    assert_eq!(result.steps[0].status, StepStatus::Completed);
    assert_eq!(result.steps[1].status, StepStatus::Failed);
    assert_eq!(result.steps[2].status, StepStatus::Skipped);
    assert_eq!(result.steps[3].status, StepStatus::Skipped);

    // Timeout cause is preserved in both the step and the test error.
    let step_error = result.steps[1].error.as_deref().unwrap();
    assert!(step_error.starts_with("timeout:"));
    assert_eq!(result.error.as_deref(), Some(step_error));

    // Nothing past the failing command ran, and the session still closed.
    assert_eq!(
        browser.calls(),
        vec!["navigate https://example.com", "click #submit"]
    );
    assert_eq!(browser.closes(), 1);
}

#[tokio::test]
async fn test_session_failure_leaves_steps_untouched() {
    let browser = MockBrowser::new();
    browser.fail_acquire();
    let test = test_with_steps(
        "t3",
        None,
        &[("open", &["navigate https://example.com"]), ("go", &["click #go"])],
    );

    let result = runner(&browser).run(&test).await;

    assert_eq!(result.status, TestStatus::Failed);
    assert!(result
        .error
        .as_deref()
        .unwrap()
        .contains("browser session failed"));
    assert_eq!(result.steps.len(), 2);
    assert!(result.steps.iter().all(|s| s.status == StepStatus::None));
    assert_eq!(browser.acquires(), 0);
    assert_eq!(browser.closes(), 0);
}

#[tokio::test]
async fn test_empty_test_completes() {
    let browser = MockBrowser::new();
    let test = test_with_steps("t4", None, &[]);

    let result = runner(&browser).run(&test).await;

    assert_eq!(result.status, TestStatus::Completed);
    assert!(result.steps.is_empty());
    assert_eq!(browser.closes(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_fails_the_test() {
    use async_trait::async_trait;
    use webrunner_protocols::{PageDriver, SessionError, SessionFactory};

    struct StallingDriver;

    #[async_trait]
    impl PageDriver for StallingDriver {
        async fn navigate(&self, _url: &str) -> Result<(), CommandError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(())
        }
        async fn click(&self, _selector: &str) -> Result<(), CommandError> {
            Ok(())
        }
        async fn type_text(&self, _selector: &str, _text: &str) -> Result<(), CommandError> {
            Ok(())
        }
        async fn wait_for_visible(
            &self,
            _selector: &str,
            _timeout: Duration,
        ) -> Result<(), CommandError> {
            Ok(())
        }
        async fn press_key(&self, _key: &str) -> Result<(), CommandError> {
            Ok(())
        }
        async fn close(&self) {}
    }

    struct StallingFactory;

    #[async_trait]
    impl SessionFactory for StallingFactory {
        async fn acquire(&self) -> Result<Box<dyn PageDriver>, SessionError> {
            Ok(Box::new(StallingDriver))
        }
    }

    let runner = TestRunner::with_config(
        Arc::new(StallingFactory),
        TestRunnerConfig {
            test_timeout: Some(Duration::from_secs(5)),
        },
    );
    let test = test_with_steps(
        "t5",
        None,
        &[("hang", &["navigate https://example.com"]), ("never", &["click #x"])],
    );

    let result = runner.run(&test).await;

    assert_eq!(result.status, TestStatus::Failed);
    assert!(result.error.as_deref().unwrap().contains("timed out"));
    assert_eq!(result.steps.len(), 2);
    assert!(result.steps.iter().all(|s| s.status == StepStatus::None));
}
