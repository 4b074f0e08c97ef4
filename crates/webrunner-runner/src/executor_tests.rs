use super::*;
use crate::mock::MockBrowser;
use webrunner_protocols::SessionFactory;

async fn driver(browser: &MockBrowser) -> Box<dyn PageDriver> {
    browser.acquire().await.unwrap()
}

#[tokio::test]
async fn test_navigate_home_resolves_start_url() {
    let browser = MockBrowser::new();
    let driver = driver(&browser).await;
    let executor = CommandExecutor::new();

    executor
        .execute(
            driver.as_ref(),
            &Command::Raw("navigate home".to_string()),
            Some("https://example.com"),
        )
        .await
        .unwrap();

    assert_eq!(browser.calls(), vec!["navigate https://example.com"]);
}

#[tokio::test]
async fn test_navigate_home_without_start_url_is_invalid() {
    let browser = MockBrowser::new();
    let driver = driver(&browser).await;
    let executor = CommandExecutor::new();

    let err = executor
        .execute(
            driver.as_ref(),
            &Command::Raw("navigate home".to_string()),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::InvalidCommand(_)));
    assert!(browser.calls().is_empty());
}

#[tokio::test]
async fn test_explicit_url_ignores_start_url() {
    let browser = MockBrowser::new();
    let driver = driver(&browser).await;
    let executor = CommandExecutor::new();

    executor
        .execute(
            driver.as_ref(),
            &Command::Raw("navigate https://other.test/login".to_string()),
            Some("https://example.com"),
        )
        .await
        .unwrap();

    assert_eq!(browser.calls(), vec!["navigate https://other.test/login"]);
}

#[tokio::test]
async fn test_dispatches_each_action() {
    let browser = MockBrowser::new();
    let driver = driver(&browser).await;
    let executor = CommandExecutor::new();

    for raw in [
        "click #submit",
        "type #name alice",
        "waitForVisible .results 3",
        "press Enter",
    ] {
        executor
            .execute(driver.as_ref(), &Command::Raw(raw.to_string()), None)
            .await
            .unwrap();
    }

    assert_eq!(
        browser.calls(),
        vec![
            "click #submit",
            "type #name alice",
            "wait .results",
            "press Enter",
        ]
    );
}

#[tokio::test]
async fn test_invalid_command_never_reaches_driver() {
    let browser = MockBrowser::new();
    let driver = driver(&browser).await;
    let executor = CommandExecutor::new();

    let err = executor
        .execute(
            driver.as_ref(),
            &Command::Raw("eval alert(1)".to_string()),
            None,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, CommandError::InvalidCommand(_)));
    assert!(browser.calls().is_empty());
}
