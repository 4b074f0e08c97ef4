use super::*;

#[test]
fn test_config_defaults() {
    let config = BrowserConfig::default();
    assert!(config.headless);
    assert_eq!(config.base_debug_port, 9222);
    assert!(config.binary.is_none());
}

#[test]
fn test_find_browser_reports_all_candidates() {
    let config = BrowserConfig {
        binary: Some(PathBuf::from("/nonexistent/override")),
        ..Default::default()
    };
    // Only meaningful on hosts without a browser at the fixed paths,
    // but the override must always appear among the tried candidates.
    if let Err(SessionError::BrowserNotFound { candidates }) = config.find_browser() {
        assert!(candidates.contains(&"/nonexistent/override".to_string()));
        assert!(candidates.len() > 1);
    }
}

#[test]
fn test_find_browser_prefers_existing_override() {
    // The binary override is any existing path; a directory is enough
    // for discovery purposes.
    let dir = tempfile::tempdir().unwrap();
    let config = BrowserConfig {
        binary: Some(dir.path().to_path_buf()),
        ..Default::default()
    };
    assert_eq!(config.find_browser().unwrap(), dir.path());
}

#[test]
fn test_ports_do_not_collide() {
    let manager = BrowserManager::new(BrowserConfig::default());
    let a = manager.next_port.fetch_add(1, Ordering::SeqCst);
    let b = manager.next_port.fetch_add(1, Ordering::SeqCst);
    assert_ne!(a, b);
}
