//! Browser discovery and headless launch.

#[cfg(test)]
#[path = "launcher_tests.rs"]
mod tests;

use std::path::PathBuf;
use std::process::Stdio;
use std::sync::atomic::{AtomicU16, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::{Child, Command};
use tracing::{debug, info};

use webrunner_protocols::{PageDriver, SessionError, SessionFactory};

use crate::cdp::CdpClient;
use crate::protocol::{BrowserVersion, PageInfo};
use crate::session::BrowserSession;

/// Ordered browser binary candidates, tried in sequence.
#[cfg(target_os = "linux")]
const BROWSER_CANDIDATES: &[&str] = &[
    "/usr/bin/google-chrome",
    "/usr/bin/google-chrome-stable",
    "/usr/bin/chromium",
    "/usr/bin/chromium-browser",
    "/snap/bin/chromium",
];

#[cfg(target_os = "macos")]
const BROWSER_CANDIDATES: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
];

#[cfg(target_os = "windows")]
const BROWSER_CANDIDATES: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
];

const READY_ATTEMPTS: u32 = 50;
const READY_POLL: Duration = Duration::from_millis(200);

/// Fixed headless launch configuration.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Explicit binary path; checked before the platform candidates.
    pub binary: Option<PathBuf>,
    /// Run headless (`--headless=new`). On by default.
    pub headless: bool,
    /// First debug port; each acquired session gets the next port up.
    pub base_debug_port: u16,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: None,
            headless: true,
            base_debug_port: 9222,
        }
    }
}

impl BrowserConfig {
    /// Resolve the browser binary, trying the explicit override first
    /// and then each platform candidate in order. When nothing matches,
    /// the error carries every path that was tried.
    pub fn find_browser(&self) -> Result<PathBuf, SessionError> {
        let mut tried = Vec::new();

        if let Some(binary) = &self.binary {
            if binary.exists() {
                return Ok(binary.clone());
            }
            tried.push(binary.display().to_string());
        }

        for candidate in BROWSER_CANDIDATES {
            let path = PathBuf::from(candidate);
            if path.exists() {
                return Ok(path);
            }
            tried.push(candidate.to_string());
        }

        Err(SessionError::BrowserNotFound { candidates: tried })
    }
}

/// Launches one exclusively-owned browser process per acquired session.
pub struct BrowserManager {
    config: BrowserConfig,
    http: reqwest::Client,
    /// Port offset counter so concurrent sessions never collide.
    next_port: AtomicU16,
}

impl BrowserManager {
    pub fn new(config: BrowserConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            next_port: AtomicU16::new(0),
        }
    }

    fn spawn_browser(
        &self,
        binary: &PathBuf,
        port: u16,
        profile_dir: &std::path::Path,
    ) -> Result<Child, SessionError> {
        let mut cmd = Command::new(binary);
        cmd.arg(format!("--remote-debugging-port={}", port))
            .arg(format!("--user-data-dir={}", profile_dir.display()))
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-background-networking")
            .arg("about:blank")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        if self.config.headless {
            cmd.arg("--headless=new");
        }

        cmd.spawn()
            .map_err(|e| SessionError::LaunchFailed(e.to_string()))
    }

    async fn wait_ready(&self, endpoint: &str) -> Option<BrowserVersion> {
        for _ in 0..READY_ATTEMPTS {
            tokio::time::sleep(READY_POLL).await;
            let response = match self
                .http
                .get(format!("{}/json/version", endpoint))
                .send()
                .await
            {
                Ok(response) => response,
                Err(_) => continue,
            };
            if let Ok(version) = response.json::<BrowserVersion>().await {
                return Some(version);
            }
        }
        None
    }

    /// Find the initial page target and its debugger socket URL.
    async fn page_ws_url(&self, endpoint: &str) -> Result<String, SessionError> {
        let pages: Vec<PageInfo> = self
            .http
            .get(format!("{}/json/list", endpoint))
            .send()
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?
            .json()
            .await
            .map_err(|e| SessionError::Connect(e.to_string()))?;

        pages
            .into_iter()
            .filter(|p| p.page_type == "page")
            .find_map(|p| p.web_socket_debugger_url)
            .ok_or_else(|| SessionError::Connect("no page target exposed".to_string()))
    }
}

#[async_trait]
impl SessionFactory for BrowserManager {
    async fn acquire(&self) -> Result<Box<dyn PageDriver>, SessionError> {
        let binary = self.config.find_browser()?;
        let port = self
            .config
            .base_debug_port
            .wrapping_add(self.next_port.fetch_add(1, Ordering::SeqCst));
        let endpoint = format!("http://127.0.0.1:{}", port);

        let profile = tempfile::tempdir()
            .map_err(|e| SessionError::LaunchFailed(format!("profile dir: {}", e)))?;

        debug!(
            "launching {} on port {} (profile {})",
            binary.display(),
            port,
            profile.path().display()
        );
        let mut child = self.spawn_browser(&binary, port, profile.path())?;

        let Some(version) = self.wait_ready(&endpoint).await else {
            let _ = child.kill().await;
            return Err(SessionError::LaunchFailed(format!(
                "browser did not become ready on {}",
                endpoint
            )));
        };
        debug!("browser ready: {}", version.browser);

        let ws_url = match self.page_ws_url(&endpoint).await {
            Ok(url) => url,
            Err(e) => {
                let _ = child.kill().await;
                return Err(e);
            }
        };

        let client = match CdpClient::connect(&ws_url).await {
            Ok(client) => client,
            Err(e) => {
                let _ = child.kill().await;
                return Err(SessionError::Connect(e.to_string()));
            }
        };

        let session = BrowserSession::new(client, child, profile);
        if let Err(e) = session.enable_domains().await {
            session.close().await;
            return Err(SessionError::Connect(e.to_string()));
        }

        info!("browser session ready on {}", endpoint);
        Ok(Box::new(session))
    }
}
