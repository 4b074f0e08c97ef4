//! CDP-backed page driver.

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::{json, Value};
use tempfile::TempDir;
use tokio::process::Child;
use tracing::debug;

use webrunner_protocols::{CommandError, PageDriver};

use crate::cdp::{CdpClient, CdpError};

/// How long navigation may take before the page must report a usable
/// ready state.
const LOAD_TIMEOUT: Duration = Duration::from_secs(30);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

impl From<CdpError> for CommandError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::Timeout(msg) => CommandError::Timeout(msg),
            other => CommandError::Driver(other.to_string()),
        }
    }
}

/// One live page in an exclusively-owned browser process.
///
/// Owns the process and the throwaway profile directory: closing the
/// session (or dropping it, via `kill_on_drop`) tears both down.
pub struct BrowserSession {
    client: CdpClient,
    child: tokio::sync::Mutex<Option<Child>>,
    closed: AtomicBool,
    _profile: TempDir,
}

impl BrowserSession {
    pub(crate) fn new(client: CdpClient, child: Child, profile: TempDir) -> Self {
        Self {
            client,
            child: tokio::sync::Mutex::new(Some(child)),
            closed: AtomicBool::new(false),
            _profile: profile,
        }
    }

    pub(crate) async fn enable_domains(&self) -> Result<(), CdpError> {
        self.client.call("Page.enable", None).await?;
        self.client.call("DOM.enable", None).await?;
        self.client.call("Runtime.enable", None).await?;
        Ok(())
    }

    async fn evaluate(&self, expression: &str) -> Result<Value, CdpError> {
        let result = self
            .client
            .call(
                "Runtime.evaluate",
                Some(json!({"expression": expression, "returnByValue": true})),
            )
            .await?;
        Ok(result["result"]["value"].clone())
    }

    async fn wait_for_load(&self) -> Result<(), CommandError> {
        let start = Instant::now();
        loop {
            let state = self.evaluate("document.readyState").await?;
            if matches!(state.as_str(), Some("complete") | Some("interactive")) {
                return Ok(());
            }
            if start.elapsed() > LOAD_TIMEOUT {
                return Err(CommandError::Timeout("page load timed out".to_string()));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Query a selector; `Ok(None)` when nothing matches.
    async fn query_selector(&self, selector: &str) -> Result<Option<i64>, CdpError> {
        let doc = self.client.call("DOM.getDocument", None).await?;
        let root_id = doc["root"]["nodeId"].as_i64().unwrap_or(0);

        let result = self
            .client
            .call(
                "DOM.querySelector",
                Some(json!({"nodeId": root_id, "selector": selector})),
            )
            .await?;

        match result["nodeId"].as_i64() {
            Some(0) | None => Ok(None),
            Some(node_id) => Ok(Some(node_id)),
        }
    }

    /// Content-box quad of a node; `Ok(None)` when the node has no box
    /// (not rendered / not visible).
    async fn content_quad(&self, node_id: i64) -> Result<Option<Vec<f64>>, CdpError> {
        let result = self
            .client
            .call("DOM.getBoxModel", Some(json!({"nodeId": node_id})))
            .await;

        match result {
            Ok(r) => {
                let quad: Vec<f64> = r["model"]["content"]
                    .as_array()
                    .map(|arr| arr.iter().filter_map(|v| v.as_f64()).collect())
                    .unwrap_or_default();
                Ok(Some(quad))
            }
            // -32000: node has no box model, i.e. not rendered.
            Err(CdpError::Protocol { code: -32000, .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn require_node(&self, selector: &str) -> Result<i64, CommandError> {
        self.query_selector(selector)
            .await?
            .ok_or_else(|| CommandError::Driver(format!("element not found: {}", selector)))
    }

    pub(crate) fn quad_center(quad: &[f64]) -> Option<(f64, f64)> {
        if quad.len() < 8 {
            return None;
        }
        let x = (quad[0] + quad[2] + quad[4] + quad[6]) / 4.0;
        let y = (quad[1] + quad[3] + quad[5] + quad[7]) / 4.0;
        Some((x, y))
    }

    async fn dispatch_click(&self, x: f64, y: f64) -> Result<(), CdpError> {
        for event_type in ["mousePressed", "mouseReleased"] {
            self.client
                .call(
                    "Input.dispatchMouseEvent",
                    Some(json!({
                        "type": event_type,
                        "x": x,
                        "y": y,
                        "button": "left",
                        "clickCount": 1,
                    })),
                )
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<(), CommandError> {
        let result = self
            .client
            .call("Page.navigate", Some(json!({"url": url})))
            .await?;

        if let Some(error) = result.get("errorText").and_then(|e| e.as_str()) {
            if !error.is_empty() {
                return Err(CommandError::Driver(format!(
                    "navigation failed: {}",
                    error
                )));
            }
        }

        self.wait_for_load().await?;
        debug!("navigated to {}", url);
        Ok(())
    }

    async fn click(&self, selector: &str) -> Result<(), CommandError> {
        let node_id = self.require_node(selector).await?;
        let quad = self
            .content_quad(node_id)
            .await?
            .and_then(|q| Self::quad_center(&q))
            .ok_or_else(|| {
                CommandError::Driver(format!("element not visible: {}", selector))
            })?;

        self.dispatch_click(quad.0, quad.1).await?;
        debug!("clicked {}", selector);
        Ok(())
    }

    async fn type_text(&self, selector: &str, text: &str) -> Result<(), CommandError> {
        let node_id = self.require_node(selector).await?;
        self.client
            .call("DOM.focus", Some(json!({"nodeId": node_id})))
            .await?;
        self.client
            .call("Input.insertText", Some(json!({"text": text})))
            .await?;
        debug!("typed {} characters into {}", text.len(), selector);
        Ok(())
    }

    async fn wait_for_visible(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<(), CommandError> {
        let start = Instant::now();
        loop {
            if let Some(node_id) = self.query_selector(selector).await? {
                if self.content_quad(node_id).await?.is_some() {
                    return Ok(());
                }
            }
            if start.elapsed() > timeout {
                return Err(CommandError::Timeout(format!(
                    "waiting for '{}' timed out after {}s",
                    selector,
                    timeout.as_secs()
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn press_key(&self, key: &str) -> Result<(), CommandError> {
        for event_type in ["keyDown", "keyUp"] {
            self.client
                .call(
                    "Input.dispatchKeyEvent",
                    Some(json!({"type": event_type, "key": key})),
                )
                .await?;
        }
        Ok(())
    }

    async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(mut child) = self.child.lock().await.take() {
            debug!("shutting down browser process");
            let _ = child.kill().await;
        }
    }
}
