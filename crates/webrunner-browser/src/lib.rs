//! Headless browser session management for webrunner.
//!
//! [`BrowserManager`] launches one browser process per acquired session
//! (own debug port, throwaway profile) and hands back a
//! [`webrunner_protocols::PageDriver`] backed by a minimal Chrome
//! DevTools Protocol client. Sessions are exclusively owned: the worker
//! never shares a browser process between test executions.

pub mod cdp;
pub mod launcher;
pub mod protocol;
pub mod session;

pub use cdp::{CdpClient, CdpError};
pub use launcher::{BrowserConfig, BrowserManager};
pub use session::BrowserSession;
