//! webrunner - remote browser-test execution worker.
//!
//! Polls the backend for pending tests in the background and serves an
//! HTTP API for on-demand execution.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use webrunner_api::{ApiConfig, ApiServer, AppState};
use webrunner_backend::BackendClient;
use webrunner_browser::{BrowserConfig, BrowserManager};
use webrunner_poller::{Poller, PollerConfig};
use webrunner_protocols::TestStore;
use webrunner_runner::TestRunner;

/// webrunner CLI.
#[derive(Parser)]
#[command(name = "webrunner")]
#[command(about = "Remote browser-test execution worker")]
#[command(version)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "BACKEND_URL", default_value = "http://localhost:3000")]
    backend_url: String,

    /// API server host
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// API server port
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Seconds between backend polls
    #[arg(long, default_value_t = 5)]
    poll_interval_secs: u64,

    /// Run the browser with a visible window
    #[arg(long)]
    no_headless: bool,

    /// Browser binary path, overriding the platform candidates
    #[arg(long, env = "WEBRUNNER_BROWSER")]
    browser: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    info!("starting webrunner v{}", env!("CARGO_PKG_VERSION"));
    info!("backend: {}", cli.backend_url);

    let sessions = Arc::new(BrowserManager::new(BrowserConfig {
        binary: cli.browser,
        headless: !cli.no_headless,
        ..BrowserConfig::default()
    }));
    let store: Arc<dyn TestStore> = Arc::new(BackendClient::new(&cli.backend_url));
    let runner = Arc::new(TestRunner::new(sessions));

    let poller = Arc::new(Poller::with_config(
        store.clone(),
        runner.clone(),
        PollerConfig {
            interval: Duration::from_secs(cli.poll_interval_secs),
            ..PollerConfig::default()
        },
    ));
    tokio::spawn(async move {
        if let Err(error) = poller.wait_for_backend().await {
            warn!(%error, "backend not reachable after startup probes; polling anyway");
        }
        poller.run().await;
    });

    let server = ApiServer::new(
        ApiConfig::new(cli.host, cli.port),
        Arc::new(AppState::new(store, runner)),
    );
    server.run().await?;

    Ok(())
}
