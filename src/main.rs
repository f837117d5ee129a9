use anyhow::{Context, Result};
use newsdash::api::NewsClient;
use newsdash::app::App;
use newsdash::config::Config;
use newsdash::ui;
use tokio::sync::mpsc;

/// Capacity of the background event channel
const EVENT_CHANNEL_CAPACITY: usize = 32;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the terminal UI; set RUST_LOG and redirect stderr to see logs
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_environment().context("Failed to load configuration")?;
    tracing::info!(
        api = %config.api_base_url,
        hours_back = ?config.hours_back,
        "Configuration loaded"
    );

    let client = NewsClient::new(&config).context("Failed to build HTTP client")?;

    // Probe in the background; the dashboard reports fetch failures itself
    let probe = client.clone();
    tokio::spawn(async move {
        match probe.health().await {
            Ok(health) => tracing::info!(
                status = %health.status,
                message = %health.message,
                "News service reachable"
            ),
            Err(e) => tracing::warn!(
                kind = ?e.kind(),
                error = %e,
                "News service health check failed"
            ),
        }
    });

    let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let mut app = App::new(client);

    ui::run(&mut app, event_tx, event_rx).await
}
