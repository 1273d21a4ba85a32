use std::sync::Arc;

use gold_signal::config::Config;
use gold_signal::services::{LogNotifier, Monitor, SystemClock};
use gold_signal::types::MonitorEvent;
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gold_signal=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!("Starting gold signal monitor");

    // Persist a window override before loading, so the store stays the source of truth
    let store = config.open_window_store()?;
    if let Some(window) = config.window_override()? {
        store.save_window(&window)?;
    }
    let window = store.load_window()?;
    info!("Working hours: {}", window);
    if window.is_overnight() {
        warn!(
            "Working hours {} cross midnight; such windows are never open, set start before end",
            window
        );
    }

    let monitor = Monitor::new(
        config.monitor_config(),
        Arc::new(SystemClock),
        Arc::new(LogNotifier),
        config.feed_factory(),
    );

    // Presentation: render every event as a log line
    let mut events = monitor.subscribe();
    let presenter = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(MonitorEvent::TickFailed(msg)) => warn!("Error: {}", msg),
                Ok(event) => {
                    info!("{}", event.describe());
                    if event == MonitorEvent::Stopped {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!("Presenter lagged by {} events", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });

    if let Err(e) = monitor.start_session(window).await {
        error!("Monitoring not started: {}", e);
        presenter.abort();
        return Ok(());
    }

    tokio::signal::ctrl_c().await?;
    info!("Shutdown requested");

    monitor.stop_session().await;
    let _ = presenter.await;

    Ok(())
}
