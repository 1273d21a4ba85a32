//! Monitor Service
//!
//! Drives a signal session in the background: every tick interval it checks
//! the working-hours gate, runs one engine tick when open, publishes the
//! result and raises an alert for Buy/Sell signals. A failed tick is
//! reported and followed by a shorter back-off before the loop resumes.

use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info, warn};

use crate::error::{AppError, Result};
use crate::services::clock::Clock;
use crate::services::notifier::SignalNotifier;
use crate::services::price_feed::PriceFeed;
use crate::services::signals::{Session, DEFAULT_INITIAL_PRICE};
use crate::services::working_hours::WorkingHoursGate;
use crate::types::{MonitorEvent, WorkingWindow};

/// Builds the price feed for each new session.
pub type FeedFactory = Arc<dyn Fn() -> Box<dyn PriceFeed> + Send + Sync>;

const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Timing and seed settings for monitoring sessions.
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Delay between ticks.
    pub tick_interval: Duration,
    /// Delay after a failed tick.
    pub backoff: Duration,
    /// Price each session starts from.
    pub initial_price: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(30),
            backoff: Duration::from_secs(10),
            initial_price: DEFAULT_INITIAL_PRICE,
        }
    }
}

/// The running session task and its shutdown handle.
struct ActiveSession {
    window: WorkingWindow,
    shutdown_tx: broadcast::Sender<()>,
    handle: JoinHandle<()>,
}

/// Owns at most one monitoring session at a time.
pub struct Monitor {
    config: MonitorConfig,
    clock: Arc<dyn Clock>,
    notifier: Arc<dyn SignalNotifier>,
    feed_factory: FeedFactory,
    events_tx: broadcast::Sender<MonitorEvent>,
    active: Mutex<Option<ActiveSession>>,
}

impl Monitor {
    /// Create a new monitor
    pub fn new(
        config: MonitorConfig,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn SignalNotifier>,
        feed_factory: FeedFactory,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            config,
            clock,
            notifier,
            feed_factory,
            events_tx,
            active: Mutex::new(None),
        }
    }

    /// Get a subscription to session events.
    pub fn subscribe(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events_tx.subscribe()
    }

    /// Start a session for `window`.
    ///
    /// Returns `Ok(false)` without side effects when a session is already
    /// running, and `OutsideWorkingHours` when the gate is closed right now.
    pub async fn start_session(&self, window: WorkingWindow) -> Result<bool> {
        window.validate()?;

        let mut active = self.active.lock().await;
        if let Some(current) = active.as_ref() {
            if !current.handle.is_finished() {
                warn!("Monitoring already running ({}), ignoring start", current.window);
                return Ok(false);
            }
        }

        if window.is_overnight() {
            warn!("Window {} crosses midnight and is never open", window);
        }

        let gate = WorkingHoursGate::new(window, self.clock.clone());
        if !gate.is_open_now() {
            warn!("Outside working hours ({}), monitoring not started", window);
            return Err(AppError::OutsideWorkingHours);
        }

        let session = Session::new(
            (self.feed_factory)(),
            self.clock.clone(),
            self.config.initial_price,
        );
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);

        let _ = self.events_tx.send(MonitorEvent::Started { window });
        info!(
            window = %window,
            tick_secs = self.config.tick_interval.as_secs_f64(),
            "Monitoring started"
        );

        let handle = tokio::spawn(run_session(
            session,
            gate,
            self.notifier.clone(),
            self.events_tx.clone(),
            shutdown_rx,
            self.config.clone(),
        ));

        *active = Some(ActiveSession {
            window,
            shutdown_tx,
            handle,
        });

        Ok(true)
    }

    /// Stop the running session, letting an in-flight tick finish.
    ///
    /// Returns `false` when nothing was running.
    pub async fn stop_session(&self) -> bool {
        let current = self.active.lock().await.take();
        let Some(current) = current else {
            return false;
        };

        let _ = current.shutdown_tx.send(());

        if let Err(e) = current.handle.await {
            error!("Monitor session task failed: {}", e);
        }

        info!("Monitoring stopped");
        true
    }

    /// Whether a session task is currently alive.
    pub async fn is_running(&self) -> bool {
        self.active
            .lock()
            .await
            .as_ref()
            .map(|s| !s.handle.is_finished())
            .unwrap_or(false)
    }

    /// Window of the running session, if any.
    pub async fn active_window(&self) -> Option<WorkingWindow> {
        self.active
            .lock()
            .await
            .as_ref()
            .filter(|s| !s.handle.is_finished())
            .map(|s| s.window)
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        if let Some(current) = self.active.get_mut().take() {
            let _ = current.shutdown_tx.send(());
        }
    }
}

/// Session loop: tick, publish, then sleep until the next tick or shutdown.
async fn run_session(
    mut session: Session,
    gate: WorkingHoursGate,
    notifier: Arc<dyn SignalNotifier>,
    events_tx: broadcast::Sender<MonitorEvent>,
    mut shutdown_rx: broadcast::Receiver<()>,
    config: MonitorConfig,
) {
    loop {
        let delay = match run_tick(&mut session, &gate, notifier.as_ref(), &events_tx) {
            Ok(()) => config.tick_interval,
            Err(e) => {
                error!("Monitor tick error: {}", e);
                let _ = events_tx.send(MonitorEvent::TickFailed(e.to_string()));
                warn!("Backing off for {}s", config.backoff.as_secs_f64());
                config.backoff
            }
        };

        tokio::select! {
            _ = sleep(delay) => {}
            _ = shutdown_rx.recv() => {
                debug!("Monitor session received shutdown signal");
                break;
            }
        }
    }

    let _ = events_tx.send(MonitorEvent::Stopped);
}

/// Run a single gated tick and publish its outcome.
fn run_tick(
    session: &mut Session,
    gate: &WorkingHoursGate,
    notifier: &dyn SignalNotifier,
    events_tx: &broadcast::Sender<MonitorEvent>,
) -> Result<()> {
    if !gate.is_open_now() {
        debug!("Outside working hours ({}), skipping tick", gate.window());
        let _ = events_tx.send(MonitorEvent::OutsideWorkingHours);
        return Ok(());
    }

    let signal = session.tick();
    let _ = events_tx.send(MonitorEvent::Signal(signal.clone()));

    if signal.has_signal {
        info!(
            kind = %signal.kind,
            price = signal.price,
            "Crossover signal detected"
        );
        notifier.notify(&signal)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::clock::FixedClock;
    use crate::services::notifier::LogNotifier;
    use crate::services::price_feed::ScriptedFeed;

    fn create_test_monitor(clock: Arc<FixedClock>) -> Monitor {
        let factory: FeedFactory =
            Arc::new(|| Box::new(ScriptedFeed::new(vec![1.0])) as Box<dyn PriceFeed>);
        Monitor::new(MonitorConfig::default(), clock, Arc::new(LogNotifier), factory)
    }

    #[test]
    fn test_default_config() {
        let config = MonitorConfig::default();
        assert_eq!(config.tick_interval, Duration::from_secs(30));
        assert_eq!(config.backoff, Duration::from_secs(10));
        assert_eq!(config.initial_price, 1950.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_running_before_start() {
        let monitor = create_test_monitor(Arc::new(FixedClock::at(9, 0, 0)));
        assert!(!monitor.is_running().await);
        assert_eq!(monitor.active_window().await, None);
        assert!(!monitor.stop_session().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_and_stop() {
        let monitor = create_test_monitor(Arc::new(FixedClock::at(9, 0, 0)));

        assert!(monitor.start_session(WorkingWindow::default()).await.unwrap());
        assert!(monitor.is_running().await);
        assert_eq!(monitor.active_window().await, Some(WorkingWindow::default()));

        assert!(monitor.stop_session().await);
        assert!(!monitor.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refuses_outside_hours() {
        let monitor = create_test_monitor(Arc::new(FixedClock::at(7, 0, 0)));
        let result = monitor.start_session(WorkingWindow::default()).await;
        assert!(matches!(result, Err(AppError::OutsideWorkingHours)));
        assert!(!monitor.is_running().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overnight_window_is_refused() {
        let window = WorkingWindow::from_hm(22, 0, 6, 0).unwrap();
        assert!(window.is_overnight());

        // 23:00 and 05:00 are inside the intended night shift, but not wrapped
        for (hour, minute) in [(23, 0), (5, 0)] {
            let monitor = create_test_monitor(Arc::new(FixedClock::at(hour, minute, 0)));
            let result = monitor.start_session(window).await;
            assert!(matches!(result, Err(AppError::OutsideWorkingHours)));
            assert!(!monitor.is_running().await);
        }
    }
}
