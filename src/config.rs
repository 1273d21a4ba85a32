use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::services::price_feed::DEFAULT_MAX_STEP;
use crate::services::signals::DEFAULT_INITIAL_PRICE;
use crate::services::{
    FeedFactory, JsonWindowStore, MemoryWindowStore, MonitorConfig, PriceFeed, RandomWalkFeed,
    SqliteWindowStore, WindowStore,
};
use crate::types::WorkingWindow;

/// Data directory for persisted settings.
const DATA_DIR: &str = ".gold_signal";

/// Backend used to persist the working window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowStoreKind {
    #[default]
    Json,
    Sqlite,
    Memory,
}

impl WindowStoreKind {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" | "file" => Some(Self::Json),
            "sqlite" | "db" => Some(Self::Sqlite),
            "memory" | "mem" => Some(Self::Memory),
            _ => None,
        }
    }

    fn default_path(&self) -> PathBuf {
        match self {
            Self::Json => PathBuf::from(DATA_DIR).join("window.json"),
            Self::Sqlite => PathBuf::from(DATA_DIR).join("settings.db"),
            Self::Memory => PathBuf::new(),
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds between ticks.
    pub tick_interval_secs: u64,
    /// Seconds to wait after a failed tick.
    pub backoff_secs: u64,
    /// Price each session starts from.
    pub initial_price: f64,
    /// Maximum absolute price move per tick.
    pub max_price_step: f64,
    /// Seed for a reproducible price walk.
    pub price_seed: Option<u64>,
    /// Working window persistence backend.
    pub window_store: WindowStoreKind,
    /// Location of the persisted window (ignored for memory).
    pub window_store_path: PathBuf,
    /// Window start override, `H:MM`.
    pub work_start: Option<String>,
    /// Window end override, `H:MM`.
    pub work_end: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval_secs: 30,
            backoff_secs: 10,
            initial_price: DEFAULT_INITIAL_PRICE,
            max_price_step: DEFAULT_MAX_STEP,
            price_seed: None,
            window_store: WindowStoreKind::Json,
            window_store_path: WindowStoreKind::Json.default_path(),
            work_start: None,
            work_end: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Unparseable values fall back
    /// to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let window_store = lookup("WINDOW_STORE")
            .and_then(|s| WindowStoreKind::from_str(&s))
            .unwrap_or_default();

        let initial_price = lookup("INITIAL_PRICE")
            .and_then(|s| s.parse().ok())
            .filter(|p: &f64| p.is_finite() && *p > 0.0)
            .unwrap_or(defaults.initial_price);

        Self {
            tick_interval_secs: lookup("TICK_INTERVAL_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.tick_interval_secs),
            backoff_secs: lookup("BACKOFF_SECS")
                .and_then(|s| s.parse::<u64>().ok())
                .filter(|&secs| secs > 0)
                .unwrap_or(defaults.backoff_secs),
            initial_price,
            // A single move may not exceed the starting price.
            max_price_step: lookup("MAX_PRICE_STEP")
                .and_then(|s| s.parse().ok())
                .filter(|s: &f64| s.is_finite() && *s >= 0.0 && *s <= initial_price)
                .unwrap_or(defaults.max_price_step),
            price_seed: lookup("PRICE_SEED").and_then(|s| s.parse().ok()),
            window_store,
            window_store_path: lookup("WINDOW_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| window_store.default_path()),
            work_start: lookup("WORK_START"),
            work_end: lookup("WORK_END"),
        }
    }

    pub fn monitor_config(&self) -> MonitorConfig {
        MonitorConfig {
            tick_interval: Duration::from_secs(self.tick_interval_secs),
            backoff: Duration::from_secs(self.backoff_secs),
            initial_price: self.initial_price,
        }
    }

    /// Open the configured window store.
    pub fn open_window_store(&self) -> Result<Box<dyn WindowStore>> {
        let store: Box<dyn WindowStore> = match self.window_store {
            WindowStoreKind::Json => Box::new(JsonWindowStore::new(&self.window_store_path)),
            WindowStoreKind::Sqlite => Box::new(SqliteWindowStore::new(&self.window_store_path)?),
            WindowStoreKind::Memory => Box::new(MemoryWindowStore::new()),
        };
        Ok(store)
    }

    /// Window from `WORK_START`/`WORK_END` when both are set.
    pub fn window_override(&self) -> Result<Option<WorkingWindow>> {
        match (&self.work_start, &self.work_end) {
            (Some(start), Some(end)) => WorkingWindow::parse(start, end).map(Some),
            (None, None) => Ok(None),
            _ => Err(AppError::InvalidWindow(
                "WORK_START and WORK_END must be set together".to_string(),
            )),
        }
    }

    /// Random-walk feed factory honouring `MAX_PRICE_STEP` and `PRICE_SEED`.
    pub fn feed_factory(&self) -> FeedFactory {
        let max_step = self.max_price_step;
        let seed = self.price_seed;
        Arc::new(move || -> Box<dyn PriceFeed> {
            match seed {
                Some(seed) => Box::new(RandomWalkFeed::seeded(seed, max_step)),
                None => Box::new(RandomWalkFeed::from_entropy(max_step)),
            }
        })
    }
}
