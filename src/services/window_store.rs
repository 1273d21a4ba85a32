//! Working window persistence.
//!
//! Backends:
//! - JSON file: single document next to the binary's working directory
//! - SQLite: key/value settings table (start/end hour and minute)
//! - Memory: process-local, for tests and ephemeral runs
//!
//! All backends fall back to the 08:00 - 18:00 default when nothing is stored.

use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::{AppError, Result};
use crate::types::WorkingWindow;

/// Load/save contract for the configured working window.
pub trait WindowStore: Send + Sync {
    /// Stored window, or the default when none is stored.
    fn load_window(&self) -> Result<WorkingWindow>;

    fn save_window(&self, window: &WorkingWindow) -> Result<()>;
}

// ========== JSON file ==========

/// Stores the window as a JSON document.
pub struct JsonWindowStore {
    path: PathBuf,
}

impl JsonWindowStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl WindowStore for JsonWindowStore {
    fn load_window(&self) -> Result<WorkingWindow> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No window file at {:?}, using default", self.path);
                return Ok(WorkingWindow::default());
            }
            Err(e) => return Err(e.into()),
        };

        match serde_json::from_str::<WorkingWindow>(&content) {
            Ok(window) => match window.validate() {
                Ok(()) => Ok(window),
                Err(e) => {
                    warn!("Ignoring stored window in {:?}: {}", self.path, e);
                    Ok(WorkingWindow::default())
                }
            },
            Err(e) => {
                warn!("Failed to parse window file {:?}: {}", self.path, e);
                Ok(WorkingWindow::default())
            }
        }
    }

    fn save_window(&self, window: &WorkingWindow) -> Result<()> {
        window.validate()?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(window)?;
        fs::write(&self.path, json)?;
        info!("Saved working window {} to {:?}", window, self.path);
        Ok(())
    }
}

// ========== SQLite ==========

const KEY_START_HOUR: &str = "startHour";
const KEY_START_MINUTE: &str = "startMinute";
const KEY_END_HOUR: &str = "endHour";
const KEY_END_MINUTE: &str = "endMinute";

/// Stores the window as four integer settings.
pub struct SqliteWindowStore {
    conn: Mutex<Connection>,
}

impl SqliteWindowStore {
    /// Open (or create) a settings database at the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        info!("SQLite window store initialized");
        Ok(store)
    }

    /// Create an in-memory settings database (for testing).
    pub fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        debug!("In-memory SQLite window store initialized");
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value INTEGER NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| AppError::Storage("settings connection poisoned".to_string()))
    }
}

impl WindowStore for SqliteWindowStore {
    fn load_window(&self) -> Result<WorkingWindow> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
        // Values that are not integers are kept as `None` and rejected below
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1).ok()))
        })?;

        let mut settings = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            settings.insert(key, value);
        }

        // Missing keys take their default individually
        let get = |key: &str, default: u32| -> Option<u32> {
            match settings.get(key) {
                Some(value) => value.and_then(|v| u32::try_from(v).ok()),
                None => Some(default),
            }
        };

        let window = match (
            get(KEY_START_HOUR, 8),
            get(KEY_START_MINUTE, 0),
            get(KEY_END_HOUR, 18),
            get(KEY_END_MINUTE, 0),
        ) {
            (Some(start_hour), Some(start_minute), Some(end_hour), Some(end_minute)) => {
                WorkingWindow::from_hm(start_hour, start_minute, end_hour, end_minute)
            }
            _ => Err(AppError::InvalidWindow(
                "stored setting is not a non-negative integer".to_string(),
            )),
        };

        match window {
            Ok(window) => Ok(window),
            Err(e) => {
                warn!("Ignoring stored window settings: {}", e);
                Ok(WorkingWindow::default())
            }
        }
    }

    fn save_window(&self, window: &WorkingWindow) -> Result<()> {
        window.validate()?;
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        for (key, value) in [
            (KEY_START_HOUR, window.start() / 60),
            (KEY_START_MINUTE, window.start() % 60),
            (KEY_END_HOUR, window.end() / 60),
            (KEY_END_MINUTE, window.end() % 60),
        ] {
            tx.execute(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        info!("Saved working window {}", window);
        Ok(())
    }
}

// ========== Memory ==========

/// Keeps the window in process memory.
#[derive(Default)]
pub struct MemoryWindowStore {
    window: RwLock<Option<WorkingWindow>>,
}

impl MemoryWindowStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl WindowStore for MemoryWindowStore {
    fn load_window(&self) -> Result<WorkingWindow> {
        let window = self
            .window
            .read()
            .map_err(|_| AppError::Storage("window lock poisoned".to_string()))?;
        Ok(window.unwrap_or_default())
    }

    fn save_window(&self, window: &WorkingWindow) -> Result<()> {
        window.validate()?;
        *self
            .window
            .write()
            .map_err(|_| AppError::Storage("window lock poisoned".to_string()))? = Some(*window);
        Ok(())
    }
}
