pub mod clock;
pub mod monitor;
pub mod notifier;
pub mod price_feed;
pub mod signals;
pub mod window_store;
pub mod working_hours;

pub use clock::{Clock, FixedClock, SystemClock};
pub use monitor::{FeedFactory, Monitor, MonitorConfig};
pub use notifier::{LogNotifier, SignalAlert, SignalNotifier};
pub use price_feed::{PriceFeed, RandomWalkFeed, ScriptedFeed, DEFAULT_MAX_STEP};
pub use signals::{EmaSeries, Session};
pub use window_store::{JsonWindowStore, MemoryWindowStore, SqliteWindowStore, WindowStore};
pub use working_hours::{is_open, WorkingHoursGate};
