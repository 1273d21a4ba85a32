//! Gold Signal - EMA crossover signal monitor for a simulated gold price feed

pub mod config;
pub mod error;
pub mod services;
pub mod types;

// Re-export commonly used types
pub use error::{AppError, Result};
pub use services::{Monitor, MonitorConfig, Session};
pub use types::*;
