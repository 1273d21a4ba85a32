pub mod monitor;
pub mod signal;
pub mod window;

pub use monitor::*;
pub use signal::*;
pub use window::*;
