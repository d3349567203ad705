pub mod banner;
pub mod commands;
pub mod logging;

pub use logging::{LineFormat, scan_log_path};
