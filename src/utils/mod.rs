//! Utility modules for paths, naming, configuration and errors

pub mod config;
pub mod error;
pub mod filename;
pub mod paths;
pub mod platform;
pub mod time;

// Re-export for convenience
pub use config::{AppSettings, TempFilePolicy};
pub use error::TubefetchError;
pub use filename::sanitize_title;
pub use paths::{is_pathname_valid, resolve_output_dir};
pub use time::readable_time;
