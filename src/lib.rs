// tnsed Library - Public API

// Re-export error types
pub mod error;
pub use error::{Result, TnsedError};

// Module declarations
pub mod commands;
pub mod core;
pub mod ui;

// Re-export commonly used types
pub use crate::core::config::Config;
pub use crate::core::entry::{ConnectionStatus, TnsEntry};
pub use crate::core::status::ConnectionStatusService;

// Initialize logging
pub fn init_logging() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .init();
}
