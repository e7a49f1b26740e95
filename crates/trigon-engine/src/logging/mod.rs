//! Logging utilities.
//!
//! Centralizes logger initialization. Code logs through the `log` facade; the
//! backend is `android_logger` on device and `env_logger` everywhere else.

mod init;

pub use init::{init_logging, LoggingConfig};
