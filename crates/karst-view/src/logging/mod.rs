//! Logging utilities.
//!
//! Centralizes logger initialization on the standard `log` facade so hosted
//! applications and the runtime report through one place.

mod init;

pub use init::{LoggingConfig, init_logging};
