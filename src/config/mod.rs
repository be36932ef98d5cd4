//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (colors, icon paths, probe timeouts)
//! - HTTP header name constants and the tracked header allowlist
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel};
