//! Error handling and event statistics.
//!
//! This module provides:
//! - Error type definitions
//! - Event statistics tracking (handled events, swallowed failures)
//!
//! Nothing in the classification core is fatal. Failures fall into:
//! - **Absent signal**: no rule matched; represented as `None`, never an error
//! - **Platform limitation**: no response event fired; a session flag, not an error
//! - **Unsupported capability**: per-tab badge call unavailable; falls back to global
//! - **Transient channel failure**: receiver not ready; the message is dropped

mod stats;
mod types;

// Re-export public API
pub use stats::{log_event_statistics, EventStats};
pub use types::{
    BadgeError, ChannelError, EventError, EventKind, FailureKind, InitializationError,
    ThemeProbeError,
};
