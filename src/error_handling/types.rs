//! Error type definitions.
//!
//! This module defines all error types and the event/failure categories
//! counted by [`EventStats`](super::EventStats).

use log::SetLoggerError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Errors from a badge/icon side effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadgeError {
    /// The per-tab variant of the call is not available on this platform.
    #[error("per-tab badge calls are not supported")]
    Unsupported,

    /// The call was attempted and failed.
    #[error("badge update failed: {0}")]
    Failed(String),
}

/// Errors sending to a collaborator over a channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    /// The receiving side has gone away (popup closed, collaborator not loaded).
    #[error("channel closed for tab {0}")]
    Closed(i64),
}

/// Errors decoding an inbound event.
#[derive(Error, Debug)]
pub enum EventError {
    /// A line of the event stream is not a valid event.
    #[error("malformed event on line {line}: {source}")]
    Malformed {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors from the native appearance round trip.
#[derive(Error, Debug)]
pub enum ThemeProbeError {
    /// The probe process could not be started.
    #[error("theme probe could not start: {0}")]
    Spawn(#[from] std::io::Error),

    /// The probe did not answer in time.
    #[error("theme probe timed out after {0:?}")]
    Timeout(std::time::Duration),
}

/// Categories of handled events.
///
/// These are informational metrics: most inbound events land in one category,
/// and the state machine records a few derived outcomes (fallbacks, redirects)
/// on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum EventKind {
    NavigationStarted,
    ResponseClassified,
    ResponseDropped, // no pending navigation and no session for the tab
    DuplicateResponse,
    NavigationCompleted,
    NoHeadersFallback, // navigation completed without a response event
    RedirectUrlUpdated,
    TabClosed,
    PerformanceAttached,
    BadgeRefreshed, // tab activation / window focus
    ColorSchemeChanged,
    TabDataQueried,
    SubscriberAttached,
    SubscriberDetached,
    IgnoredSubFrame,
}

/// Categories of failures that are swallowed by design of the event model.
///
/// None of these is fatal; they are counted so a replay can report them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum FailureKind {
    PerTabBadgeUnsupported,
    BadgeCallFailed,
    ObserverPushDropped,
    MalformedEvent,
    ThemeProbeFailed,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::NavigationStarted => "Navigation started",
            EventKind::ResponseClassified => "Response classified",
            EventKind::ResponseDropped => "Response dropped (no navigation)",
            EventKind::DuplicateResponse => "Duplicate response ignored",
            EventKind::NavigationCompleted => "Navigation completed",
            EventKind::NoHeadersFallback => "No response headers observed",
            EventKind::RedirectUrlUpdated => "URL updated after redirect",
            EventKind::TabClosed => "Tab closed",
            EventKind::PerformanceAttached => "Performance data attached",
            EventKind::BadgeRefreshed => "Badge refreshed",
            EventKind::ColorSchemeChanged => "Color scheme changed",
            EventKind::TabDataQueried => "Tab data queried",
            EventKind::SubscriberAttached => "Subscriber attached",
            EventKind::SubscriberDetached => "Subscriber detached",
            EventKind::IgnoredSubFrame => "Sub-frame event ignored",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::PerTabBadgeUnsupported => "Per-tab badge unsupported",
            FailureKind::BadgeCallFailed => "Badge call failed",
            FailureKind::ObserverPushDropped => "Observer push dropped",
            FailureKind::MalformedEvent => "Malformed event",
            FailureKind::ThemeProbeFailed => "Theme probe failed",
        }
    }
}
