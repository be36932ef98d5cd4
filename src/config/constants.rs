//! Configuration constants.
//!
//! This module defines the display constants (badge colors, icon paths) and
//! operational limits used throughout the application.

use std::time::Duration;

// Badge colors
/// Green badge (cache hit)
pub const COLOR_GREEN: &str = "#22c55e";
/// Red badge (cache miss, origin error)
pub const COLOR_RED: &str = "#ef4444";
/// Yellow badge (expired, stale, revalidated, refreshed)
pub const COLOR_YELLOW: &str = "#eab308";
/// Gray badge (bypass, dynamic, no CDN)
pub const COLOR_GRAY: &str = "#6b7280";
/// Badge text on dark backgrounds
pub const TEXT_WHITE: &str = "#fff";
/// Badge text on yellow backgrounds
pub const TEXT_BLACK: &str = "#000";

/// Number of characters shown on the badge for a status outside the known
/// vocabulary.
pub const BADGE_FALLBACK_TEXT_LEN: usize = 3;

// Toolbar icons
/// Directory holding the toolbar icon variants.
pub const ICON_DIR: &str = "images";

/// Display name used when a CDN id is absent or unknown.
pub const GENERIC_CDN_NAME: &str = "CDN";

// Session registry
/// How many recently closed tab ids are remembered so late collector
/// messages for them are dropped instead of recreating state.
pub const RECENTLY_CLOSED_TABS: usize = 64;

// Native theme probe
/// Upper bound on the out-of-process appearance query at startup.
/// The probe is best-effort; on timeout the default (light) theme is kept.
pub const THEME_PROBE_TIMEOUT: Duration = Duration::from_millis(1500);
/// Program used to read the OS appearance setting.
pub const THEME_PROBE_PROGRAM: &str = "defaults";
/// Arguments for [`THEME_PROBE_PROGRAM`]. Prints `Dark` in dark mode and
/// fails with a non-zero status in light mode.
pub const THEME_PROBE_ARGS: &[&str] = &["read", "-g", "AppleInterfaceStyle"];

/// Seconds per minute / hour, used by age formatting.
pub const SECS_PER_MINUTE: u64 = 60;
pub const SECS_PER_HOUR: u64 = 3600;
