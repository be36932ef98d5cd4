//! Toolbar badge state and the badge side effect.
//!
//! [`BadgeState::for_session`] turns a session (or its absence) into the text,
//! colors and icon shown in the toolbar. [`apply_badge`] pushes it to a
//! [`BadgeSink`]: the global call always runs, the per-tab call is attempted
//! afterwards and any failure of it is swallowed, because per-tab badges are
//! not supported everywhere.

use serde::Serialize;

use crate::config::{
    BADGE_FALLBACK_TEXT_LEN, COLOR_GRAY, COLOR_GREEN, COLOR_RED, COLOR_YELLOW, ICON_DIR,
    TEXT_BLACK, TEXT_WHITE,
};
use crate::error_handling::{BadgeError, EventStats, FailureKind};
use crate::fingerprint::CacheStatus;
use crate::session::{TabId, TabSession};
use crate::theme::Theme;

/// Icon variant shown in the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IconKind {
    /// A CDN was detected
    Active,
    /// Response classified, no CDN
    Inactive,
    /// No data yet, or reload suggested
    Pending,
}

impl IconKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IconKind::Active => "active",
            IconKind::Inactive => "inactive",
            IconKind::Pending => "pending",
        }
    }
}

/// Everything the badge surface needs to render one tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeState {
    pub text: String,
    pub background_color: &'static str,
    pub text_color: &'static str,
    pub icon: IconKind,
    pub icon_path: String,
}

impl BadgeState {
    pub fn for_session(session: Option<&TabSession>, theme: Theme) -> Self {
        match session {
            Some(session) if !session.no_headers => {
                let status = session.classification.status.as_ref();
                let (background_color, text_color) = status_colors(status);
                let icon = if session.classification.cdn.is_some() {
                    IconKind::Active
                } else {
                    IconKind::Inactive
                };
                Self {
                    text: status.map(badge_text).unwrap_or_default(),
                    background_color,
                    text_color,
                    icon,
                    icon_path: icon_path(icon, theme),
                }
            }
            _ => Self::cleared(theme),
        }
    }

    /// Empty badge with the pending icon.
    pub fn cleared(theme: Theme) -> Self {
        let (background_color, text_color) = status_colors(None);
        Self {
            text: String::new(),
            background_color,
            text_color,
            icon: IconKind::Pending,
            icon_path: icon_path(IconKind::Pending, theme),
        }
    }
}

/// Short badge text for a status.
pub fn badge_text(status: &CacheStatus) -> String {
    match status {
        CacheStatus::Hit => "HIT".into(),
        CacheStatus::Miss => "MISS".into(),
        CacheStatus::Expired => "EXP".into(),
        CacheStatus::Stale => "STL".into(),
        CacheStatus::Revalidated => "REV".into(),
        CacheStatus::Bypass => "BYP".into(),
        CacheStatus::Dynamic => "DYN".into(),
        CacheStatus::Refresh => "REF".into(),
        CacheStatus::Error => "ERR".into(),
        CacheStatus::Other(value) => value.chars().take(BADGE_FALLBACK_TEXT_LEN).collect(),
    }
}

/// `(background, text)` colors for a status; `None` is the no-CDN gray.
pub fn status_colors(status: Option<&CacheStatus>) -> (&'static str, &'static str) {
    match status {
        Some(CacheStatus::Hit) => (COLOR_GREEN, TEXT_WHITE),
        Some(CacheStatus::Miss) | Some(CacheStatus::Error) => (COLOR_RED, TEXT_WHITE),
        Some(CacheStatus::Expired)
        | Some(CacheStatus::Stale)
        | Some(CacheStatus::Revalidated)
        | Some(CacheStatus::Refresh) => (COLOR_YELLOW, TEXT_BLACK),
        Some(CacheStatus::Bypass) | Some(CacheStatus::Dynamic) | Some(CacheStatus::Other(_)) => {
            (COLOR_GRAY, TEXT_WHITE)
        }
        None => (COLOR_GRAY, TEXT_WHITE),
    }
}

pub fn icon_path(icon: IconKind, theme: Theme) -> String {
    format!("{ICON_DIR}/icon-{}-{}.png", icon.as_str(), theme.as_str())
}

/// Where a badge call applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeScope {
    Global,
    Tab(TabId),
}

/// The badge/icon rendering surface.
pub trait BadgeSink {
    fn set_badge(&mut self, scope: BadgeScope, state: &BadgeState) -> Result<(), BadgeError>;
}

/// Applies `state` globally, then for `tab_id` when `per_tab` is enabled.
///
/// Returns whether the per-tab call succeeded. Failures are logged at debug
/// and counted; they never reach the caller.
pub fn apply_badge(
    sink: &mut dyn BadgeSink,
    tab_id: TabId,
    state: &BadgeState,
    per_tab: bool,
    stats: &EventStats,
) -> bool {
    if let Err(e) = sink.set_badge(BadgeScope::Global, state) {
        log::debug!("Global badge update failed: {e}");
        stats.increment_failure(FailureKind::BadgeCallFailed);
    }

    if !per_tab {
        return false;
    }

    match sink.set_badge(BadgeScope::Tab(tab_id), state) {
        Ok(()) => true,
        Err(BadgeError::Unsupported) => {
            log::debug!("Per-tab badge unsupported for tab {tab_id}; global badge kept");
            stats.increment_failure(FailureKind::PerTabBadgeUnsupported);
            false
        }
        Err(e) => {
            log::debug!("Per-tab badge update failed for tab {tab_id}: {e}");
            stats.increment_failure(FailureKind::BadgeCallFailed);
            false
        }
    }
}

/// Badge sink that writes each call to the log.
///
/// Used by the replay driver; `per_tab_supported = false` simulates a
/// platform without per-tab badges.
#[derive(Debug, Clone)]
pub struct LogBadgeSink {
    per_tab_supported: bool,
}

impl LogBadgeSink {
    pub fn new(per_tab_supported: bool) -> Self {
        Self { per_tab_supported }
    }
}

impl BadgeSink for LogBadgeSink {
    fn set_badge(&mut self, scope: BadgeScope, state: &BadgeState) -> Result<(), BadgeError> {
        match scope {
            BadgeScope::Global => {
                log::info!(
                    "Badge: text={:?} color={} icon={}",
                    state.text,
                    state.background_color,
                    state.icon_path
                );
                Ok(())
            }
            BadgeScope::Tab(tab_id) if self.per_tab_supported => {
                log::debug!("Badge for tab {tab_id}: text={:?}", state.text);
                Ok(())
            }
            BadgeScope::Tab(_) => Err(BadgeError::Unsupported),
        }
    }
}
